//! Output formatting: table, JSON, YAML.
//!
//! Renders zones, records and presence summaries in the format selected by
//! `--output`. Table uses `tabled`, structured formats use serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use cfmail_core::{DnsRecord, Presence, Zone};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

pub const NO_RECORDS: &str = "No DNS records found";

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// The two-line notice shown when existing email records block a run.
pub fn records_exist_notice(color: bool) -> String {
    let headline = "Email DNS records already exist for this domain.";
    let hint = "Pass the --force flag to add the records anyway.";
    if color {
        format!("{}\n{}", headline.red().bold(), hint.bold())
    } else {
        format!("{headline}\n{hint}")
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Last Updated")]
    updated: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Content")]
    content: String,
}

impl From<&DnsRecord> for RecordRow {
    fn from(r: &DnsRecord) -> Self {
        Self {
            updated: r
                .modified_on
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            host: r.name.clone(),
            record_type: r.record_type.to_string(),
            content: r.content.clone(),
        }
    }
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Zone> for ZoneRow {
    fn from(z: &Zone) -> Self {
        Self {
            name: z.name.clone(),
            status: z.status.clone().unwrap_or_default(),
            id: z.id.clone(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json | OutputFormat::Yaml => render_structured(format, data),
    }
}

/// Records listing; an empty zone renders as a single notice line.
pub fn render_records(format: OutputFormat, records: &[DnsRecord]) -> Result<String, CliError> {
    if format == OutputFormat::Table && records.is_empty() {
        return Ok(NO_RECORDS.into());
    }
    render_list(format, records, |r| RecordRow::from(r))
}

pub fn render_zones(
    format: OutputFormat,
    email: &str,
    zones: &[Zone],
) -> Result<String, CliError> {
    if format != OutputFormat::Table {
        return render_structured(format, zones);
    }

    let mut out = format!("Available zones for Cloudflare user {email}:");
    if !zones.is_empty() {
        out.push('\n');
        out.push_str(&render_list(format, zones, |z| ZoneRow::from(z))?);
    }
    Ok(out)
}

/// `MX records exist: true`, one line per category.
pub fn render_presence(presence: Presence) -> String {
    presence
        .iter()
        .map(|(category, exists)| format!("{category} records exist: {exists}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the rendered output to stdout.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// JSON or YAML; a table request falls back to pretty JSON.
pub fn render_structured<T: serde::Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(data).map_err(|e| CliError::Serialize(e.to_string()))
        }
        OutputFormat::Json | OutputFormat::Table => {
            serde_json::to_string_pretty(data).map_err(|e| CliError::Serialize(e.to_string()))
        }
    }
}
