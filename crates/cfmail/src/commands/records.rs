//! Record update for one zone: report, gate, prompt, replace.

use std::io::{self, Write};

use dialoguer::Confirm;
use serde::Serialize;
use tracing::warn;

use cfmail_api::CloudflareClient;
use cfmail_core::{
    Confirmation, DnsRecord, Outcome, Presence, Presenter, ReconcileOptions, RecordCategory,
    reconcile,
};

use crate::cli::OutputFormat;
use crate::commands::RunContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &CloudflareClient,
    zone: &str,
    ctx: &RunContext,
) -> Result<(), CliError> {
    let options = ReconcileOptions {
        print_only: ctx.print_only,
        force: ctx.force,
        replacement: ctx.replacement.clone(),
    };

    let mut presenter = ConsolePresenter::new(ctx.output, ctx.color);
    let outcome = reconcile(client, &mut presenter, zone, &options).await?;
    presenter.finish(zone, &outcome)?;

    match outcome {
        Outcome::Refused { .. } => Err(CliError::RecordsExist { zone: zone.into() }),
        Outcome::PrintOnly { .. } | Outcome::Applied(_) => Ok(()),
    }
}

// ── Console presenter ────────────────────────────────────────────────

/// Table mode prints as the run progresses. Structured modes collect the
/// run and emit one document at the end; prompts then go to stderr.
struct ConsolePresenter {
    format: OutputFormat,
    color: bool,
    records: Vec<DnsRecord>,
    render_error: Option<CliError>,
}

impl ConsolePresenter {
    fn new(format: OutputFormat, color: bool) -> Self {
        Self {
            format,
            color,
            records: Vec::new(),
            render_error: None,
        }
    }

    fn interactive_text(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Progress text: stdout for tables, stderr otherwise.
    fn say(&self, text: &str) {
        if self.interactive_text() {
            output::print_output(text);
        } else {
            let _ = writeln!(io::stderr().lock(), "{text}");
        }
    }

    fn finish(mut self, zone: &str, outcome: &Outcome) -> Result<(), CliError> {
        if let Some(err) = self.render_error.take() {
            return Err(err);
        }
        if self.interactive_text() {
            return Ok(());
        }

        let none: &[DnsRecord] = &[];
        let summary = match outcome {
            Outcome::PrintOnly { presence } => RunSummary {
                zone,
                outcome: "print-only",
                presence: *presence,
                deleted: none,
                skipped: none,
                created: none,
                records: &self.records,
            },
            Outcome::Refused { presence } => RunSummary {
                zone,
                outcome: "refused",
                presence: *presence,
                deleted: none,
                skipped: none,
                created: none,
                records: &self.records,
            },
            Outcome::Applied(report) => RunSummary {
                zone,
                outcome: "applied",
                presence: report.presence,
                deleted: &report.deleted,
                skipped: &report.skipped,
                created: &report.created,
                records: &report.records,
            },
        };

        output::print_output(&output::render_structured(self.format, &summary)?);
        Ok(())
    }
}

impl Presenter for ConsolePresenter {
    fn presence(&mut self, presence: Presence) {
        if self.interactive_text() {
            output::print_output(&format!("{}\n", output::render_presence(presence)));
        }
    }

    fn records(&mut self, records: &[DnsRecord]) {
        if self.interactive_text() {
            match output::render_records(self.format, records) {
                Ok(table) => output::print_output(&table),
                Err(e) => self.render_error = Some(e),
            }
        } else {
            self.records = records.to_vec();
        }
    }

    fn records_exist(&mut self, _presence: Presence) {
        let notice = output::records_exist_notice(self.color && self.interactive_text());
        self.say(&format!("{notice}\n"));
    }

    fn confirm_delete(&mut self, record: &DnsRecord, categories: &[RecordCategory]) -> Confirmation {
        let kinds = categories
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.say(&format!(
            "Record Name: {}\nRecord Type: {}\nRecord Content: {}\nMatches: {kinds}",
            record.name, record.record_type, record.content
        ));

        let answer = Confirm::new()
            .with_prompt("Delete this record?")
            .default(false)
            .interact_opt();
        confirmation_from(answer)
    }

    fn deleted(&mut self, record: &DnsRecord) {
        self.say(&format!("Deleted {} record {}", record.record_type, record.name));
    }

    fn created(&mut self, record: &DnsRecord) {
        self.say(&format!("Created {} record {}", record.record_type, record.name));
    }
}

/// `None` is Esc/q at the prompt; a prompt that cannot be shown aborts too.
fn confirmation_from(answer: dialoguer::Result<Option<bool>>) -> Confirmation {
    match answer {
        Ok(Some(true)) => Confirmation::Confirmed,
        Ok(Some(false)) => Confirmation::Declined,
        Ok(None) => Confirmation::Aborted,
        Err(e) => {
            warn!(error = %e, "confirmation prompt failed");
            Confirmation::Aborted
        }
    }
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    zone: &'a str,
    outcome: &'static str,
    presence: Presence,
    deleted: &'a [DnsRecord],
    skipped: &'a [DnsRecord],
    created: &'a [DnsRecord],
    records: &'a [DnsRecord],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_answers_map_to_confirmations() {
        assert_eq!(confirmation_from(Ok(Some(true))), Confirmation::Confirmed);
        assert_eq!(confirmation_from(Ok(Some(false))), Confirmation::Declined);
        assert_eq!(confirmation_from(Ok(None)), Confirmation::Aborted);
    }

    #[test]
    fn unusable_terminal_aborts() {
        let err = dialoguer::Error::IO(io::Error::new(io::ErrorKind::NotConnected, "not a tty"));
        assert_eq!(confirmation_from(Err(err)), Confirmation::Aborted);
    }

    #[test]
    fn structured_mode_collects_records_instead_of_printing() {
        let mut presenter = ConsolePresenter::new(OutputFormat::Json, false);
        presenter.records(&[]);
        assert!(presenter.records.is_empty());
        assert!(!presenter.interactive_text());
        assert!(presenter.render_error.is_none());
    }
}
