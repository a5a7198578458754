//! Clap derive structures for the `cf-empty-email` CLI.
//!
//! Kept free of workspace types so `build.rs` can include it for man
//! page generation.

use clap::{ArgAction, Parser, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cf-empty-email -- publish null mail records for a Cloudflare zone
#[derive(Debug, Parser)]
#[command(
    name = "cf-empty-email",
    version = concat!("version ", env!("CARGO_PKG_VERSION")),
    about = "Add empty email DNS records for a Cloudflare zone",
    long_about = "Add empty email DNS records for a Cloudflare zone.\n\n\
        Installs a null MX record, an SPF record rejecting all senders, an\n\
        empty DKIM key and a DMARC reject policy, so the domain can neither\n\
        send nor receive mail.\n\n\
        If no zone name is given, the zones available to the account are listed.\n\n\
        Credentials are read from the CF_API_KEY and CF_API_EMAIL environment variables."
)]
pub struct Cli {
    /// The domain name managed by Cloudflare
    #[arg(value_name = "ZONE")]
    pub zone: Option<String>,

    /// Only print the DNS records for the zone
    #[arg(long = "print", short = 'p')]
    pub print_only: bool,

    /// Replace email records if they already exist
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,

    /// Output format for record and zone listings
    #[arg(long, short = 'o', default_value = "table")]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto")]
    pub color: ColorMode,

    /// Hosts that receive a null MX record [default: root-and-wildcard]
    #[arg(long)]
    pub mx_scope: Option<MxScopeArg>,

    /// Whether TXT content is wrapped in double quotes [default: quoted]
    #[arg(long)]
    pub txt_quoting: Option<TxtQuotingArg>,

    /// Request timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Cloudflare API root
    #[arg(long, hide = true)]
    pub api_base: Option<String>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Record set options ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MxScopeArg {
    /// Root domain only
    Root,
    /// Root domain and all subdomains
    RootAndWildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TxtQuotingArg {
    /// Send TXT content wrapped in double quotes
    Quoted,
    /// Send TXT content as-is
    Bare,
}
