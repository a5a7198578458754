mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use cfmail_api::CloudflareClient;
use cfmail_config::Settings;
use cfmail_core::{MxScope, TxtQuoting};

use crate::cli::{Cli, MxScopeArg, TxtQuotingArg};
use crate::commands::RunContext;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(&LogConfig::from_verbosity(cli.verbose));

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

// ── Logging ──────────────────────────────────────────────────────────

/// Log level chosen once from `-v` count; `RUST_LOG` takes precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogConfig {
    level: Level,
}

impl LogConfig {
    fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::ERROR,
            1 => Level::INFO,
            _ => Level::DEBUG,
        };
        Self { level }
    }
}

fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_ascii_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Run ──────────────────────────────────────────────────────────────

async fn run(cli: Cli) -> Result<(), CliError> {
    // Credentials are checked before anything touches the network.
    let credentials = cfmail_config::load_credentials()?;
    let settings = resolve_settings(&cli)?;

    let transport = settings.transport()?;
    tracing::debug!(
        api_base = %transport.base_url,
        timeout = ?transport.timeout,
        mx_scope = %settings.mx_scope,
        txt_quoting = %settings.txt_quoting,
        "settings resolved"
    );
    let client = CloudflareClient::new(&transport, &credentials)?;

    let ctx = RunContext {
        email: credentials.email,
        output: cli.output,
        color: output::should_color(cli.color),
        print_only: cli.print_only,
        force: cli.force,
        replacement: settings.replacement(),
    };

    commands::dispatch(cli.zone.as_deref(), &client, &ctx).await
}

/// File and environment settings with CLI flags applied on top.
fn resolve_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = cfmail_config::load_settings()?;

    if let Some(ref api_base) = cli.api_base {
        settings.api_base.clone_from(api_base);
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout = timeout;
    }
    if let Some(scope) = cli.mx_scope {
        settings.mx_scope = match scope {
            MxScopeArg::Root => MxScope::Root,
            MxScopeArg::RootAndWildcard => MxScope::RootAndWildcard,
        };
    }
    if let Some(quoting) = cli.txt_quoting {
        settings.txt_quoting = match quoting {
            TxtQuotingArg::Quoted => TxtQuoting::Quoted,
            TxtQuotingArg::Bare => TxtQuoting::Bare,
        };
    }

    Ok(settings)
}
