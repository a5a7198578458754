//! Command dispatch: a zone name runs the record update, no zone lists zones.

pub mod records;
pub mod zones;

use cfmail_api::CloudflareClient;
use cfmail_core::ReplacementSet;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Everything a command needs besides the client.
#[derive(Debug)]
pub struct RunContext {
    pub email: String,
    pub output: OutputFormat,
    pub color: bool,
    pub print_only: bool,
    pub force: bool,
    pub replacement: ReplacementSet,
}

pub async fn dispatch(
    zone: Option<&str>,
    client: &CloudflareClient,
    ctx: &RunContext,
) -> Result<(), CliError> {
    match zone {
        None => zones::handle(client, ctx).await,
        Some(zone) => records::handle(client, zone, ctx).await,
    }
}
