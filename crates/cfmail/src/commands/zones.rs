use cfmail_api::CloudflareClient;

use crate::commands::RunContext;
use crate::error::CliError;
use crate::output;

pub async fn handle(client: &CloudflareClient, ctx: &RunContext) -> Result<(), CliError> {
    let zones = cfmail_core::list_zones(client).await?;
    tracing::debug!(count = zones.len(), "zones retrieved");

    let rendered = output::render_zones(ctx.output, &ctx.email, &zones)?;
    output::print_output(&rendered);
    Ok(())
}
