use ocd_core::outcome::OutcomeMetrics;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    metrics: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let metrics: OutcomeMetrics = serde_json::from_str(metrics)
        .map_err(|error| anyhow::anyhow!("invalid outcome metrics JSON: {error}"))?;
    if metrics.is_empty() {
        anyhow::bail!("outcome metrics must set at least one field");
    }

    let response = ctx.service.submit_outcome(id, &metrics).await?;
    output(&response, flags.format)
}
