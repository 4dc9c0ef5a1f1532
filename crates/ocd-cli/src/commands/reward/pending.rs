use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    page_size: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let page_size = page_size.unwrap_or(ctx.config.reward.batch_page_size);
    if page_size == 0 {
        anyhow::bail!("--page-size must be greater than 0");
    }
    let report = ctx.service.compute_pending_rewards(page_size).await?;
    output(&report, flags.format)
}
