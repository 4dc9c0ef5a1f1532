use ocd_core::enums::ItemStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    status: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let next = parse_enum::<ItemStatus>(status, "status")?;
    let response = ctx.service.move_item(id, next).await?;
    if let Some(report) = &response.tracker {
        tracing::info!(
            item_id = %id,
            decisions_updated = report.decisions_updated,
            errors = report.errors,
            "Scored outcomes of terminal item"
        );
    }
    output(&response, flags.format)
}
