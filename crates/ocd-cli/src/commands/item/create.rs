use ocd_core::enums::{ItemStatus, Priority, Swimlane};
use ocd_db::repos::item::NewItem;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    title: &str,
    user: &str,
    status: Option<&str>,
    swimlane: Option<&str>,
    priority: Option<&str>,
    labels: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let new = NewItem {
        user_id: user.to_string(),
        title: title.to_string(),
        status: status
            .map(|raw| parse_enum::<ItemStatus>(raw, "status"))
            .transpose()?,
        swimlane: swimlane
            .map(|raw| parse_enum::<Swimlane>(raw, "swimlane"))
            .transpose()?,
        priority: priority
            .map(|raw| parse_enum::<Priority>(raw, "priority"))
            .transpose()?,
        labels: labels.to_vec(),
    };

    let item = ctx.service.create_item(new).await?;
    output(&item, flags.format)
}
