use ocd_core::enums::AgentType;
use ocd_db::repos::decision::DecisionFilter;
use ocd_reward::export::ExportOrder;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub struct ListArgs<'a> {
    pub agent: Option<&'a str>,
    pub item: Option<&'a str>,
    pub user: Option<&'a str>,
    pub rewarded: Option<bool>,
    pub reviewed: Option<bool>,
    pub oldest_first: bool,
    pub limit: Option<u32>,
}

pub async fn run(args: ListArgs<'_>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = DecisionFilter {
        agent_type: args
            .agent
            .map(|raw| parse_enum::<AgentType>(raw, "agent"))
            .transpose()?,
        item_id: args.item.map(str::to_string),
        user_id: args.user.map(str::to_string),
        has_reward: args.rewarded,
        has_feedback: args.reviewed,
        limit: Some(effective_limit(
            args.limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
        order: if args.oldest_first {
            ExportOrder::OldestFirst
        } else {
            ExportOrder::NewestFirst
        },
    };

    let decisions = ctx.service.find_decisions(&filter).await?;
    output(&decisions, flags.format)
}
