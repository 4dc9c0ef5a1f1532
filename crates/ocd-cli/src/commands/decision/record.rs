use ocd_core::enums::AgentType;
use ocd_core::payload::AgentPayload;
use ocd_db::repos::decision::NewDecision;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RecordArgs;
use crate::commands::shared::parse::{parse_enum, parse_json};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(args: &RecordArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let agent = parse_enum::<AgentType>(&args.agent, "agent")?;
    let state = parse_json(&args.state, "--state")?;
    let action = parse_json(&args.action, "--action")?;
    let payload = AgentPayload::from_parts(agent, state, action, None)?;

    let mut new = NewDecision::new(payload, &args.model_version, &args.user);
    new.item_id.clone_from(&args.item);
    new.opus_id.clone_from(&args.opus);
    new.confidence = args.confidence;
    new.reasoning.clone_from(&args.reasoning);
    new.alternative_actions = args
        .alternatives
        .as_deref()
        .map(|raw| parse_json(raw, "--alternatives"))
        .transpose()?;
    new.validation = args.validation;

    let decision = ctx.service.create_decision(new).await?;
    output(&decision, flags.format)
}
