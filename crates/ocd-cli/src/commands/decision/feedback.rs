use ocd_core::enums::Feedback;
use ocd_core::payload::AgentAction;

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_enum, parse_json};
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    id: &str,
    value: &str,
    correction: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let feedback = parse_enum::<Feedback>(value, "feedback")?;

    let correction = match correction {
        Some(raw) => {
            // The correction is untagged; its shape comes from the decision's agent.
            let agent = ctx.service.get_decision(id).await?.agent_type();
            Some(AgentAction::from_value(agent, parse_json(raw, "--correction")?)?)
        }
        None => None,
    };

    let response = ctx.service.submit_feedback(id, feedback, correction).await?;
    output(&response, flags.format)
}
