use ocd_config::OcdConfig;
use ocd_core::enums::AgentType;
use ocd_reward::RewardWeights;
use serde_json::{Map, Value};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::WeightsArgs;
use crate::commands::shared::parse::parse_enum;
use crate::output::output;

/// Handle `ocd weights`: the effective weight table after config layering.
pub fn handle(args: &WeightsArgs, config: &OcdConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let agents = match args.agent.as_deref() {
        Some(raw) => vec![parse_enum::<AgentType>(raw, "agent")?],
        None => AgentType::ALL.to_vec(),
    };
    output(&weight_table(&config.weights, &agents), flags.format)
}

/// `{AGENT: {"group.name": weight}}` in tree order.
fn weight_table(weights: &RewardWeights, agents: &[AgentType]) -> Value {
    let mut table = Map::new();
    for agent in agents {
        let leaves = weights
            .leaves_for(*agent)
            .into_iter()
            .map(|leaf| (leaf.path(), Value::from(leaf.value)))
            .collect::<Map<_, _>>();
        table.insert(agent.as_str().to_string(), Value::Object(leaves));
    }
    Value::Object(table)
}
