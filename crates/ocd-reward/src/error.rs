use ocd_core::enums::AgentType;
use thiserror::Error;

/// Errors raised while decoding component trees or writing exports.
#[derive(Debug, Error)]
pub enum RewardError {
    #[error("Invalid {agent} reward components: {source}")]
    Components {
        agent: AgentType,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] ocd_core::errors::CoreError),
}
