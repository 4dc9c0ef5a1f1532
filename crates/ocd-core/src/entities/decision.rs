use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{AgentType, Feedback};
use crate::outcome::OutcomeMetrics;
use crate::payload::AgentPayload;

/// One recorded AI-agent decision, plus everything learned about it later.
///
/// The agent type is carried by `payload` and cannot be changed after
/// creation. Feedback, outcome, and reward columns are filled independently.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Decision {
    pub id: String,
    pub payload: AgentPayload,
    pub model_version: String,
    pub user_id: String,
    pub item_id: Option<String>,
    pub opus_id: Option<String>,
    pub confidence: Option<f64>,
    pub reasoning: Option<String>,
    pub alternative_actions: Option<serde_json::Value>,
    pub user_feedback: Option<Feedback>,
    pub feedback_at: Option<DateTime<Utc>>,
    pub outcome_metrics: Option<OutcomeMetrics>,
    pub outcome_observed_at: Option<DateTime<Utc>>,
    pub reward: Option<f64>,
    pub reward_components: Option<serde_json::Value>,
    pub reward_computed_at: Option<DateTime<Utc>>,
    pub is_training_data: bool,
    pub is_validation_data: bool,
    pub created_at: DateTime<Utc>,
}

impl Decision {
    #[must_use]
    pub const fn agent_type(&self) -> AgentType {
        self.payload.agent_type()
    }

    /// Outcome metrics, or an empty set if none were observed yet.
    #[must_use]
    pub fn outcome(&self) -> OutcomeMetrics {
        self.outcome_metrics.clone().unwrap_or_default()
    }
}
