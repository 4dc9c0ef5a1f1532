//! One pure calculator per agent: `(decision, context) -> component tree`.
//!
//! Calculators never fail. Missing feedback, outcome fields, or context all
//! contribute 0.

pub mod filer;
pub mod librarian;
pub mod prioritizer;
pub mod retriever;
pub mod storer;

use ocd_core::entities::Decision;
use ocd_core::enums::Feedback;
use ocd_core::payload::AgentPayload;

use crate::components::RewardComponents;
use crate::context::RewardContext;

/// Compute the component tree for a decision of any agent.
#[must_use]
pub fn compute(decision: &Decision, ctx: &RewardContext) -> RewardComponents {
    match &decision.payload {
        AgentPayload::Filer(ex) => RewardComponents::Filer(filer::calculate(decision, ex, ctx)),
        AgentPayload::Librarian(_) => RewardComponents::Librarian(librarian::calculate(decision)),
        AgentPayload::Prioritizer(_) => {
            RewardComponents::Prioritizer(prioritizer::calculate(decision))
        }
        AgentPayload::Storer(ex) => RewardComponents::Storer(storer::calculate(decision, ex)),
        AgentPayload::Retriever(ex) => {
            RewardComponents::Retriever(retriever::calculate(decision, ex))
        }
    }
}

/// Feedback mapping shared by Filer, Librarian, Prioritizer, and Storer.
#[must_use]
pub const fn feedback_reward(feedback: Option<Feedback>) -> f64 {
    match feedback {
        Some(Feedback::Confirmed) => 1.0,
        Some(Feedback::Corrected) => -0.5,
        Some(Feedback::Overridden) => -0.8,
        Some(Feedback::Ignored) | None => 0.0,
    }
}

/// `factor * value` for a present, non-zero metric; otherwise 0.
pub(crate) fn scaled(factor: f64, value: Option<f64>) -> f64 {
    match value {
        Some(v) if v != 0.0 => factor * v,
        _ => 0.0,
    }
}

/// `reward` when the flag is set, otherwise 0.
pub(crate) fn flagged(reward: f64, flag: Option<bool>) -> f64 {
    if flag == Some(true) { reward } else { 0.0 }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};
    use ocd_core::entities::Decision;
    use ocd_core::enums::Feedback;
    use ocd_core::outcome::OutcomeMetrics;
    use ocd_core::payload::AgentPayload;

    pub fn decision(payload: AgentPayload) -> Decision {
        Decision {
            id: "dec-00000001".into(),
            payload,
            model_version: "test-v1".into(),
            user_id: "usr-1".into(),
            item_id: None,
            opus_id: None,
            confidence: None,
            reasoning: None,
            alternative_actions: None,
            user_feedback: None,
            feedback_at: None,
            outcome_metrics: None,
            outcome_observed_at: None,
            reward: None,
            reward_components: None,
            reward_computed_at: None,
            is_training_data: true,
            is_validation_data: false,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    pub fn with_feedback(mut d: Decision, feedback: Option<Feedback>) -> Decision {
        d.user_feedback = feedback;
        d
    }

    pub fn with_outcome(mut d: Decision, outcome: OutcomeMetrics) -> Decision {
        d.outcome_metrics = Some(outcome);
        d
    }
}
