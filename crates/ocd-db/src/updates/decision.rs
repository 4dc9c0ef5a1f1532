//! Decision update builder.
//!
//! Covers the columns a human touches after the fact: feedback, the
//! correction that came with it, and the train/validation split. Outcome and
//! reward columns have their own dedicated writes.

use ocd_core::enums::Feedback;
use ocd_core::payload::AgentAction;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DecisionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_feedback: Option<Feedback>,
    /// `Some(None)` clears a previous correction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_correction: Option<Option<AgentAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_training_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_validation_data: Option<bool>,
}

impl DecisionUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.user_feedback.is_none()
            && self.user_correction.is_none()
            && self.is_training_data.is_none()
            && self.is_validation_data.is_none()
    }
}

pub struct DecisionUpdateBuilder(DecisionUpdate);

impl DecisionUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(DecisionUpdate::default())
    }

    #[must_use]
    pub const fn feedback(mut self, feedback: Feedback) -> Self {
        self.0.user_feedback = Some(feedback);
        self
    }

    #[must_use]
    pub fn correction(mut self, correction: Option<AgentAction>) -> Self {
        self.0.user_correction = Some(correction);
        self
    }

    /// Move the decision into the validation split (and out of training).
    #[must_use]
    pub const fn validation(mut self) -> Self {
        self.0.is_training_data = Some(false);
        self.0.is_validation_data = Some(true);
        self
    }

    #[must_use]
    pub const fn training(mut self, training: bool) -> Self {
        self.0.is_training_data = Some(training);
        self
    }

    #[must_use]
    pub fn build(self) -> DecisionUpdate {
        self.0
    }
}

impl Default for DecisionUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocd_core::payload::PrioritizerAction;

    #[test]
    fn serializes_only_set_fields() {
        let update = DecisionUpdateBuilder::new().feedback(Feedback::Ignored).build();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"user_feedback": "IGNORED"})
        );
    }

    #[test]
    fn cleared_correction_serializes_as_null() {
        let update = DecisionUpdateBuilder::new().correction(None).build();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"user_correction": null})
        );
        assert!(!update.is_empty());
    }

    #[test]
    fn correction_keeps_agent_tag() {
        let action = AgentAction::Prioritizer(PrioritizerAction {
            recommended_item_id: "itm-2".into(),
        });
        let update = DecisionUpdateBuilder::new()
            .feedback(Feedback::Overridden)
            .correction(Some(action))
            .build();
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["user_correction"]["agent_type"], "PRIORITIZER");
    }

    #[test]
    fn empty_update() {
        assert!(DecisionUpdate::default().is_empty());
        assert!(!DecisionUpdateBuilder::new().validation().build().is_empty());
    }
}
