//! Auxiliary inputs to the calculators and the tunable scoring policy.

use ocd_core::entities::Item;
use serde::{Deserialize, Serialize};

use crate::weights::RewardWeights;

pub const DEFAULT_GOAL_WINDOW_DAYS: u32 = 7;

#[must_use]
pub fn default_strategic_labels() -> Vec<String> {
    vec!["Job 1 (Income)".to_string(), "Job 2 (Authority)".to_string()]
}

/// The strategic label the user is currently focused on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategicFocus {
    pub priority_label: String,
}

/// How the current strategic focus is derived from recent completions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusPolicy {
    pub window_days: u32,
    /// Competing labels, in tie-break order.
    pub labels: Vec<String>,
}

impl Default for FocusPolicy {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_GOAL_WINDOW_DAYS,
            labels: default_strategic_labels(),
        }
    }
}

impl FocusPolicy {
    /// Pick the label with the most completions. Ties go to the label listed
    /// first. Without a single matching completion there is no focus.
    ///
    /// `completed` holds the label sets of the items completed in the window.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, completed: &[Vec<S>]) -> Option<StrategicFocus> {
        let mut best: Option<(&String, usize)> = None;
        for label in &self.labels {
            let count = completed
                .iter()
                .filter(|labels| labels.iter().any(|l| l.as_ref() == label))
                .count();
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((label, count));
            }
        }
        best.filter(|(_, count)| *count > 0)
            .map(|(label, _)| StrategicFocus {
                priority_label: label.clone(),
            })
    }
}

/// Everything besides the decision itself that a calculator may look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardContext {
    /// The subject item, when the decision references one.
    pub item: Option<Item>,
    pub focus: Option<StrategicFocus>,
}

/// Weights plus focus tuning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardPolicy {
    pub weights: RewardWeights,
    pub focus: FocusPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(sets: &[&[&'static str]]) -> Vec<Vec<&'static str>> {
        sets.iter().map(|s| s.to_vec()).collect()
    }

    #[test]
    fn most_completed_label_wins() {
        let policy = FocusPolicy::default();
        let done = labels(&[&["Job 2 (Authority)"], &["Job 2 (Authority)", "writing"], &["Job 1 (Income)"]]);
        assert_eq!(
            policy.resolve(&done).unwrap().priority_label,
            "Job 2 (Authority)"
        );
    }

    #[test]
    fn tie_goes_to_first_label() {
        let policy = FocusPolicy::default();
        let done = labels(&[&["Job 2 (Authority)"], &["Job 1 (Income)"]]);
        assert_eq!(policy.resolve(&done).unwrap().priority_label, "Job 1 (Income)");
    }

    #[test]
    fn no_completions_no_focus() {
        let policy = FocusPolicy::default();
        let none: Vec<Vec<&str>> = vec![];
        assert_eq!(policy.resolve(&none), None);
        let unrelated = labels(&[&["writing"], &["errands"]]);
        assert_eq!(policy.resolve(&unrelated), None);
    }

    #[test]
    fn custom_label_order_changes_tie_break() {
        let policy = FocusPolicy {
            window_days: 14,
            labels: vec!["Job 2 (Authority)".into(), "Job 1 (Income)".into()],
        };
        let done = labels(&[&["Job 2 (Authority)"], &["Job 1 (Income)"]]);
        assert_eq!(
            policy.resolve(&done).unwrap().priority_label,
            "Job 2 (Authority)"
        );
    }

    #[test]
    fn no_labels_no_focus() {
        let policy = FocusPolicy {
            window_days: 7,
            labels: vec![],
        };
        let none: Vec<Vec<&str>> = vec![];
        assert_eq!(policy.resolve(&none), None);
    }
}
