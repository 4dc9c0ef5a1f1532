//! Delayed signals observed after a decision was made.
//!
//! Every field is optional. A missing field contributes nothing to a reward,
//! and merging only overwrites the fields the newer observation carries.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct OutcomeMetrics {
    // Subject item outcome (filled by the outcome tracker)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_successfully: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<DateTime<Utc>>,
    /// Minutes spent in DOING.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_in_create: Option<f64>,
    /// Minutes from item creation to completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_complete: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategic_alignment: Option<f64>,

    // Librarian
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_prevented: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_positive: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missed_issue: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_was_real: Option<bool>,

    // Prioritizer / Filer strategic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategic_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opportunity_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_alignment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_maintenance: Option<f64>,

    // Storer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corpus_coherence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplication_detected: Option<bool>,

    // Retriever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_correctness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hallucination_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coherence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_alignment: Option<f64>,
}

impl OutcomeMetrics {
    /// Overlay `other` onto `self`: fields set in `other` win, the rest are kept.
    pub fn merge(&mut self, other: &Self) {
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if other.$field.is_some() {
                        self.$field = other.$field;
                    }
                )*
            };
        }

        overlay!(
            completed_successfully,
            cycle_count,
            blocked_at,
            total_time_in_create,
            time_to_complete,
            strategic_alignment,
            conflict_prevented,
            false_positive,
            missed_issue,
            dependency_was_real,
            time_efficiency,
            strategic_progress,
            opportunity_cost,
            energy_alignment,
            flow_maintenance,
            corpus_coherence,
            findability,
            duplication_detected,
            citation_correctness,
            hallucination_count,
            completeness,
            coherence,
            style_alignment,
        );
    }

    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.merge(other);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
