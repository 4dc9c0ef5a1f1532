//! The per-agent weight table.
//!
//! Weights are the only tunable part of scoring. Each agent's table is the
//! agent's component tree type, so TOML or env overrides with a misspelled key
//! fail to deserialize instead of silently weighting nothing.

use ocd_core::enums::AgentType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::components::{
    ComponentTree, FilerComponents, FilerDelayed, FilerImmediate, FilerStrategic, Leaf,
    LibrarianComponents, LibrarianDelayed, LibrarianImmediate, PrioritizerComponents,
    PrioritizerContextual, PrioritizerDelayed, PrioritizerImmediate, RetrieverAccuracy,
    RetrieverComponents, RetrieverImmediate, RetrieverQuality, StorerComponents, StorerDelayed,
    StorerImmediate,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct RewardWeights {
    pub filer: FilerComponents,
    pub librarian: LibrarianComponents,
    pub prioritizer: PrioritizerComponents,
    pub storer: StorerComponents,
    pub retriever: RetrieverComponents,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            filer: FilerComponents {
                immediate: FilerImmediate {
                    user_feedback: 1.0,
                    confidence_calibration: 0.1,
                },
                delayed: FilerDelayed {
                    completion_success: 0.5,
                    blockage_avoidance: 0.3,
                    rework_penalty: 0.2,
                    time_efficiency: 0.3,
                },
                strategic: FilerStrategic {
                    goal_alignment: 0.4,
                    opportunity_cost: 0.2,
                },
            },
            librarian: LibrarianComponents {
                immediate: LibrarianImmediate { user_feedback: 1.0 },
                delayed: LibrarianDelayed {
                    conflict_prevention: 2.0,
                    false_positive_penalty: 0.5,
                    missed_issue_penalty: 2.0,
                    dependency_accuracy: 0.5,
                },
            },
            prioritizer: PrioritizerComponents {
                immediate: PrioritizerImmediate {
                    user_acceptance: 1.0,
                },
                delayed: PrioritizerDelayed {
                    completion_success: 1.0,
                    time_efficiency: 0.5,
                    strategic_progress: 0.8,
                    opportunity_cost: 0.3,
                },
                contextual: PrioritizerContextual {
                    energy_alignment: 0.2,
                    flow_maintenance: 0.2,
                },
            },
            storer: StorerComponents {
                immediate: StorerImmediate {
                    user_acceptance: 1.0,
                    edit_distance: 0.5,
                },
                delayed: StorerDelayed {
                    corpus_coherence: 0.7,
                    findability: 0.6,
                    duplication_penalty: 0.4,
                },
            },
            retriever: RetrieverComponents {
                immediate: RetrieverImmediate {
                    user_acceptance: 1.0,
                    edit_distance: 0.5,
                },
                accuracy: RetrieverAccuracy {
                    citation_correctness: 0.8,
                    hallucination_penalty: 2.0,
                    completeness: 0.6,
                },
                quality: RetrieverQuality {
                    coherence: 0.4,
                    style_alignment: 0.3,
                },
            },
        }
    }
}

impl RewardWeights {
    /// The weight leaves of one agent, in tree order.
    #[must_use]
    pub fn leaves_for(&self, agent: AgentType) -> Vec<Leaf> {
        match agent {
            AgentType::Filer => self.filer.leaves(),
            AgentType::Librarian => self.librarian.leaves(),
            AgentType::Prioritizer => self.prioritizer.leaves(),
            AgentType::Storer => self.storer.leaves(),
            AgentType::Retriever => self.retriever.leaves(),
        }
    }

    /// Returns the path of the first non-finite weight, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<(AgentType, String)> {
        AgentType::ALL.into_iter().find_map(|agent| {
            self.leaves_for(agent)
                .into_iter()
                .find(|l| !l.value.is_finite())
                .map(|l| (agent, l.path()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_documented_table() {
        let w = RewardWeights::default();
        assert_eq!(w.filer.immediate.confidence_calibration, 0.1);
        assert_eq!(w.librarian.delayed.missed_issue_penalty, 2.0);
        assert_eq!(w.prioritizer.delayed.strategic_progress, 0.8);
        assert_eq!(w.storer.delayed.duplication_penalty, 0.4);
        assert_eq!(w.retriever.accuracy.hallucination_penalty, 2.0);
    }

    #[test]
    fn all_default_weights_are_positive() {
        let w = RewardWeights::default();
        for agent in AgentType::ALL {
            for leaf in w.leaves_for(agent) {
                assert!(leaf.value > 0.0, "{agent} {} is not positive", leaf.path());
            }
        }
        assert_eq!(w.first_non_finite(), None);
    }

    #[test]
    fn partial_table_keeps_other_agents() {
        let toml_like = serde_json::json!({
            "storer": {
                "immediate": {"user_acceptance": 2.0, "edit_distance": 0.5},
                "delayed": {"corpus_coherence": 0.7, "findability": 0.6, "duplication_penalty": 0.4}
            }
        });
        let w: RewardWeights = serde_json::from_value(toml_like).unwrap();
        assert_eq!(w.storer.immediate.user_acceptance, 2.0);
        assert_eq!(w.filer, RewardWeights::default().filer);
    }

    #[test]
    fn unknown_agent_table_is_rejected() {
        let bad = serde_json::json!({"summarizer": {}});
        assert!(serde_json::from_value::<RewardWeights>(bad).is_err());
    }

    #[test]
    fn non_finite_weight_is_reported() {
        let mut w = RewardWeights::default();
        w.prioritizer.contextual.flow_maintenance = f64::NAN;
        assert_eq!(
            w.first_non_finite(),
            Some((AgentType::Prioritizer, "contextual.flow_maintenance".to_string()))
        );
    }
}
