//! Component trees: the fixed two-level shape of every agent's reward.
//!
//! The same struct serves as the computed breakdown and as the weight table
//! for that agent, so the two shapes cannot drift apart.

use ocd_core::enums::AgentType;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::RewardError;

/// One named numeric leaf of a component tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub group: &'static str,
    pub name: &'static str,
    pub value: f64,
}

impl Leaf {
    /// Dotted path, e.g. `immediate.user_feedback`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }
}

/// A fixed-shape tree of reward components.
pub trait ComponentTree {
    /// Leaves in declaration order.
    fn leaves(&self) -> Vec<Leaf>;

    /// Sum of `self[path] * weights[path]` over every leaf, unclamped.
    fn weighted_sum(&self, weights: &Self) -> f64
    where
        Self: Sized,
    {
        self.leaves()
            .iter()
            .zip(weights.leaves())
            .map(|(c, w)| c.value * w.value)
            .sum()
    }
}

macro_rules! reward_tree {
    (
        $(#[$meta:meta])*
        $tree:ident {
            $( $group:ident : $group_ty:ident { $( $leaf:ident ),+ $(,)? } ),+ $(,)?
        }
    ) => {
        $(
            #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
            #[serde(deny_unknown_fields)]
            pub struct $group_ty {
                $( pub $leaf: f64, )+
            }
        )+

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
        #[serde(deny_unknown_fields)]
        pub struct $tree {
            $( pub $group: $group_ty, )+
        }

        impl ComponentTree for $tree {
            fn leaves(&self) -> Vec<Leaf> {
                vec![
                    $( $(
                        Leaf {
                            group: stringify!($group),
                            name: stringify!($leaf),
                            value: self.$group.$leaf,
                        },
                    )+ )+
                ]
            }
        }
    };
}

reward_tree! {
    FilerComponents {
        immediate: FilerImmediate { user_feedback, confidence_calibration },
        delayed: FilerDelayed { completion_success, blockage_avoidance, rework_penalty, time_efficiency },
        strategic: FilerStrategic { goal_alignment, opportunity_cost },
    }
}

reward_tree! {
    LibrarianComponents {
        immediate: LibrarianImmediate { user_feedback },
        delayed: LibrarianDelayed {
            conflict_prevention,
            false_positive_penalty,
            missed_issue_penalty,
            dependency_accuracy,
        },
    }
}

reward_tree! {
    PrioritizerComponents {
        immediate: PrioritizerImmediate { user_acceptance },
        delayed: PrioritizerDelayed { completion_success, time_efficiency, strategic_progress, opportunity_cost },
        contextual: PrioritizerContextual { energy_alignment, flow_maintenance },
    }
}

reward_tree! {
    StorerComponents {
        immediate: StorerImmediate { user_acceptance, edit_distance },
        delayed: StorerDelayed { corpus_coherence, findability, duplication_penalty },
    }
}

reward_tree! {
    RetrieverComponents {
        immediate: RetrieverImmediate { user_acceptance, edit_distance },
        accuracy: RetrieverAccuracy { citation_correctness, hallucination_penalty, completeness },
        quality: RetrieverQuality { coherence, style_alignment },
    }
}

/// A computed breakdown for any agent.
///
/// Serializes as the bare tree (no tag); the agent type is always known from
/// the decision it belongs to, so parsing goes through [`Self::from_value`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RewardComponents {
    Filer(FilerComponents),
    Librarian(LibrarianComponents),
    Prioritizer(PrioritizerComponents),
    Storer(StorerComponents),
    Retriever(RetrieverComponents),
}

impl RewardComponents {
    /// An all-zero tree for the agent.
    #[must_use]
    pub fn zero(agent: AgentType) -> Self {
        match agent {
            AgentType::Filer => Self::Filer(FilerComponents::default()),
            AgentType::Librarian => Self::Librarian(LibrarianComponents::default()),
            AgentType::Prioritizer => Self::Prioritizer(PrioritizerComponents::default()),
            AgentType::Storer => Self::Storer(StorerComponents::default()),
            AgentType::Retriever => Self::Retriever(RetrieverComponents::default()),
        }
    }

    #[must_use]
    pub const fn agent_type(&self) -> AgentType {
        match self {
            Self::Filer(_) => AgentType::Filer,
            Self::Librarian(_) => AgentType::Librarian,
            Self::Prioritizer(_) => AgentType::Prioritizer,
            Self::Storer(_) => AgentType::Storer,
            Self::Retriever(_) => AgentType::Retriever,
        }
    }

    #[must_use]
    pub fn leaves(&self) -> Vec<Leaf> {
        match self {
            Self::Filer(c) => c.leaves(),
            Self::Librarian(c) => c.leaves(),
            Self::Prioritizer(c) => c.leaves(),
            Self::Storer(c) => c.leaves(),
            Self::Retriever(c) => c.leaves(),
        }
    }

    /// Parse a stored tree for a known agent.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::Components` if the JSON does not have the agent's
    /// exact tree shape.
    pub fn from_value(agent: AgentType, value: serde_json::Value) -> Result<Self, RewardError> {
        let wrap = |source| RewardError::Components { agent, source };
        Ok(match agent {
            AgentType::Filer => Self::Filer(serde_json::from_value(value).map_err(wrap)?),
            AgentType::Librarian => Self::Librarian(serde_json::from_value(value).map_err(wrap)?),
            AgentType::Prioritizer => {
                Self::Prioritizer(serde_json::from_value(value).map_err(wrap)?)
            }
            AgentType::Storer => Self::Storer(serde_json::from_value(value).map_err(wrap)?),
            AgentType::Retriever => Self::Retriever(serde_json::from_value(value).map_err(wrap)?),
        })
    }

    /// # Errors
    ///
    /// Returns `RewardError::Serialize` if the tree cannot be encoded.
    pub fn to_value(&self) -> Result<serde_json::Value, RewardError> {
        serde_json::to_value(self).map_err(RewardError::Serialize)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.leaves().iter().all(|l| l.value == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn filer_leaves_in_declaration_order() {
        let paths: Vec<String> = FilerComponents::default()
            .leaves()
            .iter()
            .map(Leaf::path)
            .collect();
        assert_eq!(
            paths,
            vec![
                "immediate.user_feedback",
                "immediate.confidence_calibration",
                "delayed.completion_success",
                "delayed.blockage_avoidance",
                "delayed.rework_penalty",
                "delayed.time_efficiency",
                "strategic.goal_alignment",
                "strategic.opportunity_cost",
            ]
        );
    }

    #[test]
    fn serializes_as_bare_tree() {
        let c = RewardComponents::Librarian(LibrarianComponents {
            immediate: LibrarianImmediate { user_feedback: 1.0 },
            delayed: LibrarianDelayed {
                conflict_prevention: 1.0,
                ..LibrarianDelayed::default()
            },
        });
        let json = c.to_value().unwrap();
        assert_eq!(json["immediate"]["user_feedback"], json!(1.0));
        assert!(json.get("agent_type").is_none());

        let back = RewardComponents::from_value(AgentType::Librarian, json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn typo_in_leaf_is_rejected() {
        let bad = json!({
            "immediate": {"user_acceptence": 1.0, "edit_distance": 0.0},
            "delayed": {"corpus_coherence": 0.0, "findability": 0.0, "duplication_penalty": 0.0}
        });
        let err = RewardComponents::from_value(AgentType::Storer, bad).unwrap_err();
        assert!(matches!(err, RewardError::Components { agent: AgentType::Storer, .. }));
    }

    #[test]
    fn wrong_agent_shape_is_rejected() {
        let storer = RewardComponents::zero(AgentType::Storer).to_value().unwrap();
        assert!(RewardComponents::from_value(AgentType::Librarian, storer).is_err());
    }

    #[test]
    fn zero_tree_for_every_agent() {
        for agent in AgentType::ALL {
            let z = RewardComponents::zero(agent);
            assert_eq!(z.agent_type(), agent);
            assert!(z.is_zero());
        }
    }
}
