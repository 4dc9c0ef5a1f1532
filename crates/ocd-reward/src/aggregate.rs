//! Weighted aggregation and the reward clamp.

use crate::components::{ComponentTree, RewardComponents};
use crate::weights::RewardWeights;

/// Rewards are hard-clamped to `[-REWARD_BOUND, REWARD_BOUND]`.
pub const REWARD_BOUND: f64 = 5.0;

/// Truncate to the reward range. NaN maps to 0.
#[must_use]
pub fn clamp_reward(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-REWARD_BOUND, REWARD_BOUND)
}

/// Weighted sum of a component tree, clamped.
#[must_use]
pub fn aggregate(components: &RewardComponents, weights: &RewardWeights) -> f64 {
    let raw = match components {
        RewardComponents::Filer(c) => c.weighted_sum(&weights.filer),
        RewardComponents::Librarian(c) => c.weighted_sum(&weights.librarian),
        RewardComponents::Prioritizer(c) => c.weighted_sum(&weights.prioritizer),
        RewardComponents::Storer(c) => c.weighted_sum(&weights.storer),
        RewardComponents::Retriever(c) => c.weighted_sum(&weights.retriever),
    };
    clamp_reward(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{
        LibrarianComponents, LibrarianDelayed, LibrarianImmediate, RetrieverAccuracy,
        RetrieverComponents,
    };
    use ocd_core::enums::AgentType;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(4.99, 4.99)]
    #[case(5.0, 5.0)]
    #[case(5.000_1, 5.0)]
    #[case(-5.0, -5.0)]
    #[case(-123.0, -5.0)]
    #[case(f64::INFINITY, 5.0)]
    #[case(f64::NEG_INFINITY, -5.0)]
    #[case(f64::NAN, 0.0)]
    fn clamp_is_a_hard_bound(#[case] input: f64, #[case] expected: f64) {
        assert_eq!(clamp_reward(input), expected);
    }

    #[test]
    fn zero_tree_aggregates_to_zero() {
        let w = RewardWeights::default();
        for agent in AgentType::ALL {
            assert_eq!(aggregate(&RewardComponents::zero(agent), &w), 0.0);
        }
    }

    #[test]
    fn weights_apply_per_leaf() {
        let c = RewardComponents::Librarian(LibrarianComponents {
            immediate: LibrarianImmediate { user_feedback: 1.0 },
            delayed: LibrarianDelayed {
                conflict_prevention: 1.0,
                false_positive_penalty: -0.5,
                ..LibrarianDelayed::default()
            },
        });
        // 1.0*1.0 + 1.0*2.0 + -0.5*0.5
        assert!((aggregate(&c, &RewardWeights::default()) - 2.75).abs() < 1e-12);
    }

    #[test]
    fn extreme_components_hit_the_floor() {
        let c = RewardComponents::Retriever(RetrieverComponents {
            accuracy: RetrieverAccuracy {
                hallucination_penalty: -40.0,
                ..RetrieverAccuracy::default()
            },
            ..RetrieverComponents::default()
        });
        assert_eq!(aggregate(&c, &RewardWeights::default()), -REWARD_BOUND);
    }
}
