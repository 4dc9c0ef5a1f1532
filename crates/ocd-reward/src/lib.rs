//! # ocd-reward
//!
//! The scoring engine. Pure and synchronous: it never touches storage.
//!
//! - [`components`]: fixed component tree per agent
//! - [`calculators`]: `(decision, context) -> tree`, one per agent
//! - [`weights`]: the tunable weight table (same types as the trees)
//! - [`aggregate`]: weighted sum and the `[-5, 5]` clamp
//! - [`export`]: training-data JSONL formatting

pub mod aggregate;
pub mod calculators;
pub mod components;
pub mod context;
pub mod error;
pub mod export;
pub mod weights;

use ocd_core::entities::Decision;

pub use aggregate::{REWARD_BOUND, aggregate, clamp_reward};
pub use components::{ComponentTree, RewardComponents};
pub use context::{FocusPolicy, RewardContext, RewardPolicy, StrategicFocus};
pub use error::RewardError;
pub use weights::RewardWeights;

/// A computed reward together with the breakdown it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scored {
    pub components: RewardComponents,
    pub reward: f64,
}

/// Compute components and the clamped reward for a decision.
#[must_use]
pub fn score(decision: &Decision, ctx: &RewardContext, weights: &RewardWeights) -> Scored {
    let components = calculators::compute(decision, ctx);
    let reward = aggregate(&components, weights);
    tracing::debug!(
        decision_id = %decision.id,
        agent = %decision.agent_type(),
        reward,
        "Computed reward"
    );
    Scored { components, reward }
}
