//! Scoring knobs other than the weight table.

use ocd_reward::context::{DEFAULT_GOAL_WINDOW_DAYS, default_strategic_labels};
use serde::{Deserialize, Serialize};

const fn default_goal_window_days() -> u32 {
    DEFAULT_GOAL_WINDOW_DAYS
}

const fn default_batch_page_size() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewardConfig {
    /// Trailing window, in days, for the strategic focus count.
    #[serde(default = "default_goal_window_days")]
    pub goal_window_days: u32,

    /// Competing strategic labels. Earlier labels win ties.
    #[serde(default = "default_strategic_labels")]
    pub strategic_labels: Vec<String>,

    /// Decisions fetched per page by the pending-reward batch job.
    #[serde(default = "default_batch_page_size")]
    pub batch_page_size: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            goal_window_days: default_goal_window_days(),
            strategic_labels: default_strategic_labels(),
            batch_page_size: default_batch_page_size(),
        }
    }
}
