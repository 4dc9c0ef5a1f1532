//! Training export defaults.

use ocd_reward::export::{DEFAULT_EXPORT_LIMIT, DEFAULT_MIN_REWARD};
use serde::{Deserialize, Serialize};

const fn default_export_limit() -> u32 {
    DEFAULT_EXPORT_LIMIT
}

const fn default_min_reward() -> f64 {
    DEFAULT_MIN_REWARD
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_limit")]
    pub limit: u32,

    /// Rewarded decisions below this are left out of exports.
    #[serde(default = "default_min_reward")]
    pub min_reward: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            limit: default_export_limit(),
            min_reward: default_min_reward(),
        }
    }
}
