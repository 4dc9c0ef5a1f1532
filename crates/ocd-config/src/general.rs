//! General application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    ".ocd".to_string()
}

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

const fn default_trail_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Directory holding `ocd.db` and the `trail/` files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Whether mutations are also appended to the JSONL trail.
    #[serde(default = "default_trail_enabled")]
    pub trail_enabled: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_limit: default_limit(),
            trail_enabled: default_trail_enabled(),
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("ocd.db")
    }

    #[must_use]
    pub fn trail_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("trail")
    }
}
