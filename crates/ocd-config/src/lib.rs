//! # ocd-config
//!
//! Layered configuration loading for OCD using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`OCD_*` prefix, `__` as separator)
//! 2. Project-level `.ocd/config.toml`
//! 3. User-level `~/.config/ocd/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! `OCD_GENERAL__DATA_DIR` -> `general.data_dir`,
//! `OCD_WEIGHTS__FILER__IMMEDIATE__USER_FEEDBACK` -> `weights.filer.immediate.user_feedback`.
//!
//! # Usage
//!
//! ```no_run
//! use ocd_config::OcdConfig;
//!
//! let config = OcdConfig::load_with_dotenv().expect("config");
//! let policy = config.reward_policy();
//! assert_eq!(policy.focus.window_days, config.reward.goal_window_days);
//! ```

mod error;
mod export;
mod general;
mod reward;

pub use error::ConfigError;
pub use export::ExportConfig;
pub use general::GeneralConfig;
pub use reward::RewardConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use ocd_reward::{FocusPolicy, RewardPolicy, RewardWeights};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OcdConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub reward: RewardConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub weights: RewardWeights,
}

impl OcdConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer more providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".ocd/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("OCD_").split("__"))
    }

    /// Reject values the scoring engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::InvalidValue {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.reward.goal_window_days == 0 {
            return Err(invalid("reward.goal_window_days", "must be greater than 0"));
        }
        if self.reward.batch_page_size == 0 {
            return Err(invalid("reward.batch_page_size", "must be greater than 0"));
        }
        if self.reward.strategic_labels.is_empty() {
            return Err(invalid(
                "reward.strategic_labels",
                "at least one label is required",
            ));
        }
        if !self.export.min_reward.is_finite() {
            return Err(invalid("export.min_reward", "must be a finite number"));
        }
        if let Some((agent, path)) = self.weights.first_non_finite() {
            return Err(ConfigError::InvalidValue {
                field: format!("weights.{}.{path}", agent.as_str().to_lowercase()),
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }

    /// Weights and focus tuning for the scoring engine.
    #[must_use]
    pub fn reward_policy(&self) -> RewardPolicy {
        RewardPolicy {
            weights: self.weights,
            focus: FocusPolicy {
                window_days: self.reward.goal_window_days,
                labels: self.reward.strategic_labels.clone(),
            },
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ocd").join("config.toml"))
    }

    /// Load `.env` from the workspace root, walking up from
    /// `CARGO_MANIFEST_DIR` and falling back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = OcdConfig::default();
        config.validate().unwrap();
        assert_eq!(config.general.default_limit, 20);
        assert_eq!(config.export.limit, 1000);
        assert_eq!(config.weights, RewardWeights::default());
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: OcdConfig = OcdConfig::figment().extract()?;
            assert_eq!(config.reward.batch_page_size, 100);
            assert!((config.export.min_reward + 2.0).abs() < f64::EPSILON);
            Ok(())
        });
    }

    #[test]
    fn policy_mirrors_config() {
        let mut config = OcdConfig::default();
        config.reward.goal_window_days = 14;
        config.weights.storer.immediate.edit_distance = 0.9;
        let policy = config.reward_policy();
        assert_eq!(policy.focus.window_days, 14);
        assert_eq!(policy.focus.labels, config.reward.strategic_labels);
        assert!((policy.weights.storer.immediate.edit_distance - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_window() {
        let mut config = OcdConfig::default();
        config.reward.goal_window_days = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("reward.goal_window_days"));
    }

    #[test]
    fn rejects_non_finite_weight() {
        let mut config = OcdConfig::default();
        config.weights.librarian.delayed.dependency_accuracy = f64::INFINITY;
        let err = config.validate().unwrap_err();
        assert!(
            err.to_string()
                .contains("weights.librarian.delayed.dependency_accuracy")
        );
    }
}
