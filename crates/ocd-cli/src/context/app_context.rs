use anyhow::Context;
use ocd_config::OcdConfig;
use ocd_db::service::OcdService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: OcdService,
    pub config: OcdConfig,
}

impl AppContext {
    /// Open the store under `config.general.data_dir`, creating it if needed.
    pub async fn init(config: OcdConfig) -> anyhow::Result<Self> {
        let data_dir = &config.general.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {data_dir}"))?;

        let db_path = config.general.db_path();
        let trail_dir = config
            .general
            .trail_enabled
            .then(|| config.general.trail_dir());

        let service = OcdService::new_local(
            &db_path.to_string_lossy(),
            trail_dir,
            config.reward_policy(),
        )
        .await
        .context("failed to initialize ocd-db service")?;

        tracing::debug!(db = %db_path.display(), "Opened decision store");
        Ok(Self { service, config })
    }
}

/// Load layered config and apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<OcdConfig> {
    let mut config = OcdConfig::load_with_dotenv().context("failed to load ocd configuration")?;
    if let Some(dir) = &flags.data_dir {
        config.general.data_dir.clone_from(dir);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use ocd_config::OcdConfig;

    use super::AppContext;

    #[tokio::test]
    async fn init_creates_store_and_trail_dir() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut config = OcdConfig::default();
        config.general.data_dir = dir.path().join("nested").to_string_lossy().into_owned();

        let ctx = AppContext::init(config).await.expect("context should init");
        assert!(ctx.service.trail().is_enabled());
        assert!(dir.path().join("nested").join("ocd.db").exists());
        assert!(dir.path().join("nested").join("trail").is_dir());
    }

    #[tokio::test]
    async fn trail_can_be_disabled_in_config() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let mut config = OcdConfig::default();
        config.general.data_dir = dir.path().to_string_lossy().into_owned();
        config.general.trail_enabled = false;

        let ctx = AppContext::init(config).await.expect("context should init");
        assert!(!ctx.service.trail().is_enabled());
        assert!(!dir.path().join("trail").exists());
    }
}
