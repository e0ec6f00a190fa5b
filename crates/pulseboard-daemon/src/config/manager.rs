//! Configuration manager

use std::sync::Arc;
use tokio::sync::RwLock;

use pulseboard_core::{
    Result as CoreResult,
    models::{DashboardConfig, Platform},
    storage::{ConfigStorage, init_config_dir},
};

/// Config manager error
#[derive(Debug, thiserror::Error)]
pub enum ConfigManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] pulseboard_core::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigManagerError>;

/// Holds the dashboard configuration and persists every accepted change
pub struct ConfigManager {
    storage: ConfigStorage,
    config: Arc<RwLock<DashboardConfig>>,
}

impl ConfigManager {
    pub fn new() -> CoreResult<Self> {
        let config_dir = init_config_dir()?;
        Self::with_storage(ConfigStorage::new(config_dir))
    }

    pub fn with_storage(storage: ConfigStorage) -> CoreResult<Self> {
        let config = storage.load()?;

        Ok(Self {
            storage,
            config: Arc::new(RwLock::new(config)),
        })
    }

    pub async fn get(&self) -> DashboardConfig {
        self.config.read().await.clone()
    }

    pub async fn update(&self, config: DashboardConfig) -> Result<DashboardConfig> {
        config
            .validate()
            .map_err(|e| ConfigManagerError::Invalid(e.to_string()))?;

        self.storage.save(&config)?;

        {
            let mut current = self.config.write().await;
            *current = config.clone();
        }

        Ok(config)
    }

    pub async fn update_daemon_config(
        &self,
        log_level: Option<String>,
        refresh_interval_secs: Option<u64>,
    ) -> Result<DashboardConfig> {
        let mut config = self.get().await;

        if let Some(level) = log_level {
            config.log_level = level;
        }

        if let Some(secs) = refresh_interval_secs {
            config.refresh_interval_secs = secs;
        }

        self.update(config).await
    }

    pub async fn set_platform_enabled(
        &self,
        platform: Platform,
        enabled: bool,
    ) -> Result<DashboardConfig> {
        let mut config = self.get().await;

        match platform {
            Platform::GitHub => config.github.enabled = enabled,
            Platform::AzureDevOps => config.azure_devops.enabled = enabled,
            Platform::Jira => config.jira.enabled = enabled,
        }

        self.update(config).await
    }

    /// Point the GitHub connector at a repository and enable it
    pub async fn configure_github(
        &self,
        owner: String,
        repo: String,
        api_url: Option<String>,
    ) -> Result<DashboardConfig> {
        let mut config = self.get().await;

        config.github.enabled = true;
        config.github.owner = owner;
        config.github.repo = repo;
        if let Some(url) = api_url {
            config.github.api_url = url;
        }

        self.update(config).await
    }

    pub async fn configure_azure_devops(
        &self,
        organization: String,
        project: String,
        base_url: Option<String>,
    ) -> Result<DashboardConfig> {
        let mut config = self.get().await;

        config.azure_devops.enabled = true;
        config.azure_devops.organization = organization;
        config.azure_devops.project = project;
        if let Some(url) = base_url {
            config.azure_devops.base_url = url;
        }

        self.update(config).await
    }

    pub async fn configure_jira(
        &self,
        base_url: String,
        username: String,
        project_key: String,
    ) -> Result<DashboardConfig> {
        let mut config = self.get().await;

        config.jira.enabled = true;
        config.jira.base_url = base_url;
        config.jira.username = username;
        config.jira.project_key = project_key;

        self.update(config).await
    }

    pub async fn reset_to_default(&self) -> Result<DashboardConfig> {
        self.update(DashboardConfig::default()).await
    }
}
