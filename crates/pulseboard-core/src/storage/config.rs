//! Configuration storage operations

use crate::{Result, models::DashboardConfig};
use std::path::PathBuf;

const CONFIG_FILE: &str = "config.json";

pub struct ConfigStorage {
    config_dir: PathBuf,
}

impl ConfigStorage {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Load the config, writing defaults first when the file is missing or empty.
    pub fn load(&self) -> Result<DashboardConfig> {
        let config_path = self.path();

        if !config_path.exists() {
            let config = DashboardConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;

        if content.trim().is_empty() {
            let config = DashboardConfig::default();
            self.save(&config)?;
            return Ok(config);
        }

        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &DashboardConfig) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;

        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(self.path(), content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("pulseboard"));

        let config = storage.load().unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert!(storage.path().exists());
    }

    #[test]
    fn test_empty_file_is_replaced_with_default() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());
        std::fs::write(storage.path(), "  \n").unwrap();

        let config = storage.load().unwrap();
        assert_eq!(config.refresh_interval_secs, 300);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());

        let mut config = DashboardConfig::default();
        config.jira.enabled = true;
        config.jira.base_url = "https://acme.atlassian.net".to_string();
        config.jira.username = "pm@acme.io".to_string();
        config.jira.project_key = "PAY".to_string();
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().to_path_buf());

        std::fs::write(storage.path(), "{not json").unwrap();
        assert!(matches!(storage.load(), Err(Error::Json(_))));

        let mut config = DashboardConfig::default();
        config.log_level = "loud".to_string();
        std::fs::write(storage.path(), serde_json::to_string(&config).unwrap()).unwrap();
        assert!(matches!(storage.load(), Err(Error::Validation(_))));
    }
}
