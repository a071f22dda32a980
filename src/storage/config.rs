//! JSON Configuration Management
//!
//! Handles reading and writing the application configuration file.
//! API keys come from the environment and are never written back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir, ensure_studylink_dir};

pub const EMBEDDING_API_KEY_ENV: &str = "STUDYLINK_EMBEDDING_API_KEY";
pub const LLM_API_KEY_ENV: &str = "STUDYLINK_LLM_API_KEY";

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Load `~/.studylink/config.json`, creating it with defaults if missing
    pub fn new() -> AppResult<Self> {
        ensure_studylink_dir()?;
        Self::open(config_path()?)
    }

    /// Load the config at `path`, creating it with defaults if missing
    pub fn open(config_path: PathBuf) -> AppResult<Self> {
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            if let Some(parent) = config_path.parent() {
                ensure_dir(parent)?;
            }
            let default_config = AppConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            default_config
        };
        apply_env_keys(&mut config, |name| std::env::var(name).ok());

        tracing::info!(path = %config_path.display(), "configuration loaded");
        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting, keys removed
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(&config.redacted())?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the current configuration
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Update the configuration with a partial update
    ///
    /// Keys already loaded from the environment survive section updates
    /// that do not carry their own key.
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        if next.embedding.api_key.is_none() {
            next.embedding.api_key = self.config.embedding.api_key.clone();
        }
        if next.llm.api_key.is_none() {
            next.llm.api_key = self.config.llm.api_key.clone();
        }
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    /// Save the current configuration to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.config)
    }

    /// Reset configuration to defaults, keeping API keys from the environment
    pub fn reset(&mut self) -> AppResult<()> {
        self.reset_with(|name| std::env::var(name).ok())
    }

    fn reset_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        apply_env_keys(&mut config, lookup);
        Self::save_to_file(&self.config_path, &config)?;
        self.config = config;
        Ok(())
    }
}

/// Fill API keys from the environment.
fn apply_env_keys<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    if let Some(key) = non_blank(EMBEDDING_API_KEY_ENV) {
        config.embedding.api_key = Some(key);
    }
    if let Some(key) = non_blank(LLM_API_KEY_ENV) {
        config.llm.api_key = Some(key);
    }
}
