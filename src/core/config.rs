//! Application configuration management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::models::{AudioBitrate, CookieBrowser, MediaKind, PlayerClient};

/// Main application configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub defaults: DownloadDefaults,
    pub tuning: DownloadTuning,
    pub ui: UiConfig,
}

/// Values pre-filled into the download form on startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadDefaults {
    pub destination: Option<String>,
    pub kind: MediaKind,
    pub bitrate: AudioBitrate,
    pub client: PlayerClient,
    pub cookies: Option<CookieBrowser>,
    pub user_agent: Option<String>,
    pub verbose: bool,
}

/// Engine tuning flags passed straight through to yt-dlp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadTuning {
    pub retries: u32,
    pub fragment_retries: u32,
    pub concurrent_fragments: u32,
    pub http_chunk_size: String,
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub remember_last_destination: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: DownloadDefaults::default(),
            tuning: DownloadTuning::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for DownloadDefaults {
    fn default() -> Self {
        Self {
            destination: None,
            kind: MediaKind::default(),
            bitrate: AudioBitrate::default(),
            client: PlayerClient::default(),
            cookies: None,
            user_agent: None,
            verbose: false,
        }
    }
}

impl Default for DownloadTuning {
    fn default() -> Self {
        Self {
            retries: 10,
            fragment_retries: 10,
            concurrent_fragments: 1,
            http_chunk_size: "10M".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 980,
            window_height: 780,
            remember_last_destination: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from file, creating default if not exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: AppConfig =
                serde_json::from_str(&content).with_context(|| "Failed to parse config file")?;

            config.validate().with_context(|| "Stored configuration is invalid")?;
            tracing::info!("Loaded configuration from: {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        tracing::info!("Saved configuration to: {:?}", config_path);
        Ok(())
    }

    /// Get the path to the configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "tunegrab", "app")
            .with_context(|| "Failed to get project directories")?;

        Ok(project_dirs.config_dir().join("config.json"))
    }

    /// Reset configuration to defaults
    pub fn reset() -> Result<Self> {
        let config = Self::default();
        config.save()?;
        tracing::info!("Reset configuration to defaults");
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.tuning.retries > 50 {
            anyhow::bail!("Retries should not exceed 50");
        }

        if self.tuning.concurrent_fragments == 0 || self.tuning.concurrent_fragments > 16 {
            anyhow::bail!("Concurrent fragments should be between 1 and 16");
        }

        if self.tuning.http_chunk_size.is_empty() {
            anyhow::bail!("HTTP chunk size must not be empty");
        }

        if self.ui.window_width < 640 || self.ui.window_width > 4000 {
            anyhow::bail!("Window width should be between 640 and 4000 pixels");
        }

        if self.ui.window_height < 480 || self.ui.window_height > 3000 {
            anyhow::bail!("Window height should be between 480 and 3000 pixels");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.tuning.retries, 10);
        assert_eq!(parsed.tuning.http_chunk_size, "10M");
        assert_eq!(parsed.defaults.bitrate, AudioBitrate::Kbps192);
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();
        config.tuning.concurrent_fragments = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.tuning.http_chunk_size.clear();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.ui.window_width = 100;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tuning_defaults_match_engine_expectations() {
        let tuning = DownloadTuning::default();
        assert_eq!(tuning.retries, 10);
        assert_eq!(tuning.fragment_retries, 10);
        assert_eq!(tuning.concurrent_fragments, 1);
    }
}
