use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{KakeiboError, Result};

/// Top-level configuration for the kakeibo application.
///
/// Loaded from `~/.kakeibo/config.toml` by default. Each section corresponds
/// to one crate's concerns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KakeiboConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl KakeiboConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KakeiboConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| KakeiboError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for the SQLite database.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.kakeibo".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Conversation and query settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Currency label appended to amounts in replies.
    pub currency: String,
    /// Suggested category labels, in display order. Advisory only: the
    /// wizard accepts any free-text category.
    pub categories: Vec<String>,
    /// Maximum accepted message length in characters.
    pub max_message_length: usize,
    /// Minutes of inactivity after which a wizard session is discarded.
    /// 0 disables the timeout.
    pub session_timeout_minutes: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            currency: "jpy".to_string(),
            categories: [
                "Groceries",
                "Car",
                "Cafe",
                "Rent",
                "Utilities",
                "Health",
                "Hobby",
                "Entertainment",
                "Travel",
                "Other",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
            max_message_length: 2000,
            session_timeout_minutes: 30,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database filename inside the data directory.
    pub db_filename: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_filename: "expenses.db".to_string(),
        }
    }
}
