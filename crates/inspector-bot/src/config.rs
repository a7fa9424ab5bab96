//! Configuration management for inspector-bot

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use sticker_export::batch::DEFAULT_BATCH_SIZE;
use sticker_export::pipeline::ExportOptions;
use sticker_export::thumbnail::DEFAULT_THUMBNAIL_ATTEMPTS;

/// Complete bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Telegram specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    /// Chat that receives operator alerts; alerts are disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator_chat_id: Option<i64>,
}

/// Sticker export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Stickers per archive part
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Thumbnail derivation attempts before a part ships without one
    #[serde(default = "default_thumbnail_attempts")]
    pub thumbnail_attempts: usize,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token =
            std::env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN not set")?;

        let operator_chat_id = std::env::var("OPERATOR_CHAT_ID")
            .ok()
            .and_then(|v| v.parse().ok());

        Ok(Config {
            telegram: TelegramConfig {
                bot_token,
                operator_chat_id,
            },
            export: ExportConfig::default(),
        })
    }

    /// Export pipeline options derived from this configuration
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            batch_size: self.export.batch_size,
            thumbnail_attempts: self.export.thumbnail_attempts,
        }
    }
}

fn default_bot_token() -> String {
    std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_thumbnail_attempts() -> usize {
    DEFAULT_THUMBNAIL_ATTEMPTS
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            thumbnail_attempts: default_thumbnail_attempts(),
        }
    }
}
