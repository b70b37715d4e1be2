//! # Bot Configuration Module
//!
//! Process configuration read from the environment (after `.env` is loaded).
//! Only the bot credential is required; everything else has a default.

use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ConfigError;

// Defaults
pub const DEFAULT_CATALOG_PATH: &str = "data/cases.json";
pub const DEFAULT_CASES_PER_PAGE: usize = 8;
pub const MAX_CASES_PER_PAGE: usize = 50;
pub const DEFAULT_MEDIA_TIMEOUT_SECS: u64 = 20;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024; // Telegram photo upload limit
pub const DEFAULT_LANGUAGE: &str = "ar";

/// Settings that shape rendering and delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotSettings {
    /// Number of cases per case-list page
    pub cases_per_page: usize,
    /// Upper bound for a single photo delivery attempt
    pub media_timeout: Duration,
    /// Largest image file that will be uploaded
    pub max_image_bytes: u64,
    /// Language used when the user's language is unknown or unsupported
    pub default_language: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            cases_per_page: DEFAULT_CASES_PER_PAGE,
            media_timeout: Duration::from_secs(DEFAULT_MEDIA_TIMEOUT_SECS),
            max_image_bytes: MAX_IMAGE_BYTES,
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Full process configuration
#[derive(Clone)]
pub struct Config {
    pub bot_token: String,
    pub catalog_path: PathBuf,
    pub settings: BotSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bot_token", &"<redacted>")
            .field("catalog_path", &self.catalog_path)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Config {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .or_else(|| lookup("TELEGRAM_BOT_TOKEN"))
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        let cases_per_page = parse_or(&lookup, "CASES_PER_PAGE", DEFAULT_CASES_PER_PAGE)?;
        if cases_per_page == 0 || cases_per_page > MAX_CASES_PER_PAGE {
            return Err(ConfigError::InvalidValue {
                key: "CASES_PER_PAGE".to_string(),
                value: cases_per_page.to_string(),
            });
        }

        let media_timeout_secs = parse_or(&lookup, "MEDIA_TIMEOUT_SECS", DEFAULT_MEDIA_TIMEOUT_SECS)?;
        if media_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MEDIA_TIMEOUT_SECS".to_string(),
                value: media_timeout_secs.to_string(),
            });
        }

        let max_image_bytes = parse_or(&lookup, "MAX_IMAGE_BYTES", MAX_IMAGE_BYTES)?;

        let default_language = lookup("DEFAULT_LANGUAGE")
            .map(|lang| lang.trim().to_lowercase())
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Ok(Self {
            bot_token,
            catalog_path,
            settings: BotSettings {
                cases_per_page,
                media_timeout: Duration::from_secs(media_timeout_secs),
                max_image_bytes,
                default_language,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
