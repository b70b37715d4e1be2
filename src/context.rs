//! Immutable state shared by every update handler.

use crate::catalog::Catalog;
use crate::config::BotSettings;
use crate::localization::LocalizationManager;

/// Catalog, translations and settings, built once at startup
pub struct AppContext {
    pub catalog: Catalog,
    pub localization: LocalizationManager,
    pub settings: BotSettings,
}

impl AppContext {
    pub fn new(catalog: Catalog, localization: LocalizationManager, settings: BotSettings) -> Self {
        Self {
            catalog,
            localization,
            settings,
        }
    }

    /// Language to render in for a Telegram user language code
    pub fn language_for(&self, language_code: Option<&str>) -> &str {
        self.localization.detect_language(language_code)
    }
}
