use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ecg_tutor::bot::{self, Navigator};
use ecg_tutor::catalog::Catalog;
use ecg_tutor::config::Config;
use ecg_tutor::context::AppContext;
use ecg_tutor::localization::LocalizationManager;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_tracing();

    info!("Starting ECG tutor Telegram bot");

    let config = Config::from_env().context("Invalid configuration")?;
    info!(config = ?config, "Configuration loaded");

    let catalog = Catalog::load(&config.catalog_path)
        .with_context(|| format!("Cannot load case catalog {}", config.catalog_path.display()))?;

    let localization = LocalizationManager::new(&config.settings.default_language)
        .context("Cannot load translations")?;

    let ctx = Arc::new(AppContext::new(catalog, localization, config.settings.clone()));
    let navigator = Navigator::new(ctx);

    let bot = Bot::new(config.bot_token);

    info!("Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![navigator])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
