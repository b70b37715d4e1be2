//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use super::navigation::{Event, Navigator};
use super::transport::{MessageRef, TelegramTransport};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, navigator: Navigator) -> Result<()> {
    let data = q.data.clone().unwrap_or_default();
    debug!(user_id = %q.from.id, token = %data, "Received callback query from user");

    // Buttons on inline-mode messages carry no chat to answer in
    let Some(message) = &q.message else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let chat_id = message.chat().id;
    let event = Event::button(data, Some(MessageRef(message.id().0)))
        .with_language(q.from.language_code.clone());

    let transport = TelegramTransport::for_callback(bot, chat_id, q.clone());
    navigator.dispatch(&event, &transport).await;

    Ok(())
}
