//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use super::navigation::{parse_command, Event, EventKind, Navigator, Notice, Outcome};
use super::transport::TelegramTransport;

/// Build the navigation event for a text message
pub fn text_event(text: &str, language_code: Option<String>) -> Event {
    let kind = match parse_command(text) {
        Some(name) => EventKind::Command(name),
        None => EventKind::FreeText(text.to_string()),
    };

    Event {
        kind,
        origin: None,
        language_code,
    }
}

pub async fn message_handler(bot: Bot, msg: Message, navigator: Navigator) -> Result<()> {
    // Extract user's language code from Telegram
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.clone());

    let transport = TelegramTransport::for_chat(bot, msg.chat.id);

    match msg.text() {
        Some(text) => {
            debug!(chat_id = %msg.chat.id, message_length = text.len(), "Received text message");
            let event = text_event(text, language_code);
            navigator.dispatch(&event, &transport).await;
        }
        None => {
            debug!(chat_id = %msg.chat.id, "Received unsupported message type");
            let event = Event::free_text("").with_language(language_code);
            navigator
                .deliver(&event, Outcome::Reply(Notice::HelpHint), &transport)
                .await;
        }
    }

    Ok(())
}
