//! Transport module: the messaging capabilities the navigation layer needs
//!
//! `Transport` is implemented once for Telegram and by recording fakes in
//! tests. An instance is bound to the chat (and callback query) of a single
//! update.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::{ApiError, RequestError};
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
};
use tracing::debug;

use crate::errors::TransportError;
use crate::media::ImageResource;

use super::ui_builder::{RenderedView, TextFormat};

/// Identifies a message in the chat the transport is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef(pub i32);

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a new text message with the view's keyboard
    async fn send_text(&self, view: &RenderedView) -> Result<MessageRef, TransportError>;

    /// Replace the text and keyboard of an existing message
    async fn edit_text(&self, target: MessageRef, view: &RenderedView) -> Result<(), TransportError>;

    /// Remove a message
    async fn delete(&self, target: MessageRef) -> Result<(), TransportError>;

    /// Send a photo with the view's text as caption
    async fn send_photo(
        &self,
        image: ImageResource,
        view: &RenderedView,
    ) -> Result<MessageRef, TransportError>;

    /// Answer the button press, optionally with a popup alert
    async fn acknowledge(&self, alert: Option<&str>) -> Result<(), TransportError>;
}

/// Convert rendered buttons into a Telegram inline keyboard
pub fn create_keyboard(view: &RenderedView) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(view.buttons.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn transport_error(err: RequestError) -> TransportError {
    TransportError(err.to_string())
}

/// Editing a message to its current content is not a failure
fn edit_result<T>(result: Result<T, RequestError>) -> Result<(), TransportError> {
    match result {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(e) => Err(transport_error(e)),
    }
}

/// Telegram implementation of `Transport`
pub struct TelegramTransport {
    bot: Bot,
    chat_id: ChatId,
    callback: Option<CallbackQuery>,
}

impl TelegramTransport {
    /// Transport for an update that arrived as a message
    pub fn for_chat(bot: Bot, chat_id: ChatId) -> Self {
        Self {
            bot,
            chat_id,
            callback: None,
        }
    }

    /// Transport for a button press
    pub fn for_callback(bot: Bot, chat_id: ChatId, callback: CallbackQuery) -> Self {
        Self {
            bot,
            chat_id,
            callback: Some(callback),
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, view: &RenderedView) -> Result<MessageRef, TransportError> {
        let mut request = self.bot.send_message(self.chat_id, view.text.clone());
        if view.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if !view.buttons.is_empty() {
            request = request.reply_markup(create_keyboard(view));
        }

        let sent = request.await.map_err(transport_error)?;
        Ok(MessageRef(sent.id.0))
    }

    async fn edit_text(&self, target: MessageRef, view: &RenderedView) -> Result<(), TransportError> {
        let mut request = self
            .bot
            .edit_message_text(self.chat_id, MessageId(target.0), view.text.clone());
        if view.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if !view.buttons.is_empty() {
            request = request.reply_markup(create_keyboard(view));
        }

        edit_result(request.await)
    }

    async fn delete(&self, target: MessageRef) -> Result<(), TransportError> {
        self.bot
            .delete_message(self.chat_id, MessageId(target.0))
            .await
            .map_err(transport_error)?;
        Ok(())
    }

    async fn send_photo(
        &self,
        image: ImageResource,
        view: &RenderedView,
    ) -> Result<MessageRef, TransportError> {
        let photo = InputFile::memory(image.bytes).file_name(image.file_name);
        let mut request = self
            .bot
            .send_photo(self.chat_id, photo)
            .caption(view.text.clone());
        if view.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if !view.buttons.is_empty() {
            request = request.reply_markup(create_keyboard(view));
        }

        let sent = request.await.map_err(transport_error)?;
        Ok(MessageRef(sent.id.0))
    }

    async fn acknowledge(&self, alert: Option<&str>) -> Result<(), TransportError> {
        let Some(callback) = &self.callback else {
            return Ok(());
        };

        let mut request = self.bot.answer_callback_query(callback.id.clone());
        if let Some(text) = alert {
            request = request.text(text.to_string()).show_alert(true);
        }

        request.await.map_err(transport_error)?;
        debug!(chat_id = %self.chat_id, alert = alert.is_some(), "Callback query answered");
        Ok(())
    }
}
