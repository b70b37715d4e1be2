//! Navigation module: maps incoming events to screens and delivers them
//!
//! `route` is a pure transition function; `dispatch` renders the result and
//! pushes it through a `Transport`. No state survives between events.

use rand::Rng;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::context::AppContext;
use crate::errors::BotError;
use crate::media::load_image;
use crate::screen::{CallbackToken, Screen};

use super::transport::{MessageRef, Transport};
use super::ui_builder::{RenderedView, ScreenRenderer};

/// What the user did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A slash command, without the leading slash or bot username
    Command(String),
    /// A button press carrying its callback data
    Button(String),
    /// Any other text message
    FreeText(String),
}

/// An incoming event with the context needed to answer it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Message holding the pressed button, if still accessible
    pub origin: Option<MessageRef>,
    /// The user's Telegram language code
    pub language_code: Option<String>,
}

impl Event {
    pub fn command(name: impl Into<String>) -> Self {
        Self::new(EventKind::Command(name.into()), None)
    }

    pub fn button(data: impl Into<String>, origin: Option<MessageRef>) -> Self {
        Self::new(EventKind::Button(data.into()), origin)
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        Self::new(EventKind::FreeText(text.into()), None)
    }

    fn new(kind: EventKind, origin: Option<MessageRef>) -> Self {
        Self {
            kind,
            origin,
            language_code: None,
        }
    }

    pub fn with_language(mut self, language_code: Option<String>) -> Self {
        self.language_code = language_code;
        self
    }
}

/// Fixed replies that are not screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    InvalidNumber,
    HelpHint,
}

/// Result of routing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Show a screen in place of the originating message
    Show(Screen),
    /// Send a screen as a new message and remove the originating one
    Prompt(Screen),
    /// Answer with a fixed text message
    Reply(Notice),
    /// Consume the event without changing anything
    Ignore,
}

/// Split "/start@EcgBot arg" into "start"
pub fn parse_command(text: &str) -> Option<String> {
    let body = text.trim().strip_prefix('/')?;
    let word = body.split_whitespace().next()?;
    let name = word.split('@').next().unwrap_or(word);
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Stateless router over the shared application context
#[derive(Clone)]
pub struct Navigator {
    ctx: Arc<AppContext>,
}

impl Navigator {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Route an event using the thread-local random generator
    pub fn route(&self, event: &EventKind) -> Outcome {
        self.route_with_rng(event, &mut rand::thread_rng())
    }

    /// Route an event; `rng` is only used for random quizzes
    pub fn route_with_rng<R: Rng + ?Sized>(&self, event: &EventKind, rng: &mut R) -> Outcome {
        match event {
            EventKind::Command(name) => match name.as_str() {
                "start" => Outcome::Show(Screen::MainMenu { returning: false }),
                "help" => Outcome::Reply(Notice::HelpHint),
                other => {
                    debug!(command = other, "Unknown command");
                    Outcome::Reply(Notice::HelpHint)
                }
            },
            EventKind::Button(data) => match data.parse::<CallbackToken>() {
                Ok(token) => self.route_token(token, rng),
                Err(e) => {
                    warn!(error = %e, "Ignoring button press");
                    Outcome::Ignore
                }
            },
            EventKind::FreeText(text) => self.route_text(text),
        }
    }

    fn route_token<R: Rng + ?Sized>(&self, token: CallbackToken, rng: &mut R) -> Outcome {
        match token {
            CallbackToken::MenuTeach => Outcome::Show(Screen::TeachIntro),
            CallbackToken::MenuCases => Outcome::Show(Screen::CaseList { page: 0 }),
            CallbackToken::MenuQuiz => Outcome::Show(Screen::QuizMenu),
            CallbackToken::CasesPage(page) => Outcome::Show(Screen::CaseList { page }),
            CallbackToken::Case(case_id) => Outcome::Show(Screen::CaseDetail { case_id }),
            CallbackToken::QuizCase(case_id) => Outcome::Show(Screen::QuizQuestion { case_id }),
            CallbackToken::QuizRandom => match self.ctx.catalog.random_case(rng) {
                Some(case) => Outcome::Show(Screen::QuizQuestion { case_id: case.id }),
                None => Outcome::Ignore,
            },
            CallbackToken::QuizByNumber => Outcome::Prompt(Screen::AwaitingCaseNumber),
            CallbackToken::Answer { case_id, option } => {
                match self.ctx.catalog.lookup(case_id) {
                    Some(case) if option >= case.quiz.options.len() => {
                        warn!(
                            error = %BotError::MalformedToken(token.to_string()),
                            "Answer option out of range"
                        );
                        Outcome::Ignore
                    }
                    // Unknown ids fall through to the renderer's not-found alert
                    _ => Outcome::Show(Screen::QuizResult {
                        case_id,
                        chosen: option,
                    }),
                }
            }
            CallbackToken::BackMain => Outcome::Show(Screen::MainMenu { returning: true }),
        }
    }

    fn route_text(&self, text: &str) -> Outcome {
        let text = text.trim();

        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            debug!(error = %BotError::UnrecognizedInput(text.to_string()), "Replying with help hint");
            return Outcome::Reply(Notice::HelpHint);
        }

        // Digit strings too long for u32 are out of range as well
        match text.parse::<u32>() {
            Ok(case_id) if case_id >= 1 && (case_id as usize) <= self.ctx.catalog.len() => {
                Outcome::Show(Screen::QuizQuestion { case_id })
            }
            _ => {
                debug!(input = text, "Case number out of range");
                Outcome::Reply(Notice::InvalidNumber)
            }
        }
    }

    /// Handle one event end to end. Never fails: problems are logged and
    /// answered with a fixed message or ignored.
    pub async fn dispatch<T: Transport + ?Sized>(&self, event: &Event, transport: &T) {
        let outcome = self.route(&event.kind);
        self.deliver(event, outcome, transport).await;
    }

    /// Deliver an already routed outcome
    pub async fn deliver<T: Transport + ?Sized>(&self, event: &Event, outcome: Outcome, transport: &T) {
        let language = self.ctx.language_for(event.language_code.as_deref());
        let renderer = ScreenRenderer::new(&self.ctx, language);
        let is_button = matches!(event.kind, EventKind::Button(_));

        debug!(outcome = ?outcome, "Event routed");

        let (screen, view) = match outcome {
            Outcome::Ignore => {
                self.acknowledge(transport, is_button, None).await;
                return;
            }
            Outcome::Reply(notice) => {
                self.acknowledge(transport, is_button, None).await;
                let view = match notice {
                    Notice::InvalidNumber => renderer.invalid_number(),
                    Notice::HelpHint => renderer.help_hint(),
                };
                send_or_log(transport, &view).await;
                return;
            }
            Outcome::Prompt(screen) => {
                self.acknowledge(transport, is_button, None).await;
                let view = renderer.render(&screen);
                if send_or_log(transport, &view).await {
                    remove_origin(transport, event.origin).await;
                }
                return;
            }
            Outcome::Show(screen) => (screen, renderer.render(&screen)),
        };

        if view.is_alert() {
            if let Some(case_id) = screen.case_id() {
                info!(error = %BotError::UnknownCaseId(case_id), "Showing not-found alert");
            }
            if is_button {
                self.acknowledge(transport, true, Some(&view.text)).await;
            } else {
                send_or_log(transport, &view).await;
            }
            return;
        }

        self.acknowledge(transport, is_button, None).await;

        match view.media.clone() {
            Some(path) => self.deliver_media(transport, event.origin, &path, &view).await,
            None => show_text(transport, event.origin, &view).await,
        }
    }

    async fn acknowledge<T: Transport + ?Sized>(&self, transport: &T, is_button: bool, alert: Option<&str>) {
        if !is_button {
            return;
        }
        if let Err(e) = transport.acknowledge(alert).await {
            warn!(error = %e, "Failed to answer callback query");
        }
    }

    /// Send the view as a photo; on any failure deliver the same content as text.
    ///
    /// An upload that outlives `media_timeout` is abandoned, but Telegram may
    /// still post the photo, so the chat can end up with both the photo and the
    /// text fallback.
    async fn deliver_media<T: Transport + ?Sized>(
        &self,
        transport: &T,
        origin: Option<MessageRef>,
        path: &std::path::Path,
        view: &RenderedView,
    ) {
        let settings = &self.ctx.settings;

        let image = match load_image(path, settings.max_image_bytes).await {
            Ok(image) => image,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Falling back to text-only message");
                show_text(transport, origin, &view.without_media()).await;
                return;
            }
        };

        match tokio::time::timeout(settings.media_timeout, transport.send_photo(image, view)).await {
            Ok(Ok(sent)) => {
                debug!(message_id = sent.0, path = %path.display(), "Photo delivered");
                remove_origin(transport, origin).await;
                return;
            }
            Ok(Err(e)) => {
                warn!(
                    error = %BotError::MediaDelivery(e.to_string()),
                    path = %path.display(),
                    "Falling back to text-only message"
                );
            }
            Err(_) => {
                error!(
                    error = %BotError::MediaDelivery(format!(
                        "photo upload timed out after {:?}",
                        settings.media_timeout
                    )),
                    path = %path.display(),
                    "Photo upload abandoned, it may still appear next to the text fallback"
                );
            }
        }

        show_text(transport, origin, &view.without_media()).await;
    }
}

/// Edit the originating message in place, or send a new one when that fails
async fn show_text<T: Transport + ?Sized>(transport: &T, origin: Option<MessageRef>, view: &RenderedView) {
    if let Some(target) = origin {
        match transport.edit_text(target, view).await {
            Ok(()) => return,
            Err(e) => debug!(error = %e, message_id = target.0, "Edit failed, sending a new message"),
        }
    }
    send_or_log(transport, view).await;
}

async fn send_or_log<T: Transport + ?Sized>(transport: &T, view: &RenderedView) -> bool {
    match transport.send_text(view).await {
        Ok(_) => true,
        Err(e) => {
            warn!(error = %BotError::from(e), "Failed to send message");
            false
        }
    }
}

/// Best-effort removal of the message that triggered a new one
async fn remove_origin<T: Transport + ?Sized>(transport: &T, origin: Option<MessageRef>) {
    if let Some(target) = origin {
        if let Err(e) = transport.delete(target).await {
            debug!(error = %e, message_id = target.0, "Could not delete previous message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/start"), Some("start".to_string()));
        assert_eq!(parse_command("  /start@EcgTutorBot  "), Some("start".to_string()));
        assert_eq!(parse_command("/help me"), Some("help".to_string()));
        assert_eq!(parse_command("start"), None);
        assert_eq!(parse_command("/"), None);
        assert_eq!(parse_command("/@bot"), None);
    }
}
