//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `navigation`: Routes events to screens and delivers them
//! - `transport`: Messaging interface and its Telegram implementation
//! - `ui_builder`: Renders screens into text and keyboards
//! - `message_handler`: Handles incoming text messages and commands
//! - `callback_handler`: Handles inline keyboard callback queries

pub mod callback_handler;
pub mod message_handler;
pub mod navigation;
pub mod transport;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use navigation::{Event, EventKind, Navigator, Notice, Outcome};
pub use transport::{MessageRef, TelegramTransport, Transport};
pub use ui_builder::{Button, RenderedView, ScreenRenderer, TextFormat, ViewKind};
