//! # Error Types Module
//!
//! This module defines the error types used throughout the bot.
//! Startup errors (`CatalogLoadError`, `ConfigError`) are fatal; everything
//! raised while handling an update is a `BotError` and is only ever logged.

use std::path::PathBuf;

/// Errors raised while loading the case catalog at startup
#[derive(Debug)]
pub enum CatalogLoadError {
    /// The catalog file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The catalog file is not valid JSON of the expected shape
    Malformed(serde_json::Error),
    /// The catalog contains no cases
    Empty,
    /// A case violates the catalog invariants
    InvalidCase { case_id: u32, reason: String },
}

impl std::fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogLoadError::Io { path, source } => {
                write!(f, "Cannot read catalog {}: {source}", path.display())
            }
            CatalogLoadError::Malformed(err) => write!(f, "Malformed catalog: {err}"),
            CatalogLoadError::Empty => write!(f, "Catalog contains no cases"),
            CatalogLoadError::InvalidCase { case_id, reason } => {
                write!(f, "Invalid case {case_id}: {reason}")
            }
        }
    }
}

impl std::error::Error for CatalogLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogLoadError::Io { source, .. } => Some(source),
            CatalogLoadError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogLoadError {
    fn from(err: serde_json::Error) -> Self {
        CatalogLoadError::Malformed(err)
    }
}

/// Errors raised while reading process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No bot credential in the environment
    MissingToken,
    /// A variable is set but cannot be used
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingToken => {
                write!(f, "BOT_TOKEN environment variable not set")
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {key}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure reported by a transport adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError(pub String);

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Transport error: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

/// Non-fatal errors raised while handling a single update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotError {
    /// A case id from a button or typed text is not in the catalog
    UnknownCaseId(u32),
    /// The case image could not be loaded or uploaded
    MediaDelivery(String),
    /// A callback payload does not match the token grammar
    MalformedToken(String),
    /// Free text that is neither a command nor a case number
    UnrecognizedInput(String),
    /// The transport rejected a request
    Transport(String),
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::UnknownCaseId(id) => write!(f, "Unknown case id: {id}"),
            BotError::MediaDelivery(msg) => write!(f, "Media delivery error: {msg}"),
            BotError::MalformedToken(token) => write!(f, "Malformed token: {token:?}"),
            BotError::UnrecognizedInput(text) => write!(f, "Unrecognized input: {text:?}"),
            BotError::Transport(msg) => write!(f, "Transport error: {msg}"),
        }
    }
}

impl std::error::Error for BotError {}

impl From<TransportError> for BotError {
    fn from(err: TransportError) -> Self {
        BotError::Transport(err.0)
    }
}
