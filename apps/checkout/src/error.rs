//! # Checkout Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Checkout                           │
//! │                                                                         │
//! │  ConfigError ─────────────────────────────────► anyhow ──► exit         │
//! │                                                                         │
//! │  SessionError::Core (recoverable) ──► "[ERROR] ..." ──► re-prompt       │
//! │  SessionError::InputClosed ─────────► session ends normally             │
//! │  SessionError::{Io, Store, Render, Core (fatal)} ──► anyhow ──► exit    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use till_core::CoreError;
use till_store::StoreError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while a session runs.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Console read or write failed.
    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The input stream ended.
    #[error("Input closed")]
    InputClosed,

    /// Pricing or input error; see [`CoreError::is_recoverable`].
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Saving the catalog failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The JSON receipt could not be rendered.
    #[error("Failed to render receipt: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<till_core::InputFormatError> for SessionError {
    fn from(err: till_core::InputFormatError) -> Self {
        SessionError::Core(err.into())
    }
}

/// Result type for sessions.
pub type SessionResult<T> = Result<T, SessionError>;
