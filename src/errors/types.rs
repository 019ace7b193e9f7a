//! Error type definitions for the SURFboard exporter

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Modem polling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Prometheus registry / encoding errors
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while fetching a status snapshot from the modem
///
/// Every variant aborts the current poll cycle only. The polling loop logs
/// and swallows them; callers of [`crate::sources::StatusSource`] see one
/// opaque "this poll failed" outcome.
#[derive(Error, Debug)]
pub enum SourceError {
    /// DNS, connect, TLS or body-read failures
    #[error("Transport error during {stage}: {message}")]
    Transport { stage: String, message: String },

    /// Any response other than 200 OK
    #[error("HTTP error during {stage}: {status}")]
    HttpStatus { stage: String, status: u16 },

    /// Login answered with a body that cannot be a session token
    #[error("Malformed login token: got {length} bytes, expected 10..=100")]
    MalformedToken { length: usize },

    /// The status page could not be decoded
    #[error("Document error: {message}")]
    Document { message: String },

    /// Invalid client configuration (bad base URL, client build failure)
    #[error("Invalid configuration: {field} - {message}")]
    InvalidConfig { field: String, message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a transport error for the given request stage
    pub fn transport<S: Into<String>, M: Into<String>>(stage: S, message: M) -> Self {
        Self::Transport {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error for the given request stage
    pub fn http_status<S: Into<String>>(stage: S, status: u16) -> Self {
        Self::HttpStatus {
            stage: stage.into(),
            status,
        }
    }

    /// Create a document decoding error
    pub fn document<S: Into<String>>(message: S) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }
}
