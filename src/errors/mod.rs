//! Centralized error handling for the SURFboard exporter
//!
//! # Error Categories
//!
//! - **Source Errors**: talking to the modem (transport, HTTP status, login
//!   token, status document)
//! - **Configuration Errors**: unreadable or invalid configuration
//! - **Metrics Errors**: registry setup and exposition encoding
//!
//! Per-field numeric parse failures inside the status tables are *not* errors;
//! the extractor degrades them to zero.
//!
//! # Usage
//!
//! ```rust
//! use surfboard_exporter::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("device.base_url is empty"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
