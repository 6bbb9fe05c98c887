/*!
 * Error types for the yacat application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// Errors raised while reading or writing a gettext catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The gettext parser rejected the file
    #[error("{}: {}", .path.display(), .message)]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message, including the offending line
        message: String,
    },
}

/// Errors surfaced by format handlers. These are usage errors and are fatal to a run.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The input catalog does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// A lifecycle step was invoked out of order
    #[error("{operation} called before {required}")]
    Lifecycle {
        /// The operation that was attempted
        operation: &'static str,
        /// The step that must run first
        required: &'static str,
    },

    /// A JSON catalog whose root is not an object
    #[error("Expected JSON object at root level, got {0}")]
    InvalidRoot(String),

    /// Error from the PO catalog layer
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from a format handler
    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
