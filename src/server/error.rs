//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;
use crate::store::Error as StoreError;

/// Errors that can occur during HTTP server operation.
///
/// These classify what went wrong for logging and shutdown decisions; the
/// client-visible outcome is decided before the error propagates, every
/// connection gets exactly one response regardless.
#[derive(Debug, Error)]
pub enum Error {
    /// Error reading or parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// Error loading or persisting the record store.
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// I/O error on the connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
