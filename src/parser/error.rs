//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading and parsing an HTTP request.
///
/// Each variant maps to exactly one response: [`Error::MethodNotAllowed`]
/// becomes a 405, everything else a 400.
#[derive(Debug, Error)]
pub enum Error {
    /// The request line does not have exactly three space-separated tokens.
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// A header line has no colon separating field and value.
    #[error("Malformed header line: {0}")]
    MalformedHeader(String),

    /// The request carries no `Host` header.
    #[error("Required Host header is missing")]
    MissingHostHeader,

    /// The HTTP version is anything other than HTTP/1.1.
    #[error("Unsupported HTTP version: {0}")]
    UnsupportedVersion(String),

    /// The HTTP method is anything other than GET or POST.
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// The `Content-Length` header value is not a valid integer, or
    /// declares a body larger than this server accepts.
    #[error("Invalid Content-Length: {0}")]
    InvalidContentLength(String),

    /// The request body is not a valid urlencoded form with the expected fields.
    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    /// I/O error while reading from the connection.
    #[error("I/O error while reading request: {0}")]
    Io(#[from] std::io::Error),
}
