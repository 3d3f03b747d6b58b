//! HTTP response types and utilities.

use std::collections::HashMap;

use serde::Serialize;

use crate::server::error::Error;

/// The status codes this server emits, with their exact reason phrases.
///
/// The phrasing of `301 Moved permanently` and `404 Not found` is part of
/// the wire contract and intentionally not title-cased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    MovedPermanently = 301,
    BadRequest = 400,
    NotFound = 404,
    MethodNotAllowed = 405,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl StatusCode {
    /// Get the reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::MovedPermanently => "Moved permanently",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::ServiceUnavailable => "Service Unavailable",
        }
    }
}

/// Represents an HTTP response.
///
/// Every response carries `connection: Close`; this server writes one
/// response per connection and never reuses it. `content-length` is filled
/// from the body on serialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The HTTP status code
    pub status: StatusCode,
    /// The HTTP headers
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response with the given status code.
    pub fn new(status: StatusCode) -> Self {
        let mut headers = HashMap::new();
        headers.insert("server".to_string(), "roster-rs".to_string());
        headers.insert("connection".to_string(), "Close".to_string());

        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// Set the response body with a string.
    pub fn with_body_string(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        self
    }

    /// Set the response body with bytes.
    pub fn with_body_bytes(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the content type.
    pub fn with_content_type(self, content_type: impl Into<String>) -> Self {
        self.with_header("content-type", content_type)
    }

    /// Set the response body with a JSON value.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, Error> {
        let json = serde_json::to_vec(value).map_err(Error::JsonError)?;
        Ok(self
            .with_content_type("application/json")
            .with_body_bytes(json))
    }

    /// The canned 400 response.
    pub fn bad_request() -> Self {
        Self::new(StatusCode::BadRequest)
            .with_content_type("text/html")
            .with_body_string(
                "<!doctype html>\n<h1>Bad request</h1>\n\
                 <p>Your browser sent a request that I cannot understand.</p>\n",
            )
    }

    /// The canned 404 response.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound)
            .with_content_type("text/html")
            .with_body_string(
                "<!doctype html>\n<h1>404 Page not found</h1>\n\
                 <p>Page cannot be found.</p>\n",
            )
    }

    /// The canned 405 response, with the `allow` header this server
    /// answers for every route.
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::MethodNotAllowed)
            .with_header("allow", "GET, POST")
            .with_content_type("text/html")
            .with_body_string(
                "<!doctype html>\n<h1>Not Allowed</h1>\n\
                 <p>Your browser sent a request that is not allowed.</p>\n",
            )
    }

    /// The canned 301 response redirecting to `location`.
    pub fn moved_permanently(location: impl Into<String>) -> Self {
        Self::new(StatusCode::MovedPermanently)
            .with_header("location", location)
            .with_content_type("text/html")
            .with_body_string(
                "<!doctype html>\n<h1>Moved permanently</h1>\n\
                 <p>The page your browser has requested, has been moved permanently.</p>\n",
            )
    }

    /// The canned 500 response.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::InternalServerError)
            .with_content_type("text/html")
            .with_body_string(
                "<!doctype html>\n<h1>Internal server error</h1>\n\
                 <p>The server failed while handling your request.</p>\n",
            )
    }

    /// Convert the response to wire bytes.
    ///
    /// Status line, one `field: value` line per header plus the exact
    /// `content-length` of the body, a blank line, then the raw body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        let status_line = format!(
            "HTTP/1.1 {} {}\r\n",
            self.status as u16,
            self.status.reason_phrase()
        );
        bytes.extend_from_slice(status_line.as_bytes());

        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\r\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }
        let content_length = format!("content-length: {}\r\n", self.body.len());
        bytes.extend_from_slice(content_length.as_bytes());

        bytes.extend_from_slice(b"\r\n");
        bytes.extend_from_slice(&self.body);

        bytes
    }
}
