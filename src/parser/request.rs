//! HTTP request reading and representation.

use std::collections::HashMap;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

/// Upper bound on a declared request body. The forms posted to this server
/// are tiny; a huge Content-Length must be rejected before the body buffer
/// is allocated, an allocation failure would abort the whole process.
const MAX_BODY_LEN: usize = 1024 * 1024;

/// Represents a parsed HTTP request.
///
/// Built once per connection by [`read_request`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// The HTTP method (GET or POST)
    pub method: Method,
    /// The raw request target, path and query string as received
    pub target: String,
    /// The HTTP version
    pub version: HttpVersion,
    /// The HTTP headers, field case preserved, last write wins
    pub headers: HashMap<String, String>,
    /// The request body, empty unless Content-Length was present
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Get a header value by name (case-insensitive).
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                Some(v)
            } else {
                None
            }
        })
    }

    /// Check if a header exists (case-insensitive).
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// The first path segment of the target, used as the route dispatch key.
    ///
    /// The leading slash is stripped and everything up to the next `/` is
    /// returned, query string included. `/app-index?first=a` yields
    /// `app-index?first=a`, `/css/style.css` yields `css`.
    pub fn first_segment(&self) -> &str {
        let stripped = self.target.strip_prefix('/').unwrap_or(&self.target);
        stripped.split('/').next().unwrap_or_default()
    }
}

/// Split a request line into its three tokens.
///
/// Returns the raw method, target and version strings; validation of the
/// individual tokens happens later so that the failure ordering matches the
/// rest of the pipeline (Host first, then version, then method).
fn parse_request_line(line: &str) -> Result<(String, String, String), Error> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 3 {
        return Err(Error::MalformedRequestLine(line.to_string()));
    }
    Ok((
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
    ))
}

/// Split a header line on the first colon into field and value.
///
/// The value is trimmed of surrounding whitespace; the field keeps its case.
fn parse_header_line(line: &str) -> Result<(String, String), Error> {
    match line.split_once(':') {
        Some((field, value)) => Ok((field.to_string(), value.trim().to_string())),
        None => Err(Error::MalformedHeader(line.to_string())),
    }
}

/// Read one line from the stream, stripping the trailing CRLF.
///
/// Returns `None` on a clean EOF before any byte of the line.
async fn read_line(
    reader: &mut (impl AsyncBufRead + Unpin),
) -> Result<Option<Vec<u8>>, std::io::Error> {
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    if buf.ends_with(b"\n") {
        buf.pop();
    }
    if buf.ends_with(b"\r") {
        buf.pop();
    }
    Ok(Some(buf))
}

/// Read and parse one HTTP request from a buffered stream.
///
/// State machine: request line, then header lines until the blank line,
/// then exactly `Content-Length` body bytes if that header is present.
/// Single pass; any failure maps to exactly one error response at the
/// server boundary.
pub async fn read_request(
    reader: &mut (impl AsyncBufRead + Unpin),
) -> Result<HttpRequest, Error> {
    // Request line
    let line = match read_line(reader).await? {
        Some(line) => line,
        None => return Err(Error::MalformedRequestLine(String::new())),
    };
    let line = String::from_utf8(line)
        .map_err(|_| Error::MalformedRequestLine("invalid UTF-8".to_string()))?;
    let (raw_method, target, raw_version) = parse_request_line(&line)?;

    // Header lines until the blank line
    let mut headers = HashMap::new();
    loop {
        let line = match read_line(reader).await? {
            Some(line) => line,
            None => break,
        };
        if line.is_empty() {
            break;
        }
        let line = String::from_utf8(line)
            .map_err(|_| Error::MalformedHeader("invalid UTF-8".to_string()))?;
        let (field, value) = parse_header_line(&line)?;
        headers.insert(field, value);
    }

    // Host is required, then version and method are validated in that order
    // so a bad version on a DELETE still answers 400, not 405.
    if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("Host")) {
        return Err(Error::MissingHostHeader);
    }
    let version = HttpVersion::from_str(&raw_version)?;
    let method = Method::from_str(&raw_method)?;

    // Body, only when Content-Length announces one
    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, v)| match v.parse::<usize>() {
            Ok(len) if len <= MAX_BODY_LEN => Ok(len),
            _ => Err(Error::InvalidContentLength(v.clone())),
        })
        .transpose()?;

    let mut body = Vec::new();
    if let Some(len) = content_length {
        body = vec![0; len];
        reader.read_exact(&mut body).await?;
    }

    Ok(HttpRequest {
        method,
        target,
        version,
        headers,
        body,
    })
}
