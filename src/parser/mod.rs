//! HTTP request parser module.
//!
//! Reads one HTTP/1.1 request from a buffered byte stream and turns it into
//! a typed [`HttpRequest`], with a dedicated small grammar for urlencoded
//! forms and query strings.

mod error;
mod form;
mod method;
mod request;
mod tests;
mod version;

// Re-export public items
pub use error::Error;
pub use form::{FormData, decode_component, parse_form, parse_pairs};
pub use method::Method;
pub use request::HttpRequest;
pub use version::HttpVersion;

// Re-export the read_request function
pub use request::read_request;
