//! HTTP server implementation for roster-rs.
//!
//! Routing, static file serving, response serialization, and the accept
//! loop that ties the parser and record store together.

mod config;
mod error;
mod http_server;
mod response;
mod router;
mod static_files;

// Re-export public items
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
pub use response::{HttpResponse, StatusCode};
pub use router::Router;
pub use static_files::{ContentTypeMap, StaticFileServer};
