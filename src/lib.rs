//! A minimal HTTP/1.1 server with a file-backed roster store.
//!
//! This crate serves one request per TCP connection: it parses the raw
//! byte stream into a typed request, routes it to one of five behaviors,
//! and writes exactly one well-formed response before closing the
//! connection.
//!
//! # Features
//!
//! - HTTP/1.1 request parsing from an async byte stream (GET and POST)
//! - A durable, append-only record store with whole-file JSON snapshots
//! - Record creation from urlencoded forms, JSON export, and a filtered
//!   HTML listing rendered server-side
//! - Static file serving with directory-to-index redirection
//! - Deterministic error responses: every parse or storage failure maps to
//!   exactly one 400/404/405/500 answer
//!
//! # Examples
//!
//! ```no_run
//! use roster_rs::{HttpServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), roster_rs::ServerError> {
//!     let server = HttpServer::new(ServerConfig::default());
//!     server.start().await
//! }
//! ```
//!
//! The wire format keeps the legacy field name `number` for record ids in
//! both the persisted snapshot and the `/app-json` export; see
//! [`store::Record`].

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Export the record store module
pub mod store;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, read_request};
pub use server::{Error as ServerError, HttpResponse, HttpServer, Router, ServerConfig, StatusCode};
pub use store::{Filter, Record, RecordStore, Error as StoreError};
