//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The directory static assets and page templates are served from.
    pub www_root: PathBuf,
    /// The snapshot file backing the record store.
    pub store_path: PathBuf,
    /// How long a client may take to deliver a complete request.
    pub read_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".parse().unwrap(),
            max_connections: 1024,
            www_root: PathBuf::from("www-data"),
            store_path: PathBuf::from("db.json"),
            read_timeout: Duration::from_secs(10),
        }
    }
}
