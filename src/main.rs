//! The roster server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use roster_rs::{HttpServer, ServerConfig};

/// A minimal HTTP/1.1 server with a file-backed roster store.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "ROSTER_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Directory to serve static assets and page templates from
    #[arg(long, env = "ROSTER_WWW_ROOT", default_value = "www-data")]
    www_root: PathBuf,

    /// Snapshot file backing the record store
    #[arg(long, env = "ROSTER_STORE", default_value = "db.json")]
    store: PathBuf,

    /// Maximum number of concurrent connections
    #[arg(long, default_value_t = 1024)]
    max_connections: usize,

    /// Seconds a client may take to deliver a complete request
    #[arg(long, default_value_t = 10)]
    read_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = ServerConfig {
        addr: args.addr,
        max_connections: args.max_connections,
        www_root: args.www_root,
        store_path: args.store,
        read_timeout: Duration::from_secs(args.read_timeout),
    };

    let server = HttpServer::new(config);
    server.start().await?;

    Ok(())
}
