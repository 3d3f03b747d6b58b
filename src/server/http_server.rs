//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::parser::{read_request, Error as ParserError};
use crate::server::config::ServerConfig;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};
use crate::server::router::Router;
use crate::server::static_files::{ContentTypeMap, StaticFileServer};
use crate::store::RecordStore;

/// An HTTP server: one request per connection, one response per request.
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    /// The router all connections dispatch through.
    pub router: Arc<Router>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Wires the record store, static file server and router from the
    /// config paths, with the default content-type table.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(RecordStore::new(&config.store_path));
        let files = StaticFileServer::new(&config.www_root, ContentTypeMap::default());
        let router = Arc::new(Router::new(store, files, &config.www_root));
        Self { config, router }
    }

    /// Create a server around an already-wired router.
    pub fn with_router(config: ServerConfig, router: Arc<Router>) -> Self {
        Self { config, router }
    }

    /// Display the registered endpoints.
    fn display_server_info(&self) {
        info!("Registered endpoints:");
        info!("  POST /app-add");
        info!("  GET  /app-json");
        info!("  GET  /app-index");
        info!("  GET  /* (static files under {:?})", self.config.www_root);
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: Arc<mpsc::Sender<()>>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Handle a new connection.
    async fn handle_new_connection(
        mut socket: tokio::net::TcpStream,
        addr: SocketAddr,
        semaphore: Arc<tokio::sync::Semaphore>,
        router: Arc<Router>,
        read_timeout: Duration,
        tasks: &mut JoinSet<()>,
    ) {
        // Try to acquire a permit from the semaphore
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the
            // semaphore slot
            let _permit = permit;

            if let Err(e) = Self::handle_connection(&mut socket, router, read_timeout).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Handle connection accept errors.
    async fn handle_accept_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = Duration::from_secs(30);
        let _ = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;

        // Limit concurrent connections
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.max_connections));

        // Channel for shutdown signaling
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        // Keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        Self::setup_ctrl_c_handler(shutdown_tx.clone(), &mut tasks);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                self.router.clone(),
                                self.config.read_timeout,
                                &mut tasks,
                            ).await;
                        },
                        Err(e) => {
                            if Self::handle_accept_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Handle a single connection: read one request, write one response,
    /// close.
    ///
    /// Parse failures are answered deterministically (405 for a disallowed
    /// method, 400 for everything else, timeouts included), so every
    /// connection that reaches this point gets exactly one response.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        router: Arc<Router>,
        read_timeout: Duration,
    ) -> Result<(), Error> {
        let response = {
            let mut reader = BufReader::new(&mut *socket);
            match tokio::time::timeout(read_timeout, read_request(&mut reader)).await {
                Ok(Ok(request)) => router.dispatch(&request).await,
                Ok(Err(e)) => {
                    warn!("Failed to read request: {e}");
                    match e {
                        ParserError::MethodNotAllowed(_) => HttpResponse::method_not_allowed(),
                        _ => HttpResponse::bad_request(),
                    }
                }
                Err(_) => {
                    warn!("Timed out reading request");
                    HttpResponse::bad_request()
                }
            }
        };

        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;
        socket.shutdown().await?;
        Ok(())
    }
}
