//! Live preview server for mmd grids.
//!
//! Compiles a grid source file to HTML with the live reload script injected,
//! serves it, and recompiles whenever the source is saved. Preview pages
//! poll the change endpoint and reload after each recompile.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mmd_server::{Server, ServerConfig};
//!
//! let config = ServerConfig {
//!     source_file: PathBuf::from("song.mmd"),
//!     output_file: PathBuf::from("index.html"),
//!     ..ServerConfig::default()
//! };
//! let server = Server::bind(config).await?;
//! println!("Open {}", server.url());
//! server.run().await?;
//! ```
//!
//! # Routes
//!
//! ```text
//! GET /             compiled page
//! GET /is_changed/  {"is_changed": bool}, clears the flag
//! GET /*            files next to the compiled page
//! ```

mod app;
mod error;
mod handlers;
mod live_reload;
mod middleware;
mod state;

use std::future::Future;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::net::TcpListener;

pub use error::ServerError;
pub use live_reload::{ChangeFlag, DEFAULT_DEBOUNCE_MS, FileWatcher};
use state::AppState;

/// Number of consecutive ports tried before giving up.
pub const MAX_PORT_ATTEMPTS: u16 = 100;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// First port to try. Port 0 lets the OS choose.
    pub port: u16,
    /// Grid source file to watch.
    pub source_file: PathBuf,
    /// Compiled HTML page.
    pub output_file: PathBuf,
    /// Quiet period before a save triggers a recompile.
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            source_file: PathBuf::from("song.mmd"),
            output_file: PathBuf::from("index.html"),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// A bound preview server with its watcher running.
pub struct Server {
    listener: TcpListener,
    url: String,
    state: Arc<AppState>,
    // Dropping the watcher stops recompiles.
    _watcher: FileWatcher,
}

impl Server {
    /// Bind the listener, compile the page and start watching.
    ///
    /// If the configured port is taken the next ones are tried, up to
    /// [`MAX_PORT_ATTEMPTS`] in total. The page is compiled against the
    /// address actually bound.
    ///
    /// # Errors
    ///
    /// Returns an error if no port can be bound, the first compile fails,
    /// or the source file cannot be watched.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = bind_with_fallback(&config.host, config.port).await?;
        let url = page_address(listener.local_addr()?);

        let changes = ChangeFlag::new();
        let mut watcher = FileWatcher::new(
            config.source_file.clone(),
            config.output_file.clone(),
            changes.clone(),
        )
        .with_live_server(url.clone())
        .with_debounce_ms(config.debounce_ms);
        watcher.start()?;

        let state = Arc::new(AppState {
            changes,
            output_file: config.output_file,
        });

        Ok(Self {
            listener,
            url,
            state,
            _watcher: watcher,
        })
    }

    /// Address preview pages use to reach this server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Socket address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be read.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while running.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails while running.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = app::create_router(Arc::clone(&self.state));

        tracing::info!(url = %self.url, "Starting server");
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Bind to `port`, moving up one port at a time while it is in use.
async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener, ServerError> {
    if port == 0 {
        return Ok(TcpListener::bind((host, 0)).await?);
    }

    let last = port.saturating_add(MAX_PORT_ATTEMPTS - 1);
    for candidate in port..=last {
        match TcpListener::bind((host, candidate)).await {
            Ok(listener) => {
                if candidate != port {
                    tracing::warn!(
                        requested = port,
                        bound = candidate,
                        "Port in use, using next free port"
                    );
                }
                return Ok(listener);
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                tracing::debug!(port = candidate, "Port in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(ServerError::NoFreePort {
        host: host.to_owned(),
        first: port,
        last,
    })
}

/// URL for a bound socket, with wildcard hosts shown as `localhost`.
fn page_address(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{addr}")
    }
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_page_address_loopback() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000);
        assert_eq!(page_address(addr), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_page_address_wildcard_is_localhost() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8001);
        assert_eq!(page_address(addr), "http://localhost:8001");

        let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 8002);
        assert_eq!(page_address(addr), "http://localhost:8002");
    }

    #[test]
    fn test_page_address_ipv6() {
        let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::LOCALHOST), 8000);
        assert_eq!(page_address(addr), "http://[::1]:8000");
    }

    #[tokio::test]
    async fn test_bind_falls_back_to_next_port() {
        let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let port = taken.local_addr().unwrap().port();
        // Port arithmetic would overflow at the very top of the range
        if port == u16::MAX {
            return;
        }

        let listener = bind_with_fallback("127.0.0.1", port).await.unwrap();
        let bound = listener.local_addr().unwrap().port();

        assert!(bound > port, "expected a port above {port}, got {bound}");
    }

    #[tokio::test]
    async fn test_bind_port_zero_uses_os_port() {
        let listener = bind_with_fallback("127.0.0.1", 0).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }
}
