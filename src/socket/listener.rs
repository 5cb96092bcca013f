//! TCP socket listener.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::error::{ProtocolErrorKind, ServerError};
use crate::store::FileStore;

use super::handle_connection;

/// Command and session counters for monitoring.
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    /// Total command lines processed.
    pub commands_total: AtomicU64,
    /// Command lines rejected by validation.
    pub commands_invalid: AtomicU64,
    /// Currently active sessions.
    pub active_sessions: AtomicUsize,
}

impl ConnectionMetrics {
    /// Create new connection metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one processed command line.
    pub fn record_command(&self, valid: bool) {
        self.commands_total.fetch_add(1, Ordering::Relaxed);
        if !valid {
            self.commands_invalid.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get total command count.
    pub fn total_commands(&self) -> u64 {
        self.commands_total.load(Ordering::Relaxed)
    }

    /// Get rejected command count.
    pub fn invalid_commands(&self) -> u64 {
        self.commands_invalid.load(Ordering::Relaxed)
    }

    /// Get active session count.
    pub fn active(&self) -> usize {
        self.active_sessions.load(Ordering::Relaxed)
    }
}

/// TCP server: accepts connections and runs one session task per socket.
pub struct SocketListener {
    listener: TcpListener,
    settings: Arc<Settings>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<ConnectionMetrics>,
    /// Semaphore for connection limiting
    connection_semaphore: Arc<Semaphore>,
}

impl SocketListener {
    /// Open the storage root and bind the listening socket.
    ///
    /// Binding is fatal if the port is already in use; the process must
    /// not start serving.
    pub async fn bind(settings: Arc<Settings>) -> Result<Self, ServerError> {
        let store = FileStore::open(&settings.storage.root).await?;
        info!(
            root = %settings.storage.root.display(),
            "Storage root ready"
        );

        let bind_addr = settings.listen.socket_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| ServerError::Listener {
                message: format!("Failed to bind to {}: {}", bind_addr, e),
            })?;

        let metrics = Arc::new(ConnectionMetrics::new());

        let connection_semaphore = Arc::new(Semaphore::new(settings.limits.max_connections));
        info!(
            max_connections = settings.limits.max_connections,
            "Connection limiting enabled"
        );

        let dispatcher = Arc::new(Dispatcher::new(
            store,
            Arc::clone(&metrics),
            Duration::from_millis(settings.limits.prompt_delay_ms),
        ));

        info!(addr = %bind_addr, "Socket listener bound");

        Ok(Self {
            listener,
            settings,
            dispatcher,
            metrics,
            connection_semaphore,
        })
    }

    /// Get connection metrics.
    pub fn metrics(&self) -> Arc<ConnectionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        self.listener.local_addr().map_err(ServerError::Io)
    }

    /// Run the socket listener, accepting connections.
    ///
    /// The listener stops accepting new connections when `shutdown` is
    /// notified. Active sessions continue until their peers disconnect.
    pub async fn run(&self, shutdown: Arc<Notify>) -> Result<(), ServerError> {
        info!("Socket listener running, waiting for connections...");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            let permit = match self.connection_semaphore.clone().try_acquire_owned() {
                                Ok(permit) => permit,
                                Err(_) => {
                                    warn!(
                                        max = self.settings.limits.max_connections,
                                        peer = %peer_addr,
                                        "Connection limit reached, rejecting connection"
                                    );
                                    // Connection is dropped, rejecting the client
                                    continue;
                                }
                            };

                            let settings = Arc::clone(&self.settings);
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let metrics = Arc::clone(&self.metrics);

                            metrics.active_sessions.fetch_add(1, Ordering::Relaxed);
                            debug!(
                                peer = %peer_addr,
                                active = metrics.active(),
                                "New connection accepted"
                            );

                            // Permit is moved into the task and released when it ends
                            tokio::spawn(async move {
                                let _permit = permit;
                                match handle_connection(stream, peer_addr, settings, dispatcher).await {
                                    Ok(()) => {}
                                    Err(ServerError::Protocol {
                                        kind: ProtocolErrorKind::ConnectionClosed,
                                    }) => {}
                                    Err(e) => {
                                        error!(peer = %peer_addr, error = %e, "Session handler error");
                                    }
                                }

                                metrics.active_sessions.fetch_sub(1, Ordering::Relaxed);
                                debug!(
                                    peer = %peer_addr,
                                    active = metrics.active(),
                                    "Connection closed"
                                );
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = shutdown.notified() => {
                    info!("Shutdown signal received, stopping listener");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Wait for all active sessions to drain.
    ///
    /// Returns immediately if there are no active sessions.
    pub async fn wait_for_drain(&self) {
        let poll_interval = Duration::from_millis(100);

        while self.metrics.active() > 0 {
            debug!(
                active = self.metrics.active(),
                "Waiting for sessions to drain"
            );
            tokio::time::sleep(poll_interval).await;
        }

        info!("All sessions drained");
    }
}
