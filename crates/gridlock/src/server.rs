//! `GridlockServer` builder and accept loop.
//!
//! This is the entry point for running a Gridlock server. It ties the
//! layers together: transport → protocol → room registry, with one task
//! per accepted connection.

use std::sync::Arc;

use gridlock_protocol::JsonCodec;
use gridlock_room::RoomRegistry;
use gridlock_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::GridlockError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection-handler task.
///
/// The registry mutex guards only map operations (insert/lookup/delete by
/// code); it is never held across a room reply or network I/O. Each
/// room's own mutations are serialized by its actor, so rooms never
/// contend with each other through this lock.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Gridlock server.
///
/// # Example
///
/// ```rust,no_run
/// use gridlock::prelude::*;
///
/// # async fn run() -> Result<(), GridlockError> {
/// let server = GridlockServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct GridlockServerBuilder {
    bind_addr: String,
}

impl GridlockServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Builds the server, binding its WebSocket listener.
    pub async fn build(self) -> Result<GridlockServer, GridlockError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(GridlockServer { transport, state })
    }
}

impl Default for GridlockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Gridlock server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GridlockServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl GridlockServer {
    /// Creates a new builder.
    pub fn builder() -> GridlockServerBuilder {
        GridlockServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// A connection's bad input or abrupt close never terminates the
    /// loop — it runs until the process exits.
    pub async fn run(mut self) -> Result<(), GridlockError> {
        tracing::info!("Gridlock server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
