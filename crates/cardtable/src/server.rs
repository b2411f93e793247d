//! `CardtableServer` builder and accept loop.
//!
//! This is the entry point for running a Cardtable server. It ties the
//! layers together: transport → protocol → room registry.

use std::sync::Arc;

use cardtable_protocol::JsonCodec;
use cardtable_room::RoomRegistry;
use cardtable_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::CardtableError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// The registry mutex is the coarse lock the room table needs only for the
/// insert-if-absent step; everything after `get_or_create` goes through the
/// session handle without touching it.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomRegistry>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Cardtable server.
pub struct CardtableServerBuilder {
    bind_addr: String,
}

impl CardtableServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the transport and builds the server.
    pub async fn build(self) -> Result<CardtableServer, CardtableError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomRegistry::new()),
            codec: JsonCodec,
        });

        Ok(CardtableServer { transport, state })
    }
}

impl Default for CardtableServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Cardtable server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CardtableServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl CardtableServer {
    /// Creates a new builder.
    pub fn builder() -> CardtableServerBuilder {
        CardtableServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each one.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), CardtableError> {
        tracing::info!("Cardtable server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
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
