//! `CroquisServer` builder and server loop.
//!
//! This is the entry point for running a croquis game server. It ties
//! together the layers: transport, protocol, rooms.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use croquis_room::{RoomRegistry, WordList, WordSupplier};
use croquis_transport::{Transport, WebSocketTransport};

use crate::assets::AssetServer;
use crate::handler::handle_connection;
use crate::CroquisError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry carries its own lock.
pub(crate) struct ServerState {
    pub(crate) rooms: RoomRegistry,
    pub(crate) words: Arc<dyn WordSupplier>,
}

/// Builder for configuring and starting a croquis server.
///
/// # Example
///
/// ```rust,ignore
/// use croquis::CroquisServer;
///
/// let server = CroquisServer::builder()
///     .bind("0.0.0.0:9001")
///     .assets("0.0.0.0:8080", "static")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct CroquisServerBuilder {
    bind_addr: String,
    assets: Option<(String, PathBuf)>,
    words: Arc<dyn WordSupplier>,
}

impl CroquisServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:9001".to_string(),
            assets: None,
            words: Arc::new(WordList::new()),
        }
    }

    /// Sets the address the WebSocket listener binds to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Also serves the browser client from `dir` over plain HTTP at
    /// `addr`. Without this the server is WebSocket-only.
    pub fn assets(mut self, addr: &str, dir: impl Into<PathBuf>) -> Self {
        self.assets = Some((addr.to_string(), dir.into()));
        self
    }

    /// Replaces the built-in word list.
    pub fn words(mut self, words: impl WordSupplier) -> Self {
        self.words = Arc::new(words);
        self
    }

    /// Binds the listeners and builds the server.
    pub async fn build(self) -> Result<CroquisServer, CroquisError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let assets = match self.assets {
            Some((addr, dir)) => Some(AssetServer::bind(&addr, dir).await?),
            None => None,
        };

        let state = Arc::new(ServerState {
            rooms: RoomRegistry::new(),
            words: self.words,
        });

        Ok(CroquisServer {
            transport,
            assets,
            state,
        })
    }
}

impl Default for CroquisServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running croquis game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct CroquisServer {
    transport: WebSocketTransport,
    assets: Option<AssetServer>,
    state: Arc<ServerState>,
}

impl CroquisServer {
    /// Creates a new builder.
    pub fn builder() -> CroquisServerBuilder {
        CroquisServerBuilder::new()
    }

    /// Returns the local address of the WebSocket listener.
    pub fn local_addr(&self) -> Result<SocketAddr, CroquisError> {
        Ok(self.transport.local_addr()?)
    }

    /// Returns the local address of the asset listener, if configured.
    pub fn assets_addr(&self) -> Option<SocketAddr> {
        self.assets.as_ref().and_then(|a| a.local_addr().ok())
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// one. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), CroquisError> {
        if let Some(assets) = self.assets.take() {
            tokio::spawn(assets.serve());
        }

        tracing::info!("croquis server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await
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
