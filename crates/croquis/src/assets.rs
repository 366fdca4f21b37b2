//! Static asset listener for the browser client.
//!
//! Game traffic never touches this listener; it only hands out the
//! files under the configured directory (index page, scripts, styles).

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

/// An HTTP listener bound to a directory of static files.
pub(crate) struct AssetServer {
    listener: TcpListener,
    dir: PathBuf,
}

impl AssetServer {
    /// Binds the asset listener. The directory is not checked here; a
    /// missing directory simply 404s every request.
    pub(crate) async fn bind(
        addr: &str,
        dir: PathBuf,
    ) -> io::Result<AssetServer> {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(
            addr,
            dir = %dir.display(),
            "asset server listening"
        );
        Ok(AssetServer { listener, dir })
    }

    /// Returns the address the listener is bound to.
    pub(crate) fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves files until the process is terminated.
    pub(crate) async fn serve(self) {
        let app =
            Router::new().fallback_service(ServeDir::new(&self.dir));
        if let Err(e) = axum::serve(self.listener, app).await {
            tracing::error!(error = %e, "asset server exited");
        }
    }
}
