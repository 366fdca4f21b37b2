//! Binary entry point: WebSocket game listener plus static asset
//! listener for the bundled browser client.

use croquis::{CroquisError, CroquisServer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), CroquisError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "croquis=info,croquis_room=info,croquis_transport=info"
                        .into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = CroquisServer::builder()
        .bind("0.0.0.0:9001")
        .assets("0.0.0.0:8080", "static")
        .build()
        .await?;
    server.run().await
}
