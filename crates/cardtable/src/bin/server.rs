//! Standalone Cardtable server binary.
//!
//! Bind address comes from `CARDTABLE_ADDR` (default `127.0.0.1:8080`);
//! log filtering from `RUST_LOG` (default `info`).

use cardtable::{CardtableError, CardtableServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CardtableError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr =
        std::env::var("CARDTABLE_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let server = CardtableServer::builder().bind(&addr).build().await?;
    if let Ok(local) = server.local_addr() {
        tracing::info!(%local, "cardtable listening");
    }
    server.run().await
}
