//! Runnable Gridlock server.
//!
//! Binds on `0.0.0.0` at the port from the `PORT` environment variable
//! (default 3000) and serves rooms until killed. Log verbosity follows
//! `RUST_LOG` (e.g. `RUST_LOG=gridlock=debug`).

use gridlock::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GridlockError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let addr = format!("0.0.0.0:{port}");

    let server = GridlockServerBuilder::new().bind(&addr).build().await?;
    tracing::info!(%addr, "gridlock server listening");
    server.run().await
}
