//! `stockroomd` — the stockroom product service binary.
//!
//! Serves the product CRUD API over HTTP. Configuration comes from the
//! environment (a `.env` file is honored):
//!
//!   DATABASE_URL               sqlite: or postgres:// URL (required)
//!   STOCKROOM_ADDR             listen address (default 127.0.0.1:8000)
//!   STOCKROOM_MAX_CONNECTIONS  pool size (default 10)
//!
//! Log verbosity follows `RUST_LOG`; output is structured JSON.

mod config;

use std::sync::Arc;

use anyhow::Context;
use stockroom_core::{handlers, DatabasePool, ProductStore, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

/// Initialize JSON tracing output for the daemon
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("stockroom_core=info".parse().unwrap())
                .add_directive("stockroomd=info".parse().unwrap()),
        )
        .json()
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    info!("Connecting to database");
    let pool = DatabasePool::connect(&config.database_url, config.max_connections)
        .await
        .context("database connection failed")?;

    let store = Arc::new(ProductStore::new(pool.clone()));

    let mut server = Server::new().bind(config.addr);
    handlers::register(&mut server, store).context("route registration failed")?;

    server.serve().await.context("server error")?;

    info!("Closing database pool");
    pool.close().await;
    Ok(())
}
