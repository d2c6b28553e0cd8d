//! Product service.
//!
//! A small JSON-over-HTTP service exposing read, partial-update and delete
//! operations over the `product` table.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ http::server ──▶ products::handlers ──▶ products::validation
//!                 (request id,            │                  (fail fast, 400)
//!                  trace, timeout,        ▼
//!                  metrics)       storage::ProductRepository
//!                                   ├─ PgProductRepository (sqlx)
//!                                   └─ InMemoryProductRepository
//!     Client ◀── http::response (200 / 400 / 404 / 500)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use product_service::config::{load_config, ServiceConfig};
use product_service::http::HttpServer;
use product_service::lifecycle::{build_repository, shutdown_signal, Shutdown};
use product_service::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "product-service")]
#[command(about = "JSON API over the product table", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `database.url` (`memory` for the in-process store).
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(url) = args.database_url {
        config.database.url = url;
    }

    init_logging(&config.observability);
    tracing::info!("product-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let products = build_repository(&config.database).await?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        "Server running on http://{}",
        listener.local_addr()?
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new(config, products);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
