//! Catalog server binary.

use bookshelf::{AppState, BookStore, RateLimitConfig};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

/// Book catalog REST server
#[derive(Parser, Debug)]
#[command(name = "bookshelf-server")]
#[command(about = "JSON-file-backed book catalog with a REST API")]
#[command(version)]
struct Args {
    /// Path to the JSON file holding the catalog
    #[arg(short, long, default_value = "books.json")]
    data_file: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "0.0.0.0:5000")]
    listen: String,

    /// Write compact JSON instead of indented
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,bookshelf=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();
    tracing::info!(data_file = %args.data_file.display(), listen = %args.listen, "starting");

    let store = match BookStore::builder(&args.data_file)
        .pretty(!args.compact)
        .build()
    {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("failed to open catalog: {e}");
            std::process::exit(1);
        }
    };

    let state = AppState::new(store, RateLimitConfig::default());
    let app = bookshelf::router(state);

    let listener = match tokio::net::TcpListener::bind(&args.listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {}: {e}", args.listen);
            std::process::exit(1);
        }
    };
    tracing::info!("listening on {}", args.listen);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
