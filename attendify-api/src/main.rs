//! Attendify attendance service - main entry point
//!
//! Serves the roster, session registry, attendance submission, and live
//! aggregation APIs over HTTP backed by a single SQLite database.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendify_api::{build_router, AppState};
use attendify_common::config;

/// Command-line arguments for attendify-api
#[derive(Parser, Debug)]
#[command(name = "attendify-api")]
#[command(about = "Attendance tracking service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5870", env = "ATTENDIFY_PORT")]
    port: u16,

    /// Data directory holding the SQLite database
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Externally reachable base URL used in attendance links
    #[arg(long, env = "ATTENDIFY_PUBLIC_URL")]
    public_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendify_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Attendify API v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config::resolve_data_dir(args.data_dir.as_deref());
    let db_path = config::database_path(&data_dir);
    info!("Database path: {}", db_path.display());

    let pool = attendify_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let public_url = args
        .public_url
        .unwrap_or_else(|| format!("http://localhost:{}", args.port));

    let state = AppState::new(pool, public_url);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
