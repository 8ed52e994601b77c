//! fq-server - FrameQuiz game backend
//!
//! Serves the game API, health check, robots.txt and the film stills.

use anyhow::{Context, Result};
use clap::Parser;
use fq_common::config::{resolve_root_folder, RootFolder, TomlConfig};
use fq_common::db::init_database;
use fq_common::performance::PerformanceTable;
use fq_common::{GameService, SqliteStore};
use fq_server::{build_router, AppState};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for fq-server
#[derive(Parser, Debug)]
#[command(name = "fq-server")]
#[command(about = "Film still trivia game server")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides the config file)
    #[arg(short, long, env = "FQ_PORT")]
    port: Option<u16>,

    /// Root folder holding the database, media and performance table
    #[arg(short, long, env = "FQ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long, env = "FQ_CONFIG")]
    config: Option<PathBuf>,
}

fn init_tracing(config: &TomlConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},tower_http=debug", config.logging.level).into());

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_deref());
    init_tracing(&config)?;

    info!(
        "Starting FrameQuiz server (fq-server) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &config));
    root.ensure_exists()
        .with_context(|| format!("Failed to create root folder {}", root.path().display()))?;
    info!("Root folder: {}", root.path().display());

    let db_path = root.database_path();
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let performance = PerformanceTable::load(&root.performance_table_path(&config));
    info!("Loaded {} performance tiers", performance.len());

    let game = GameService::new(Arc::new(SqliteStore::new(pool)))
        .with_performance_table(performance)
        .with_media_url(config.media_url.clone());

    let state = AppState::new(game);
    let app = build_router(state, Some((config.media_url.clone(), root.media_dir())));

    let port = args.port.unwrap_or(config.port);
    let addr = format!("{}:{}", config.bind_host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("fq-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
