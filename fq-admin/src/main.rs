//! fq-admin - FrameQuiz maintenance commands
//!
//! Runs against the same root folder as fq-server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fq_admin::{cleanup_images, load_catalog, purge_sessions, TierLimits};
use fq_common::config::{resolve_root_folder, RootFolder, TomlConfig};
use fq_common::db::init_database;
use fq_common::SqliteStore;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fq-admin")]
#[command(about = "Catalog and session maintenance for FrameQuiz")]
#[command(version)]
struct Args {
    /// Root folder holding the database and media
    #[arg(short, long, global = true, env = "FQ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Path to the TOML config file
    #[arg(short, long, global = true, env = "FQ_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load film stills listed in a TOML manifest
    Load {
        /// Manifest with one [[image]] table per still
        manifest: PathBuf,

        /// Directory containing the source image files
        images_dir: PathBuf,
    },

    /// Delete sessions idle for longer than the retention window
    PurgeSessions {
        /// Days of inactivity to keep (defaults to session_retention_days)
        #[arg(long)]
        days: Option<i64>,
    },

    /// Keep only the lowest-id stills of each tier
    CleanupImages {
        #[arg(long, default_value_t = 15)]
        easy: usize,

        #[arg(long, default_value_t = 20)]
        medium: usize,

        #[arg(long, default_value_t = 15)]
        hard: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = TomlConfig::load(args.config.as_deref());

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.logging.level.as_str().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let root = RootFolder::new(resolve_root_folder(args.root_folder.as_deref(), &config));
    root.ensure_exists()
        .with_context(|| format!("Failed to create root folder {}", root.path().display()))?;

    let db_path = root.database_path();
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    let store = SqliteStore::new(pool);

    match args.command {
        Command::Load { manifest, images_dir } => {
            let report = load_catalog(&store, &manifest, &images_dir, &root.media_dir()).await?;
            println!("Loaded {} image(s), skipped {}", report.loaded, report.skipped);
        }
        Command::PurgeSessions { days } => {
            let days = days.unwrap_or(config.session_retention_days);
            let deleted = purge_sessions(&store, days).await?;
            println!("Deleted {} session(s) older than {} day(s)", deleted, days);
        }
        Command::CleanupImages { easy, medium, hard } => {
            let deleted = cleanup_images(&store, TierLimits { easy, medium, hard }).await?;
            for (tier, count) in deleted {
                println!("{}: deleted {}", tier, count);
            }
        }
    }

    info!("fq-admin finished");
    Ok(())
}
