use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::get_styles;
use livingroom_sync::config::{AppConfig, CliConfig, FileConfig};
use livingroom_sync::library_store::{LibraryStore, SqliteLibraryStore};
use livingroom_sync::lyrics::GeniusClient;
use livingroom_sync::sync::{import_library_file, sync_lyrics};

fn parse_path(s: &str) -> Result<PathBuf> {
    let original_path = PathBuf::from(s);
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(styles = get_styles(), version, about)]
struct CliArgs {
    /// Path to the SQLite library database file, created when missing.
    #[clap(long, env = "LIBRARY_DB_PATH", value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// Path to a TOML config file. Its values override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetches lyrics for every artist-linked video that has none yet.
    SyncLyrics {
        /// Genius API access token.
        #[clap(long, env = "LYRIC_GENIUS_TOKEN", hide_env_values = true)]
        genius_token: Option<String>,
    },

    /// Imports a library export (JSON array of songs) into the database.
    ImportLibrary {
        #[clap(value_parser = parse_path)]
        file: PathBuf,
    },

    /// Prints row counts of the database.
    Stats,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        genius_token: match &cli_args.command {
            Command::SyncLyrics { genius_token } => genius_token.clone(),
            _ => None,
        },
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    match cli_args.command {
        Command::SyncLyrics { .. } => {
            let token = config.require_genius_token()?;
            let provider = GeniusClient::with_api_base(token, &config.genius_api_base)
                .context("Failed to create Genius client")?;
            let store = SqliteLibraryStore::open(&config.db_path)?;
            let report = sync_lyrics(&store, &provider)?;
            store.close()?;
            info!(
                "Visited {} artists and {} videos: {} lyrics fetched, {} already present, {} not found, {} failed",
                report.artists_visited,
                report.videos_visited,
                report.fetched,
                report.already_present,
                report.not_found,
                report.failed
            );
        }
        Command::ImportLibrary { file } => {
            let store = SqliteLibraryStore::open(&config.db_path)?;
            let report = import_library_file(&store, &file)?;
            store.close()?;
            info!(
                "Imported {} songs from {:?} ({} rows inserted, {} updated)",
                report.songs, file, report.inserted, report.updated
            );
        }
        Command::Stats => {
            let store = SqliteLibraryStore::open(&config.db_path)?;
            let stats = store.get_stats()?;
            store.close()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
