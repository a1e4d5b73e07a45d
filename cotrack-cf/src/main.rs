//! cotrack-cf - co-occurrence playlist recommender
//!
//! Subcommands:
//! - `ingest`: count song pairs from a corpus folder into the store
//! - `neighbors`: show the raw top-K co-occurring songs of one song
//! - `recommend`: rank songs for a seed playlist
//!
//! With the `memory` backend the table only lives for one process, so
//! `neighbors` and `recommend` ingest the corpus folder before answering.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cotrack_cf::corpus::read_playlist;
use cotrack_cf::ingest::ingest_folder;
use cotrack_cf::recommender::top_co_occurrences;
use cotrack_cf::{CountStore, InMemoryCountStore, Recommender, SqliteCountStore};
use cotrack_common::config::{
    resolve_database_path, resolve_root_folder, LoggingConfig, SliceOrder, StoreBackend,
    TomlConfig,
};
use cotrack_common::{Playlist, Song};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Command-line arguments for cotrack-cf
#[derive(Parser, Debug)]
#[command(name = "cotrack-cf")]
#[command(about = "Playlist co-occurrence recommender")]
#[command(version)]
struct Args {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root folder holding the database
    #[arg(long, global = true)]
    root_folder: Option<PathBuf>,

    /// SQLite database path (overrides root folder)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Count store backend: sqlite or memory
    #[arg(long, global = true)]
    backend: Option<StoreBackend>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count co-occurrences from a folder of playlist slices
    Ingest {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Show the songs most often found alongside one song
    Neighbors {
        #[arg(long)]
        artist: String,

        #[arg(long)]
        track: String,

        /// Number of neighbors
        #[arg(short, long, default_value_t = 10)]
        k: usize,

        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Recommend songs for a seed playlist
    Recommend {
        /// Seed song as "Artist - Track" (repeatable)
        #[arg(long = "seed")]
        seeds: Vec<String>,

        /// JSON file with {"tracks": [{"artist_name", "track_name"}, ...]}
        #[arg(long)]
        seed_file: Option<PathBuf>,

        /// Number of recommendations
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Neighbors considered per seed song
        #[arg(long)]
        k_per_seed: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

#[derive(clap::Args, Debug)]
struct CorpusArgs {
    /// Folder containing *.json playlist slices
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Maximum number of slices to ingest
    #[arg(long)]
    slice_limit: Option<usize>,

    /// Slice order: lexicographic or numeric
    #[arg(long)]
    order: Option<SliceOrder>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    init_tracing(args.log_level.as_deref(), &config.logging)?;

    info!(
        "Starting cotrack-cf v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let backend = args.backend.unwrap_or(config.backend);
    let store = open_store(backend, &args, &config).await?;

    match &args.command {
        Command::Ingest { corpus } => {
            let report = run_ingest(store.as_ref(), corpus, &config).await?;
            println!(
                "Ingested {} slices, {} playlists, {} song pairs",
                report.slices, report.stats.playlists, report.stats.pairs_upserted
            );
        }

        Command::Neighbors {
            artist,
            track,
            k,
            corpus,
        } => {
            if backend == StoreBackend::Memory {
                run_ingest(store.as_ref(), corpus, &config).await?;
            }
            let song = Song::new(artist.as_str(), track.as_str());
            let neighbors = top_co_occurrences(store.as_ref(), &song, *k).await?;
            for neighbor in neighbors {
                println!("{}: {} times", neighbor.song, neighbor.weight);
            }
        }

        Command::Recommend {
            seeds,
            seed_file,
            top_n,
            k_per_seed,
            json,
            corpus,
        } => {
            let seed = collect_seed(seeds, seed_file.as_deref())?;
            if backend == StoreBackend::Memory {
                run_ingest(store.as_ref(), corpus, &config).await?;
            }

            let recommender =
                Recommender::new(k_per_seed.unwrap_or(config.recommend.k_per_seed));
            let top_n = top_n.unwrap_or(config.recommend.top_n);
            let result = recommender.recommend(store.as_ref(), &seed, top_n).await?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for (i, item) in result.items.iter().enumerate() {
                    println!("{:>3}. {} ({:.4})", i + 1, item.song, item.score);
                }
                if let Some(notice) = result.notice {
                    eprintln!("No recommendations: {}", notice);
                }
            }
        }
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` wins over config and CLI level
fn init_tracing(cli_level: Option<&str>, logging: &LoggingConfig) -> Result<()> {
    let level = cli_level.unwrap_or(logging.level.as_str());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

async fn open_store(
    backend: StoreBackend,
    args: &Args,
    config: &TomlConfig,
) -> Result<Box<dyn CountStore>> {
    match backend {
        StoreBackend::Memory => {
            info!("Using in-memory count store");
            Ok(Box::new(InMemoryCountStore::new()))
        }
        StoreBackend::Sqlite => {
            let root_folder = resolve_root_folder(args.root_folder.as_deref(), config);
            let db_path = resolve_database_path(args.database.as_deref(), &root_folder, config);
            info!("Database path: {}", db_path.display());
            let store = SqliteCountStore::open(&db_path)
                .await
                .with_context(|| format!("Failed to open database {}", db_path.display()))?;
            Ok(Box::new(store))
        }
    }
}

async fn run_ingest(
    store: &dyn CountStore,
    corpus: &CorpusArgs,
    config: &TomlConfig,
) -> Result<cotrack_cf::ingest::IngestReport> {
    let Some(folder) = corpus
        .corpus
        .as_deref()
        .or(config.ingest.corpus_folder.as_deref())
    else {
        bail!("No corpus folder given (use --corpus or [ingest] corpus_folder)");
    };

    let order = corpus.order.unwrap_or(config.ingest.slice_order);
    let slice_limit = corpus.slice_limit.unwrap_or(config.ingest.slice_limit);
    info!(
        "Ingesting up to {} slices from {} ({:?} order)",
        slice_limit,
        folder.display(),
        order
    );

    ingest_folder(store, folder, order, slice_limit)
        .await
        .with_context(|| format!("Ingestion of {} failed", folder.display()))
}

fn collect_seed(seeds: &[String], seed_file: Option<&Path>) -> Result<Playlist> {
    let mut tracks = Vec::new();

    if let Some(path) = seed_file {
        let playlist = read_playlist(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        tracks.extend(playlist.tracks);
    }

    for seed in seeds {
        match Song::parse_display(seed) {
            Some(song) => tracks.push(song),
            None => bail!("Seed '{}' is not in \"Artist - Track\" form", seed),
        }
    }

    if tracks.is_empty() {
        warn!("Recommend called without seed songs");
        bail!("No seed songs given (use --seed or --seed-file)");
    }

    Ok(Playlist::new(tracks))
}
