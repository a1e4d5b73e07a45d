//! Configuration loading and path resolution
//!
//! Bootstrap settings come from an optional TOML file. Every field has a
//! built-in default, so a missing config file never prevents startup.
//!
//! Resolution priority for paths:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "COTRACK_CONFIG";
/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "COTRACK_ROOT_FOLDER";
/// Environment variable overriding the database path
pub const DATABASE_ENV_VAR: &str = "COTRACK_DATABASE";
/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "co_occurrences.db";

pub const DEFAULT_SLICE_LIMIT: usize = 5;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_K_PER_SEED: usize = 50;

/// Count store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Durable SQLite table, reused across runs
    #[default]
    Sqlite,
    /// Transient table rebuilt from the corpus on every run
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend '{}' (expected sqlite or memory)", other)),
        }
    }
}

/// Order in which corpus slice files are ingested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliceOrder {
    /// Plain file name order
    #[default]
    Lexicographic,
    /// Order by the integers embedded in the file name (`slice.1000-1999.json`)
    Numeric,
}

impl FromStr for SliceOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lexicographic" => Ok(Self::Lexicographic),
            "numeric" => Ok(Self::Numeric),
            other => Err(format!(
                "unknown slice order '{}' (expected lexicographic or numeric)",
                other
            )),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database when no explicit path is given
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub recommend: RecommendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Corpus ingestion settings
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Folder containing `*.json` playlist slices
    #[serde(default)]
    pub corpus_folder: Option<PathBuf>,

    /// Maximum number of slices ingested per run
    #[serde(default = "default_slice_limit")]
    pub slice_limit: usize,

    #[serde(default)]
    pub slice_order: SliceOrder,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            corpus_folder: None,
            slice_limit: default_slice_limit(),
            slice_order: SliceOrder::default(),
        }
    }
}

/// Recommendation request defaults
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Neighbors fetched per seed song before normalization
    #[serde(default = "default_k_per_seed")]
    pub k_per_seed: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            k_per_seed: default_k_per_seed(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_slice_limit() -> usize {
    DEFAULT_SLICE_LIMIT
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_k_per_seed() -> usize {
    DEFAULT_K_PER_SEED
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the config file, falling back to defaults when none exists
    ///
    /// An explicit path (CLI argument or `COTRACK_CONFIG`) must exist. The
    /// platform default location is optional. A file that exists but does not
    /// parse is always an error.
    pub fn load_or_default(cli_arg: Option<&Path>) -> Result<Self> {
        let explicit = cli_arg
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from {}", path.display());
            return Self::load(&path);
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                info!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Platform config file location (`~/.config/cotrack/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cotrack").join("config.toml"))
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cotrack"))
        .unwrap_or_else(|| PathBuf::from("./cotrack_data"))
}

/// Resolve the root folder: CLI, `COTRACK_ROOT_FOLDER`, TOML, OS default
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(path) = std::env::var_os(ROOT_FOLDER_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Resolve the database path: CLI, `COTRACK_DATABASE`, TOML, root folder
pub fn resolve_database_path(
    cli_arg: Option<&Path>,
    root_folder: &Path,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Some(path) = std::env::var_os(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.database_path {
        return path.clone();
    }

    root_folder.join(DATABASE_FILE_NAME)
}
