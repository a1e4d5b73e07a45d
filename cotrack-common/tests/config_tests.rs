//! Tests for configuration loading and path resolution
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate COTRACK_* variables are marked with #[serial]
//! to ensure they run sequentially, not in parallel.

use cotrack_common::config::{
    resolve_database_path, resolve_root_folder, SliceOrder, StoreBackend, TomlConfig,
    CONFIG_ENV_VAR, DATABASE_ENV_VAR, DATABASE_FILE_NAME, ROOT_FOLDER_ENV_VAR,
};
use cotrack_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};

fn clear_env() {
    env::remove_var(CONFIG_ENV_VAR);
    env::remove_var(ROOT_FOLDER_ENV_VAR);
    env::remove_var(DATABASE_ENV_VAR);
}

#[test]
fn test_load_full_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        root_folder = "/srv/cotrack"
        database_path = "/srv/cotrack/counts.db"
        backend = "sqlite"

        [ingest]
        corpus_folder = "/data/mpd/data"
        slice_limit = 20
        slice_order = "numeric"

        [recommend]
        top_n = 15
        k_per_seed = 100

        [logging]
        level = "debug"
        file = "/var/log/cotrack.log"
        "#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/cotrack")));
    assert_eq!(config.backend, StoreBackend::Sqlite);
    assert_eq!(config.ingest.corpus_folder, Some(PathBuf::from("/data/mpd/data")));
    assert_eq!(config.ingest.slice_limit, 20);
    assert_eq!(config.ingest.slice_order, SliceOrder::Numeric);
    assert_eq!(config.recommend.top_n, 15);
    assert_eq!(config.recommend.k_per_seed, 100);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.file, Some(PathBuf::from("/var/log/cotrack.log")));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "backend = \"cassandra\"").unwrap();

    let result = TomlConfig::load(&path);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_explicit_missing_config_is_error() {
    clear_env();
    let result = TomlConfig::load_or_default(Some(Path::new("/nonexistent/cotrack.toml")));
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_config_env_var_is_used() {
    clear_env();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("env.toml");
    std::fs::write(&path, "[recommend]\ntop_n = 3\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let config = TomlConfig::load_or_default(None).unwrap();
    assert_eq!(config.recommend.top_n, 3);

    clear_env();
}

#[test]
#[serial]
fn test_root_folder_priority() {
    clear_env();
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    // TOML beats the compiled default
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/toml"));

    // Environment beats TOML
    env::set_var(ROOT_FOLDER_ENV_VAR, "/from/env");
    assert_eq!(resolve_root_folder(None, &config), PathBuf::from("/from/env"));

    // CLI beats everything
    assert_eq!(
        resolve_root_folder(Some(Path::new("/from/cli")), &config),
        PathBuf::from("/from/cli")
    );

    clear_env();
}

#[test]
#[serial]
fn test_root_folder_default_when_unconfigured() {
    clear_env();
    let root = resolve_root_folder(None, &TomlConfig::default());
    assert!(!root.as_os_str().is_empty());
    assert!(root.to_string_lossy().contains("cotrack"));
}

#[test]
#[serial]
fn test_database_path_falls_back_to_root_folder() {
    clear_env();
    let path = resolve_database_path(None, Path::new("/srv/cotrack"), &TomlConfig::default());
    assert_eq!(path, Path::new("/srv/cotrack").join(DATABASE_FILE_NAME));

    env::set_var(DATABASE_ENV_VAR, "/from/env.db");
    let path = resolve_database_path(None, Path::new("/srv/cotrack"), &TomlConfig::default());
    assert_eq!(path, PathBuf::from("/from/env.db"));

    clear_env();
}
