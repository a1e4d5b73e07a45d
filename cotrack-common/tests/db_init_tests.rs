//! Tests for database initialization

use cotrack_common::db::init::{init_database, init_memory_database, SCHEMA_VERSION};

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("co_occurrences.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("co_occurrences.db");

    let pool1 = init_database(&db_path).await;
    assert!(pool1.is_ok());
    drop(pool1);

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_schema_version_recorded_once() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("co_occurrences.db");

    init_database(&db_path).await.unwrap().close().await;
    let pool = init_database(&db_path).await.unwrap();

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_version")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(versions, vec![SCHEMA_VERSION]);
}

#[tokio::test]
async fn test_co_occurrences_primary_key_rejects_duplicates() {
    let pool = init_memory_database().await.unwrap();

    let insert = "INSERT INTO co_occurrences \
        (song1_artist, song1_track, song2_artist, song2_track, count) \
        VALUES ('A', 'X', 'B', 'Y', 1)";
    sqlx::query(insert).execute(&pool).await.unwrap();
    let second = sqlx::query(insert).execute(&pool).await;

    assert!(second.is_err(), "Duplicate ordered pair should violate primary key");
}
