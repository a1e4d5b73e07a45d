//! Durable SQLite count store
//!
//! Rows live in the `co_occurrences` table created by
//! `cotrack_common::db::init_database`. Each pair upsert writes both
//! directions inside one transaction, so a reader never observes a half
//! applied increment.

use super::{reject_self_pair, CountStore, Neighbor, NeighborList};
use async_trait::async_trait;
use cotrack_common::db::{init_database, init_memory_database};
use cotrack_common::{Result, Song};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::path::Path;

const UPSERT_SQL: &str = r#"
    INSERT INTO co_occurrences (song1_artist, song1_track, song2_artist, song2_track, count)
    VALUES (?, ?, ?, ?, 1)
    ON CONFLICT(song1_artist, song1_track, song2_artist, song2_track)
    DO UPDATE SET count = count + 1
"#;

/// Count store backed by a SQLite table
#[derive(Debug, Clone)]
pub struct SqliteCountStore {
    pool: SqlitePool,
}

impl SqliteCountStore {
    /// Open the database at `path`, creating file and schema if absent
    pub async fn open(path: &Path) -> Result<Self> {
        let pool = init_database(path).await?;
        Ok(Self { pool })
    }

    /// Private in-memory database with the durable schema
    pub async fn in_memory() -> Result<Self> {
        let pool = init_memory_database().await?;
        Ok(Self { pool })
    }

    /// Wrap an already initialized pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Flush and close all connections
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn increment(tx: &mut Transaction<'_, Sqlite>, a: &Song, b: &Song) -> Result<()> {
        sqlx::query(UPSERT_SQL)
            .bind(&a.artist_name)
            .bind(&a.track_name)
            .bind(&b.artist_name)
            .bind(&b.track_name)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CountStore for SqliteCountStore {
    async fn upsert_pair(&self, a: &Song, b: &Song) -> Result<()> {
        reject_self_pair(a, b)?;
        let mut tx = self.pool.begin().await?;
        Self::increment(&mut tx, a, b).await?;
        Self::increment(&mut tx, b, a).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn upsert_pairs(&self, pairs: &[(Song, Song)]) -> Result<()> {
        for (a, b) in pairs {
            reject_self_pair(a, b)?;
        }
        // Dropping the transaction on error rolls the whole batch back
        let mut tx = self.pool.begin().await?;
        for (a, b) in pairs {
            Self::increment(&mut tx, a, b).await?;
            Self::increment(&mut tx, b, a).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn top_neighbors(&self, anchor: &Song, k: usize) -> Result<NeighborList<u64>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        // BINARY collation orders by bytes, matching `Ord for String`
        let rows = sqlx::query(
            r#"
            SELECT song2_artist, song2_track, count
            FROM co_occurrences
            WHERE song1_artist = ? AND song1_track = ?
            ORDER BY count DESC, song2_artist ASC, song2_track ASC
            LIMIT ?
            "#,
        )
        .bind(&anchor.artist_name)
        .bind(&anchor.track_name)
        .bind(i64::try_from(k).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let neighbors = rows
            .iter()
            .map(|row| {
                let count: i64 = row.get("count");
                Neighbor::new(
                    Song::new(
                        row.get::<String, _>("song2_artist"),
                        row.get::<String, _>("song2_track"),
                    ),
                    count.max(0) as u64,
                )
            })
            .collect();

        Ok(neighbors)
    }

    async fn count(&self, a: &Song, b: &Song) -> Result<Option<u64>> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT count FROM co_occurrences
            WHERE song1_artist = ? AND song1_track = ? AND song2_artist = ? AND song2_track = ?
            "#,
        )
        .bind(&a.artist_name)
        .bind(&a.track_name)
        .bind(&b.artist_name)
        .bind(&b.track_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(count.map(|c| c.max(0) as u64))
    }

    async fn total_count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(count), 0) FROM co_occurrences")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }
}
