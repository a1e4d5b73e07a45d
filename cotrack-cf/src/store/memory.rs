//! Transient in-memory count store

use super::{by_count_then_song, reject_self_pair, CountStore, Neighbor, NeighborList};
use async_trait::async_trait;
use cotrack_common::{Result, Song};
use std::collections::HashMap;
use tokio::sync::RwLock;

type Table = HashMap<Song, HashMap<Song, u64>>;

/// Count store held entirely in working memory
///
/// Suited to rebuild-per-run use: the table is gone when the value is dropped.
#[derive(Debug, Default)]
pub struct InMemoryCountStore {
    table: RwLock<Table>,
}

impl InMemoryCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct anchor songs
    pub async fn song_count(&self) -> usize {
        self.table.read().await.len()
    }

    fn increment(table: &mut Table, a: &Song, b: &Song) {
        *table
            .entry(a.clone())
            .or_default()
            .entry(b.clone())
            .or_insert(0) += 1;
    }
}

#[async_trait]
impl CountStore for InMemoryCountStore {
    async fn upsert_pair(&self, a: &Song, b: &Song) -> Result<()> {
        reject_self_pair(a, b)?;
        let mut table = self.table.write().await;
        Self::increment(&mut table, a, b);
        Self::increment(&mut table, b, a);
        Ok(())
    }

    async fn upsert_pairs(&self, pairs: &[(Song, Song)]) -> Result<()> {
        // Validate first so a bad pair leaves the table untouched
        for (a, b) in pairs {
            reject_self_pair(a, b)?;
        }
        let mut table = self.table.write().await;
        for (a, b) in pairs {
            Self::increment(&mut table, a, b);
            Self::increment(&mut table, b, a);
        }
        Ok(())
    }

    async fn top_neighbors(&self, anchor: &Song, k: usize) -> Result<NeighborList<u64>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let table = self.table.read().await;
        let Some(row) = table.get(anchor) else {
            return Ok(Vec::new());
        };

        let mut neighbors: NeighborList<u64> = row
            .iter()
            .map(|(song, count)| Neighbor::new(song.clone(), *count))
            .collect();
        neighbors.sort_by(by_count_then_song);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    async fn count(&self, a: &Song, b: &Song) -> Result<Option<u64>> {
        let table = self.table.read().await;
        Ok(table.get(a).and_then(|row| row.get(b)).copied())
    }

    async fn total_count(&self) -> Result<u64> {
        let table = self.table.read().await;
        Ok(table.values().flat_map(|row| row.values()).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotrack_common::Error;

    fn song(artist: &str, track: &str) -> Song {
        Song::new(artist, track)
    }

    #[tokio::test]
    async fn test_upsert_is_symmetric() {
        let store = InMemoryCountStore::new();
        let (a, b) = (song("A", "X"), song("B", "Y"));

        store.upsert_pair(&a, &b).await.unwrap();
        store.upsert_pair(&b, &a).await.unwrap();

        assert_eq!(store.count(&a, &b).await.unwrap(), Some(2));
        assert_eq!(store.count(&b, &a).await.unwrap(), Some(2));
        assert_eq!(store.total_count().await.unwrap(), 4);
        assert_eq!(store.song_count().await, 2);
    }

    #[tokio::test]
    async fn test_self_pair_rejected() {
        let store = InMemoryCountStore::new();
        let a = song("A", "X");

        let result = store.upsert_pair(&a, &a).await;

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.count(&a, &a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_batch_with_self_pair_leaves_table_untouched() {
        let store = InMemoryCountStore::new();
        let (a, b) = (song("A", "X"), song("B", "Y"));

        let result = store
            .upsert_pairs(&[(a.clone(), b.clone()), (a.clone(), a.clone())])
            .await;

        assert!(result.is_err());
        assert_eq!(store.total_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_neighbors_orders_and_truncates() {
        let store = InMemoryCountStore::new();
        let anchor = song("A", "X");
        let (b, c, d) = (song("B", "Y"), song("C", "Z"), song("D", "W"));

        for _ in 0..3 {
            store.upsert_pair(&anchor, &d).await.unwrap();
        }
        store.upsert_pair(&anchor, &c).await.unwrap();
        store.upsert_pair(&anchor, &b).await.unwrap();

        let top = store.top_neighbors(&anchor, 2).await.unwrap();
        assert_eq!(
            top,
            vec![Neighbor::new(d, 3), Neighbor::new(b, 1)],
            "highest count first, ties by song"
        );
    }

    #[tokio::test]
    async fn test_top_neighbors_unknown_anchor_or_zero_k() {
        let store = InMemoryCountStore::new();
        let (a, b) = (song("A", "X"), song("B", "Y"));
        store.upsert_pair(&a, &b).await.unwrap();

        assert!(store.top_neighbors(&song("Nobody", "Nothing"), 10).await.unwrap().is_empty());
        assert!(store.top_neighbors(&a, 0).await.unwrap().is_empty());
    }
}
