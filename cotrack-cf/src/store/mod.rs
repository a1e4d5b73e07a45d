//! Co-occurrence count storage
//!
//! [`CountStore`] is the only capability the accumulator and recommender need.
//! Both backends keep the table symmetric (`count(a, b) == count(b, a)`) and
//! never store a song paired with itself.

mod memory;
mod sqlite;

pub use memory::InMemoryCountStore;
pub use sqlite::SqliteCountStore;

use async_trait::async_trait;
use cotrack_common::{Error, Result, Song};
use serde::Serialize;
use std::cmp::Ordering;

/// One neighbor of an anchor song
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor<W> {
    pub song: Song,
    pub weight: W,
}

impl<W> Neighbor<W> {
    pub fn new(song: Song, weight: W) -> Self {
        Self { song, weight }
    }
}

/// Neighbors of one anchor, heaviest first
///
/// Raw counts (`u64`) straight from a store, or local weights (`f64`) after
/// normalization.
pub type NeighborList<W> = Vec<Neighbor<W>>;

/// Symmetric pair-count table
#[async_trait]
pub trait CountStore: Send + Sync {
    /// Increment `count(a, b)` and `count(b, a)` by one, as a unit
    ///
    /// Fails with [`Error::InvalidInput`] when `a == b`.
    async fn upsert_pair(&self, a: &Song, b: &Song) -> Result<()>;

    /// Upsert a batch of pairs
    ///
    /// Backends with transactions commit the whole batch or nothing.
    async fn upsert_pairs(&self, pairs: &[(Song, Song)]) -> Result<()> {
        for (a, b) in pairs {
            self.upsert_pair(a, b).await?;
        }
        Ok(())
    }

    /// Up to `k` neighbors of `anchor`, by count descending then song ascending
    ///
    /// An unknown anchor yields an empty list.
    async fn top_neighbors(&self, anchor: &Song, k: usize) -> Result<NeighborList<u64>>;

    /// Raw count for the ordered pair, `None` if never set
    async fn count(&self, a: &Song, b: &Song) -> Result<Option<u64>>;

    /// Sum of every stored count (both directions)
    async fn total_count(&self) -> Result<u64>;
}

pub(crate) fn reject_self_pair(a: &Song, b: &Song) -> Result<()> {
    if a == b {
        return Err(Error::InvalidInput(format!(
            "cannot pair song '{}' with itself",
            a
        )));
    }
    Ok(())
}

/// Ranking order shared by the backends: count descending, song ascending
pub(crate) fn by_count_then_song(a: &Neighbor<u64>, b: &Neighbor<u64>) -> Ordering {
    b.weight.cmp(&a.weight).then_with(|| a.song.cmp(&b.song))
}
