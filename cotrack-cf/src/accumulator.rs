//! Pairwise co-occurrence accumulation
//!
//! Every unordered pair of positions in a playlist is counted once, in both
//! directions. Positions are not deduplicated: a song listed twice pairs with
//! every other song twice. The only pairs left out are the ones where both
//! positions hold the same song, since the store never records self-pairs.

use crate::store::CountStore;
use cotrack_common::{Playlist, Result, Song};
use serde::Serialize;
use tracing::{debug, trace};

/// Running totals for one accumulation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccumulationStats {
    /// Playlists fully committed to the store
    pub playlists: u64,
    /// Unordered pairs upserted (each adds 2 to the table total)
    pub pairs_upserted: u64,
    /// Position pairs skipped because both positions held the same song
    pub self_pairs_skipped: u64,
}

impl AccumulationStats {
    /// Fold another pass into this one
    pub fn merge(&mut self, other: &AccumulationStats) {
        self.playlists += other.playlists;
        self.pairs_upserted += other.pairs_upserted;
        self.self_pairs_skipped += other.self_pairs_skipped;
    }
}

/// Feeds playlists into a count store
pub struct Accumulator<'a, S: CountStore + ?Sized> {
    store: &'a S,
    stats: AccumulationStats,
}

impl<'a, S: CountStore + ?Sized> Accumulator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            stats: AccumulationStats::default(),
        }
    }

    pub fn stats(&self) -> &AccumulationStats {
        &self.stats
    }

    /// Count one playlist; returns the number of pairs upserted
    ///
    /// The pairs of a playlist are written as one batch, so a store failure
    /// leaves no partial playlist behind in transactional backends.
    pub async fn add_playlist(&mut self, playlist: &Playlist) -> Result<u64> {
        let (pairs, skipped) = position_pairs(&playlist.tracks);

        if !pairs.is_empty() {
            self.store.upsert_pairs(&pairs).await?;
        }

        let upserted = pairs.len() as u64;
        self.stats.playlists += 1;
        self.stats.pairs_upserted += upserted;
        self.stats.self_pairs_skipped += skipped;

        trace!(
            tracks = playlist.len(),
            pairs = upserted,
            skipped,
            "Accumulated playlist"
        );
        Ok(upserted)
    }

    /// Count every playlist of a forward-only source
    ///
    /// Stops at the first error; playlists before it stay committed.
    pub async fn add_playlists<I>(&mut self, playlists: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Playlist>>,
    {
        for playlist in playlists {
            self.add_playlist(&playlist?).await?;
        }
        debug!(
            playlists = self.stats.playlists,
            pairs = self.stats.pairs_upserted,
            "Accumulation pass finished"
        );
        Ok(())
    }

    pub fn into_stats(self) -> AccumulationStats {
        self.stats
    }
}

/// All `(tracks[i], tracks[j])` with `i < j`, minus identical-song pairs
fn position_pairs(tracks: &[Song]) -> (Vec<(Song, Song)>, u64) {
    let n = tracks.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    let mut skipped = 0;

    for (i, first) in tracks.iter().enumerate() {
        for second in &tracks[i + 1..] {
            if first == second {
                skipped += 1;
                continue;
            }
            pairs.push((first.clone(), second.clone()));
        }
    }

    (pairs, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCountStore;
    use cotrack_common::Error;

    fn song(artist: &str, track: &str) -> Song {
        Song::new(artist, track)
    }

    #[test]
    fn test_position_pairs_distinct() {
        let tracks = vec![song("A", "X"), song("B", "Y"), song("C", "Z")];
        let (pairs, skipped) = position_pairs(&tracks);

        assert_eq!(skipped, 0);
        assert_eq!(
            pairs,
            vec![
                (song("A", "X"), song("B", "Y")),
                (song("A", "X"), song("C", "Z")),
                (song("B", "Y"), song("C", "Z")),
            ]
        );
    }

    #[test]
    fn test_position_pairs_short_playlists() {
        assert_eq!(position_pairs(&[]), (vec![], 0));
        assert_eq!(position_pairs(&[song("A", "X")]), (vec![], 0));
    }

    #[tokio::test]
    async fn test_duplicate_song_counts_every_position() {
        let store = InMemoryCountStore::new();
        let (a, b) = (song("A", "X"), song("B", "Y"));
        let playlist = Playlist::new(vec![a.clone(), b.clone(), a.clone()]);

        let mut accumulator = Accumulator::new(&store);
        let upserted = accumulator.add_playlist(&playlist).await.unwrap();

        assert_eq!(upserted, 2);
        assert_eq!(accumulator.stats().self_pairs_skipped, 1);
        assert_eq!(store.count(&a, &b).await.unwrap(), Some(2));
        assert_eq!(store.count(&b, &a).await.unwrap(), Some(2));
        assert_eq!(store.count(&a, &a).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_playlists_stops_at_first_error() {
        let store = InMemoryCountStore::new();
        let good = Playlist::new(vec![song("A", "X"), song("B", "Y")]);
        let never = Playlist::new(vec![song("C", "Z"), song("D", "W")]);
        let source = vec![
            Ok(good),
            Err(Error::InvalidInput("broken record".to_string())),
            Ok(never),
        ];

        let mut accumulator = Accumulator::new(&store);
        let result = accumulator.add_playlists(source).await;

        assert!(result.is_err());
        assert_eq!(accumulator.stats().playlists, 1);
        assert_eq!(store.total_count().await.unwrap(), 2);
        assert_eq!(store.count(&song("C", "Z"), &song("D", "W")).await.unwrap(), None);
    }

    #[test]
    fn test_stats_merge() {
        let mut total = AccumulationStats {
            playlists: 1,
            pairs_upserted: 3,
            self_pairs_skipped: 0,
        };
        total.merge(&AccumulationStats {
            playlists: 2,
            pairs_upserted: 5,
            self_pairs_skipped: 1,
        });
        assert_eq!(
            total,
            AccumulationStats {
                playlists: 3,
                pairs_upserted: 8,
                self_pairs_skipped: 1,
            }
        );
    }
}
