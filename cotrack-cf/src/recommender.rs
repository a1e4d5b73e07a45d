//! Seed playlist recommendations
//!
//! For each seed song the store's top-K neighbors are normalized into a local
//! distribution; the distributions are summed and the result is ranked by
//! score (ties by song identity). Seed songs are skipped while walking the
//! ranking and do not use up the requested count.

use crate::combiner::{combine, ScoreMap};
use crate::normalizer::normalize;
use crate::store::{CountStore, NeighborList};
use cotrack_common::config::DEFAULT_K_PER_SEED;
use cotrack_common::{Playlist, Result, Song};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// One ranked suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub song: Song,
    pub score: f64,
}

/// Why a request produced no suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// None of the seed songs has any co-occurring song in the store
    NoSeedNeighbors,
    /// Every candidate was already in the seed playlist
    AllCandidatesSeeded,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoSeedNeighbors => write!(f, "no co-occurring songs found for any seed song"),
            Notice::AllCandidatesSeeded => {
                write!(f, "every co-occurring song is already in the seed playlist")
            }
        }
    }
}

/// Result of one recommendation request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub items: Vec<Recommendation>,
    /// Set when `items` is empty for a reason the caller may want to report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl Recommendations {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Stateless recommender; every call is an independent read of the store
#[derive(Debug, Clone, Copy)]
pub struct Recommender {
    k_per_seed: usize,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(DEFAULT_K_PER_SEED)
    }
}

impl Recommender {
    pub fn new(k_per_seed: usize) -> Self {
        Self { k_per_seed }
    }

    pub fn k_per_seed(&self) -> usize {
        self.k_per_seed
    }

    /// Rank up to `top_n` songs that are not in `seed`
    ///
    /// A seed song unknown to the store contributes nothing. Store errors are
    /// returned unchanged.
    pub async fn recommend<S>(
        &self,
        store: &S,
        seed: &Playlist,
        top_n: usize,
    ) -> Result<Recommendations>
    where
        S: CountStore + ?Sized,
    {
        if top_n == 0 {
            return Ok(Recommendations::default());
        }

        let mut per_seed = Vec::with_capacity(seed.len());
        for song in seed {
            let neighbors = store.top_neighbors(song, self.k_per_seed).await?;
            if neighbors.is_empty() {
                debug!("Seed song '{}' has no co-occurring songs", song);
            }
            per_seed.push(normalize(&neighbors).into_iter().collect::<ScoreMap>());
        }

        let scores = combine(per_seed);
        if scores.is_empty() {
            warn!(
                seeds = seed.len(),
                "{}",
                Notice::NoSeedNeighbors
            );
            return Ok(Recommendations {
                items: Vec::new(),
                notice: Some(Notice::NoSeedNeighbors),
            });
        }

        let items = rank(&scores, seed, top_n);
        let notice = if items.is_empty() {
            warn!(candidates = scores.len(), "{}", Notice::AllCandidatesSeeded);
            Some(Notice::AllCandidatesSeeded)
        } else {
            None
        };

        debug!(
            seeds = seed.len(),
            candidates = scores.len(),
            returned = items.len(),
            "Recommendation complete"
        );
        Ok(Recommendations { items, notice })
    }
}

/// Sort by score descending (ties by song ascending) and take `top_n` non-seed songs
///
/// Skipped seed songs do not count toward `top_n`; the walk continues until
/// the quota is met or the candidates run out.
pub fn rank(scores: &ScoreMap, seed: &Playlist, top_n: usize) -> Vec<Recommendation> {
    let mut ranked: Vec<(&Song, f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let seed_songs: HashSet<&Song> = seed.iter().collect();
    let mut items = Vec::with_capacity(top_n.min(ranked.len()));
    for (song, score) in ranked {
        if items.len() == top_n {
            break;
        }
        if seed_songs.contains(song) {
            continue;
        }
        items.push(Recommendation {
            song: song.clone(),
            score,
        });
    }
    items
}

/// Raw top-K neighbors of a single song, for inspection
pub async fn top_co_occurrences<S>(store: &S, song: &Song, k: usize) -> Result<NeighborList<u64>>
where
    S: CountStore + ?Sized,
{
    let neighbors = store.top_neighbors(song, k).await?;
    if neighbors.is_empty() {
        info!("No co-occurring songs found for '{}'", song);
    }
    Ok(neighbors)
}
