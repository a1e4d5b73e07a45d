//! Summation of per-seed weight distributions

use crate::store::Neighbor;
use cotrack_common::Song;
use std::collections::HashMap;

/// Aggregate score per candidate song
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMap(HashMap<Song, f64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to the score of `song`, starting from 0
    pub fn add(&mut self, song: Song, weight: f64) {
        *self.0.entry(song).or_insert(0.0) += weight;
    }

    pub fn get(&self, song: &Song) -> Option<f64> {
        self.0.get(song).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Song, f64)> {
        self.0.iter().map(|(song, score)| (song, *score))
    }
}

impl FromIterator<Neighbor<f64>> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = Neighbor<f64>>>(iter: I) -> Self {
        let mut map = ScoreMap::new();
        for neighbor in iter {
            map.add(neighbor.song, neighbor.weight);
        }
        map
    }
}

impl FromIterator<(Song, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (Song, f64)>>(iter: I) -> Self {
        let mut map = ScoreMap::new();
        for (song, weight) in iter {
            map.add(song, weight);
        }
        map
    }
}

/// Element-wise sum of sparse score maps
///
/// A song missing from one input simply contributes nothing from it.
pub fn combine<I>(maps: I) -> ScoreMap
where
    I: IntoIterator<Item = ScoreMap>,
{
    let mut combined = ScoreMap::new();
    for map in maps {
        for (song, weight) in map.0 {
            combined.add(song, weight);
        }
    }
    combined
}
