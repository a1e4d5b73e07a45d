//! Local normalization of a neighbor list
//!
//! Weights are divided by the sum of the counts in the same (already
//! truncated) top-K list, not by corpus-wide totals, so each seed song
//! contributes a distribution that sums to 1.

use crate::store::{Neighbor, NeighborList};

/// Turn raw counts into weights that sum to 1
///
/// An empty list (or one whose counts sum to 0) yields an empty list instead
/// of NaN weights.
pub fn normalize(neighbors: &[Neighbor<u64>]) -> NeighborList<f64> {
    let total: u64 = neighbors.iter().map(|n| n.weight).sum();
    if total == 0 {
        return Vec::new();
    }

    let total = total as f64;
    neighbors
        .iter()
        .map(|n| Neighbor::new(n.song.clone(), n.weight as f64 / total))
        .collect()
}
