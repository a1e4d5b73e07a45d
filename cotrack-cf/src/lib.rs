//! cotrack-cf library - playlist co-occurrence recommender
//!
//! Pipeline: corpus slices are read into playlists ([`corpus`]), their song
//! pairs are counted into a [`store::CountStore`] ([`accumulator`],
//! [`ingest`]), and a seed playlist is turned into ranked suggestions by
//! normalizing each seed's top neighbors ([`normalizer`]), summing them
//! ([`combiner`]) and ranking with seed exclusion ([`recommender`]).

pub mod accumulator;
pub mod combiner;
pub mod corpus;
pub mod ingest;
pub mod normalizer;
pub mod recommender;
pub mod store;

pub use accumulator::{AccumulationStats, Accumulator};
pub use combiner::{combine, ScoreMap};
pub use normalizer::normalize;
pub use recommender::{Notice, Recommendation, Recommendations, Recommender};
pub use store::{CountStore, InMemoryCountStore, Neighbor, NeighborList, SqliteCountStore};
