//! Song identity and playlist types
//!
//! A song is identified by the exact `(artist_name, track_name)` pair found in
//! the corpus. No case folding or whitespace trimming is applied anywhere, so
//! `("Queen", "Bohemian Rhapsody")` and `("queen", "Bohemian Rhapsody")` are
//! different songs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used by the human-readable `Artist - Track` rendering
pub const DISPLAY_SEPARATOR: &str = " - ";

/// Song identity
///
/// Field order matters: the derived `Ord` compares artist first, then track,
/// and is the tie-break order for every ranked output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Song {
    pub artist_name: String,
    pub track_name: String,
}

impl Song {
    pub fn new(artist_name: impl Into<String>, track_name: impl Into<String>) -> Self {
        Self {
            artist_name: artist_name.into(),
            track_name: track_name.into(),
        }
    }

    /// Parse the `Artist - Track` form, splitting at the first separator
    ///
    /// Returns `None` when no separator is present.
    pub fn parse_display(s: &str) -> Option<Self> {
        s.split_once(DISPLAY_SEPARATOR)
            .map(|(artist, track)| Self::new(artist, track))
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.artist_name, DISPLAY_SEPARATOR, self.track_name)
    }
}

/// Ordered sequence of songs; duplicates are kept as-is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub tracks: Vec<Song>,
}

impl Playlist {
    pub fn new(tracks: Vec<Song>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains(&self, song: &Song) -> bool {
        self.tracks.contains(song)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Song> {
        self.tracks.iter()
    }
}

impl FromIterator<Song> for Playlist {
    fn from_iter<I: IntoIterator<Item = Song>>(iter: I) -> Self {
        Self {
            tracks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Playlist {
    type Item = &'a Song;
    type IntoIter = std::slice::Iter<'a, Song>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracks.iter()
    }
}
