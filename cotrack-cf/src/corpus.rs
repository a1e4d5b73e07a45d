//! Playlist corpus slices
//!
//! A corpus folder holds JSON slice files in the Million Playlist Dataset
//! layout:
//!
//! ```json
//! {"playlists": [{"tracks": [{"artist_name": "...", "track_name": "..."}]}]}
//! ```
//!
//! Other fields are ignored. Artist and track names are taken exactly as
//! written.

use cotrack_common::config::SliceOrder;
use cotrack_common::{Error, Playlist, Result, Song};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct SliceFile {
    playlists: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct TrackRecord {
    artist_name: String,
    track_name: String,
}

#[derive(Deserialize)]
struct PlaylistRecord {
    tracks: Vec<TrackRecord>,
}

impl From<PlaylistRecord> for Playlist {
    fn from(record: PlaylistRecord) -> Self {
        record
            .tracks
            .into_iter()
            .map(|t| Song::new(t.artist_name, t.track_name))
            .collect()
    }
}

/// Slice files in `folder`, ordered and truncated to `limit`
pub fn list_slices(folder: &Path, order: SliceOrder, limit: usize) -> Result<Vec<PathBuf>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") {
            names.push(name);
        }
    }

    match order {
        SliceOrder::Lexicographic => names.sort(),
        SliceOrder::Numeric => {
            names.sort_by(|a, b| numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b)))
        }
    }

    Ok(names
        .into_iter()
        .take(limit)
        .map(|name| folder.join(name))
        .collect())
}

/// Every run of ASCII digits in `name`, parsed in order
///
/// `mpd.slice.1000-1999.json` gives `[1000, 1999]`, so slice 1000 sorts after
/// slice 999 even though it does not lexicographically.
fn numeric_key(name: &str) -> Vec<u64> {
    name.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .map(|run| run.parse::<u64>().unwrap_or(u64::MAX))
        .collect()
}

/// Parsed slice, yielding one result per playlist in file order
#[derive(Debug)]
pub struct SlicePlaylists {
    path: PathBuf,
    records: std::iter::Enumerate<std::vec::IntoIter<serde_json::Value>>,
}

impl SlicePlaylists {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for SlicePlaylists {
    type Item = Result<Playlist>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, value) = self.records.next()?;
        Some(
            serde_json::from_value::<PlaylistRecord>(value)
                .map(Playlist::from)
                .map_err(|e| Error::MalformedRecord {
                    slice: self.path.clone(),
                    playlist_index: index,
                    reason: e.to_string(),
                }),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

/// Read a slice file
///
/// Fails only if the file is unreadable or has no `playlists` array; a
/// malformed playlist surfaces as an `Err` item when iterated.
pub fn read_slice(path: &Path) -> Result<SlicePlaylists> {
    let content = std::fs::read_to_string(path)?;
    let slice: SliceFile = serde_json::from_str(&content)?;
    Ok(SlicePlaylists {
        path: path.to_path_buf(),
        records: slice.playlists.into_iter().enumerate(),
    })
}

/// Read a single playlist object (`{"tracks": [...]}`), e.g. a seed file
pub fn read_playlist(path: &Path) -> Result<Playlist> {
    let content = std::fs::read_to_string(path)?;
    let record: PlaylistRecord =
        serde_json::from_str(&content).map_err(|e| Error::MalformedRecord {
            slice: path.to_path_buf(),
            playlist_index: 0,
            reason: e.to_string(),
        })?;
    Ok(record.into())
}
