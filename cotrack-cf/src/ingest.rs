//! Folder ingestion driver
//!
//! Runs the accumulator over the first `slice_limit` slice files of a corpus
//! folder. Counts are committed per playlist, so an interrupted run keeps
//! everything ingested before the failure; re-running over a slice window is
//! the way to resume.

use crate::accumulator::{AccumulationStats, Accumulator};
use crate::corpus::{list_slices, read_slice};
use crate::store::CountStore;
use cotrack_common::config::SliceOrder;
use cotrack_common::Result;
use serde::Serialize;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub slices: usize,
    pub stats: AccumulationStats,
}

/// Accumulate the selected slices of `folder` into `store`
pub async fn ingest_folder<S>(
    store: &S,
    folder: &Path,
    order: SliceOrder,
    slice_limit: usize,
) -> Result<IngestReport>
where
    S: CountStore + ?Sized,
{
    let slices = list_slices(folder, order, slice_limit)?;
    if slices.is_empty() {
        warn!("No slice files found in {}", folder.display());
    }

    let started = Instant::now();
    let mut report = IngestReport::default();

    for (i, path) in slices.iter().enumerate() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Processing slice {}/{}: {}", i + 1, slices.len(), name);

        let mut accumulator = Accumulator::new(store);
        accumulator.add_playlists(read_slice(path)?).await?;

        report.stats.merge(accumulator.stats());
        report.slices += 1;
    }

    info!(
        slices = report.slices,
        playlists = report.stats.playlists,
        pairs = report.stats.pairs_upserted,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Finished updating co-occurrences"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryCountStore;
    use cotrack_common::Song;

    #[tokio::test]
    async fn test_slice_limit_bounds_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"playlists": [{"tracks": [
                {"artist_name": "A", "track_name": "X"},
                {"artist_name": "B", "track_name": "Y"}
            ]}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"{"playlists": [{"tracks": [
                {"artist_name": "C", "track_name": "Z"},
                {"artist_name": "D", "track_name": "W"}
            ]}]}"#,
        )
        .unwrap();

        let store = InMemoryCountStore::new();
        let report = ingest_folder(&store, dir.path(), SliceOrder::Lexicographic, 1)
            .await
            .unwrap();

        assert_eq!(report.slices, 1);
        assert_eq!(report.stats.playlists, 1);
        assert_eq!(
            store.count(&Song::new("A", "X"), &Song::new("B", "Y")).await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.count(&Song::new("C", "Z"), &Song::new("D", "W")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_empty_folder_is_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryCountStore::new();

        let report = ingest_folder(&store, dir.path(), SliceOrder::Numeric, 5)
            .await
            .unwrap();

        assert_eq!(report, IngestReport::default());
    }
}
