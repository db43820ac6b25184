//! Incremental board synchronization
//!
//! One pass: diff the remote per-row version vector against what the
//! board already holds, fetch only the changed rows in bounded-size
//! groups (all groups in parallel), decode and merge. Decode and
//! group-fetch failures skip the affected rows for this cycle; their
//! local versions stay stale, so the next pass requests them again.

use crate::remote::RemoteBoard;
use futures_util::future::join_all;
use pixel_common::{Result, BOARD_HEIGHT};
use pixel_core::board::{BoardStore, OwnerStanding};
use pixel_core::codec::decode_line_b64;

/// Outcome of one sync pass
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Rows fetched and merged this pass
    pub rows_updated: usize,

    /// Ownership leaderboard after the merge
    pub standings: Vec<OwnerStanding>,
}

/// Read-side sync driver
pub struct SyncEngine {
    lines_per_fetch: usize,
}

impl SyncEngine {
    pub fn new(lines_per_fetch: usize) -> Self {
        Self { lines_per_fetch }
    }

    /// Run one synchronization pass against the remote store
    ///
    /// A version-vector fetch failure aborts the pass (the caller
    /// retries by polling); row-level failures are contained here.
    pub async fn sync_pass<R: RemoteBoard>(
        &self,
        remote: &R,
        board: &mut BoardStore,
    ) -> Result<SyncReport> {
        let versions = remote.get_line_versions().await?;
        if versions.len() != BOARD_HEIGHT {
            tracing::warn!(
                got = versions.len(),
                expected = BOARD_HEIGHT,
                "version vector has unexpected length"
            );
        }

        let changed: Vec<usize> = versions
            .iter()
            .enumerate()
            .take(BOARD_HEIGHT)
            .filter(|(y, version)| board.version(*y) != Some(**version))
            .map(|(y, _)| y)
            .collect();

        let groups: Vec<&[usize]> = changed.chunks(self.lines_per_fetch).collect();
        let fetches = join_all(groups.iter().map(|group| remote.get_lines(group))).await;

        let mut rows_updated = 0;
        for (group, fetched) in groups.iter().zip(fetches) {
            let blobs = match fetched {
                Ok(blobs) => blobs,
                Err(err) => {
                    tracing::warn!(rows = ?group, "row group fetch failed: {err}");
                    continue;
                }
            };
            if blobs.len() != group.len() {
                tracing::warn!(
                    requested = group.len(),
                    received = blobs.len(),
                    "row group response length mismatch"
                );
            }
            for (&y, blob) in group.iter().zip(&blobs) {
                match decode_line_b64(blob) {
                    Ok(cells) => {
                        board.apply_row_update(y, versions[y], cells);
                        rows_updated += 1;
                    }
                    Err(err) => {
                        // Version stays stale; the next poll refetches.
                        tracing::warn!(row = y, "skipping undecodable row: {err}");
                    }
                }
            }
        }

        tracing::debug!(
            changed = changed.len(),
            merged = rows_updated,
            "sync pass complete"
        );

        Ok(SyncReport {
            rows_updated,
            standings: board.owner_standings(),
        })
    }
}
