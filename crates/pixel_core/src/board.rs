//! Local board store
//!
//! Holds the last-known confirmed grid (one version and one decoded
//! row per grid row) plus the pending overlay: the optimistic colors
//! of locally queued or in-flight edits. A row's cells are only ever
//! replaced together with its version.

use crate::codec::Cell;
use pixel_common::{BOARD_HEIGHT, BOARD_WIDTH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One leaderboard entry: an owner and how many cells it holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerStanding {
    pub owner_index: u32,
    pub num_pixels: u32,
}

/// Last-known confirmed grid plus the pending overlay
pub struct BoardStore {
    /// Decoded rows; `None` until first fetched
    rows: Vec<Option<Vec<Cell>>>,

    /// Remote-assigned row versions; `None` until first fetched
    versions: Vec<Option<u64>>,

    /// Optimistic colors for queued/in-flight edits
    overlay: Vec<Vec<Option<u32>>>,
}

impl BoardStore {
    pub fn new() -> Self {
        Self {
            rows: vec![None; BOARD_HEIGHT],
            versions: vec![None; BOARD_HEIGHT],
            overlay: vec![vec![None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Replace a row wholesale together with its new version
    ///
    /// Overlay entries in the row whose queued color now matches the
    /// stored color are cleared: the edit has round-tripped.
    pub fn apply_row_update(&mut self, y: usize, version: u64, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), BOARD_WIDTH);
        for (x, cell) in cells.iter().enumerate() {
            if self.overlay[y][x] == Some(cell.color) {
                self.overlay[y][x] = None;
            }
        }
        self.rows[y] = Some(cells);
        self.versions[y] = Some(version);
    }

    /// Whether the row has ever been fetched
    pub fn row_loaded(&self, y: usize) -> bool {
        self.rows[y].is_some()
    }

    /// Confirmed cell state; the zero cell for never-fetched rows
    ///
    /// Callers that care about staleness should check `row_loaded`
    /// first; the default is indistinguishable from an unowned black
    /// cell.
    pub fn read_cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y]
            .as_ref()
            .map(|row| row[x])
            .unwrap_or_default()
    }

    /// Last fetched version of a row, if any
    pub fn version(&self, y: usize) -> Option<u64> {
        self.versions[y]
    }

    pub fn overlay(&self, x: usize, y: usize) -> Option<u32> {
        self.overlay[y][x]
    }

    pub fn set_overlay(&mut self, x: usize, y: usize, color: u32) {
        self.overlay[y][x] = Some(color);
    }

    pub fn clear_overlay(&mut self, x: usize, y: usize) {
        self.overlay[y][x] = None;
    }

    /// The color to render and dedup against: overlay if present,
    /// confirmed cell color otherwise
    pub fn effective_color(&self, x: usize, y: usize) -> u32 {
        self.overlay[y][x].unwrap_or_else(|| self.read_cell(x, y).color)
    }

    /// Per-owner cell counts over fetched rows, excluding owner 0,
    /// sorted by count descending with ties broken by ascending owner
    /// index
    pub fn owner_standings(&self) -> Vec<OwnerStanding> {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for row in self.rows.iter().flatten() {
            for cell in row {
                if cell.owner_index != 0 {
                    *counts.entry(cell.owner_index).or_insert(0) += 1;
                }
            }
        }

        let mut standings: Vec<OwnerStanding> = counts
            .into_iter()
            .map(|(owner_index, num_pixels)| OwnerStanding {
                owner_index,
                num_pixels,
            })
            .collect();
        standings.sort_by_key(|s| (std::cmp::Reverse(s.num_pixels), s.owner_index));
        standings
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}
