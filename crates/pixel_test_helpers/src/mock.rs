//! In-memory mock ledger
//!
//! Implements [`RemoteBoard`] over a real in-memory grid with per-row
//! versions, so sync and queue behavior can be exercised end to end.
//! Failures are scripted: the next N calls of a method can be made to
//! fail, after which the mock recovers. Every call is recorded for
//! assertions.

use crate::encode::encode_line;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use pixel_client::account::{AccountRecord, RemoteConfig};
use pixel_client::remote::{Edit, RemoteBoard};
use pixel_common::{BoardError, Result, BOARD_HEIGHT, BOARD_WIDTH};
use pixel_core::codec::Cell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

struct MockState {
    rows: Vec<Vec<Cell>>,
    versions: Vec<u64>,
    corrupt_rows: HashSet<usize>,
    accounts: HashMap<u32, AccountRecord>,
    drawer_index: u32,
    fail_draws: u32,
    fail_version_fetches: u32,
    fail_line_fetches: u32,
    draw_calls: Vec<Vec<Edit>>,
    line_fetches: Vec<Vec<usize>>,
    version_fetches: usize,
    account_fetches: Vec<u32>,
}

/// Scriptable in-memory remote board
///
/// Clones share state, so a test can keep a handle after moving the
/// mock into a `Session`.
#[derive(Clone)]
pub struct MockRemote {
    state: Arc<Mutex<MockState>>,
}

impl MockRemote {
    /// Empty board, all versions 0, draws recorded as owner index 1
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                rows: vec![vec![Cell::default(); BOARD_WIDTH]; BOARD_HEIGHT],
                versions: vec![0; BOARD_HEIGHT],
                corrupt_rows: HashSet::new(),
                accounts: HashMap::new(),
                drawer_index: 1,
                fail_draws: 0,
                fail_version_fetches: 0,
                fail_line_fetches: 0,
                draw_calls: Vec::new(),
                line_fetches: Vec::new(),
                version_fetches: 0,
                account_fetches: Vec::new(),
            })),
        }
    }

    /// Paint a cell server-side and bump its row version
    pub fn paint(&self, x: usize, y: usize, color: u32, owner_index: u32) {
        let mut state = self.state.lock().unwrap();
        state.rows[y][x] = Cell { color, owner_index };
        state.versions[y] += 1;
    }

    /// Bump a row version without changing any cell
    pub fn bump_version(&self, y: usize) {
        self.state.lock().unwrap().versions[y] += 1;
    }

    /// Serve a malformed (wrong-length) blob for this row
    pub fn corrupt_row(&self, y: usize) {
        self.state.lock().unwrap().corrupt_rows.insert(y);
    }

    /// Stop serving the malformed blob for this row
    pub fn repair_row(&self, y: usize) {
        self.state.lock().unwrap().corrupt_rows.remove(&y);
    }

    /// Owner index recorded for subsequent draws
    pub fn set_drawer_index(&self, owner_index: u32) {
        self.state.lock().unwrap().drawer_index = owner_index;
    }

    pub fn add_account(&self, record: AccountRecord) {
        let mut state = self.state.lock().unwrap();
        state.accounts.insert(record.account_index, record);
    }

    /// Make the next `n` draw calls fail with `SubmitFailed`
    pub fn fail_next_draws(&self, n: u32) {
        self.state.lock().unwrap().fail_draws = n;
    }

    /// Make the next `n` version fetches fail with `FetchFailed`
    pub fn fail_next_version_fetches(&self, n: u32) {
        self.state.lock().unwrap().fail_version_fetches = n;
    }

    /// Make the next `n` line fetches fail with `FetchFailed`
    pub fn fail_next_line_fetches(&self, n: u32) {
        self.state.lock().unwrap().fail_line_fetches = n;
    }

    pub fn draw_calls(&self) -> Vec<Vec<Edit>> {
        self.state.lock().unwrap().draw_calls.clone()
    }

    pub fn line_fetches(&self) -> Vec<Vec<usize>> {
        self.state.lock().unwrap().line_fetches.clone()
    }

    pub fn version_fetches(&self) -> usize {
        self.state.lock().unwrap().version_fetches
    }

    /// Owner indices requested via `get_account_by_index`, in order
    pub fn account_fetches(&self) -> Vec<u32> {
        self.state.lock().unwrap().account_fetches.clone()
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.state.lock().unwrap().rows[y][x]
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteBoard for MockRemote {
    async fn get_line_versions(&self) -> Result<Vec<u64>> {
        let mut state = self.state.lock().unwrap();
        state.version_fetches += 1;
        if state.fail_version_fetches > 0 {
            state.fail_version_fetches -= 1;
            return Err(BoardError::FetchFailed("scripted version failure".into()));
        }
        Ok(state.versions.clone())
    }

    async fn get_lines(&self, rows: &[usize]) -> Result<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        state.line_fetches.push(rows.to_vec());
        if state.fail_line_fetches > 0 {
            state.fail_line_fetches -= 1;
            return Err(BoardError::FetchFailed("scripted line failure".into()));
        }
        Ok(rows
            .iter()
            .map(|&y| {
                if state.corrupt_rows.contains(&y) {
                    BASE64.encode([0u8; 7])
                } else {
                    encode_line(&state.rows[y])
                }
            })
            .collect())
    }

    async fn draw(&self, pixels: &[Edit]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_draws > 0 {
            state.fail_draws -= 1;
            state.draw_calls.push(pixels.to_vec());
            return Err(BoardError::SubmitFailed("scripted draw failure".into()));
        }
        state.draw_calls.push(pixels.to_vec());

        let drawer = state.drawer_index;
        let mut touched: HashSet<usize> = HashSet::new();
        for edit in pixels {
            state.rows[edit.y as usize][edit.x as usize] = Cell {
                color: edit.color,
                owner_index: drawer,
            };
            touched.insert(edit.y as usize);
        }
        for y in touched {
            state.versions[y] += 1;
        }
        Ok(())
    }

    async fn get_account(&self, account_id: &str) -> Result<Option<AccountRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .accounts
            .values()
            .find(|record| record.account_id == account_id)
            .cloned())
    }

    async fn get_account_by_index(&self, index: u32) -> Result<Option<AccountRecord>> {
        let mut state = self.state.lock().unwrap();
        state.account_fetches.push(index);
        Ok(state.accounts.get(&index).cloned())
    }

    async fn get_config(&self) -> Result<RemoteConfig> {
        Ok(RemoteConfig {
            app_account_id: "app.mock".to_string(),
            ft_account_id: "ft.mock".to_string(),
            app_liquidity_denominator: "1000".to_string(),
            pixel_coef_denominator: "5000".to_string(),
            draw_fee_denominator: "100".to_string(),
        })
    }
}
