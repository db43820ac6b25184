//! Single-actor board session
//!
//! Owns the board store, write queue, sync engine and every timer.
//! All state mutation happens on one task; the only suspension points
//! are the remote calls, so no other task ever observes a half-applied
//! row update or a half-drained queue. Timers are rearmed explicitly;
//! an equivalent timer is never armed while one is still pending.

use crate::account::{AccountStats, AppConfig};
use crate::config::ClientConfig;
use crate::engine::SyncEngine;
use crate::queue::{FlushOutcome, WriteQueue};
use crate::remote::{Edit, RemoteBoard};
use crate::roster::OwnerRoster;
use pixel_common::{Result, BOARD_HEIGHT, BOARD_WIDTH};
use pixel_core::board::BoardStore;
use pixel_core::color::{composite, image_pixel_color};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// A brush stroke: RGB plus translucency
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// In `[0, 1]`; 1.0 paints opaque
    pub alpha: f64,
}

/// A small RGBA image to stamp onto the board, centered on a cell
///
/// Pixels use the canvas byte layout (alpha in the top byte); a raw
/// value of 0 means "skip this pixel" rather than transparent black.
#[derive(Debug, Clone)]
pub struct ImageStamp {
    pub width: usize,
    pub height: usize,
    /// Row-major; must hold exactly `width * height` entries
    pub pixels: Vec<u32>,
}

impl ImageStamp {
    /// Pixels that will actually be drawn
    pub fn opaque_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }

    fn dimensions_valid(&self) -> bool {
        self.pixels.len() == self.width * self.height
    }
}

/// Commands accepted by [`Session::run`]
#[derive(Debug)]
pub enum Command {
    Paint { x: usize, y: usize, brush: Brush },
    Stamp { x: usize, y: usize, stamp: ImageStamp },
    SetVisible(bool),
    Shutdown,
}

/// One client session against a remote board
pub struct Session<R: RemoteBoard> {
    remote: R,
    config: ClientConfig,
    app_config: Option<AppConfig>,
    board: BoardStore,
    queue: WriteQueue,
    engine: SyncEngine,
    roster: OwnerRoster,
    account: Option<AccountStats>,
    /// Polling stops once this passes; any edit pushes it forward
    deadline: Instant,
    visible: bool,
}

impl<R: RemoteBoard> Session<R> {
    pub fn new(remote: R, config: ClientConfig) -> Self {
        let deadline = Instant::now() + config.max_session;
        Self {
            queue: WriteQueue::new(config.batch_size, config.max_submit_failures),
            engine: SyncEngine::new(config.lines_per_fetch),
            remote,
            config,
            app_config: None,
            board: BoardStore::new(),
            roster: OwnerRoster::new(),
            account: None,
            deadline,
            visible: true,
        }
    }

    /// Fetch contract config and initial state
    ///
    /// Loads account stats when signed in and runs a first forced
    /// sync pass so the board is populated before the poll loop
    /// takes over.
    pub async fn connect(&mut self) -> Result<()> {
        let remote_config = self.remote.get_config().await?;
        let app_config = AppConfig::resolve(remote_config)?;
        tracing::info!(app = %app_config.app_account_id, "connected to board contract");
        self.app_config = Some(app_config);

        if self.signed_in() {
            self.refresh_account().await;
        }
        self.poll(true).await;
        Ok(())
    }

    pub fn signed_in(&self) -> bool {
        self.config.account_id.is_some()
    }

    pub fn board(&self) -> &BoardStore {
        &self.board
    }

    pub fn account(&self) -> Option<&AccountStats> {
        self.account.as_ref()
    }

    pub fn app_config(&self) -> Option<&AppConfig> {
        self.app_config.as_ref()
    }

    pub fn roster(&self) -> &OwnerRoster {
        &self.roster
    }

    /// Queued plus in-flight edits
    pub fn pending_count(&self) -> usize {
        self.queue.pending_count()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Stored color of a loaded cell (the eyedropper)
    pub fn pick_color(&self, x: usize, y: usize) -> Option<u32> {
        if x < BOARD_WIDTH && y < BOARD_HEIGHT && self.board.row_loaded(y) {
            Some(self.board.read_cell(x, y).color)
        } else {
            None
        }
    }

    fn can_afford(&self, pixels: usize) -> bool {
        match &self.account {
            Some(account) => {
                account.ft_balance - self.queue.pending_count() as f64 >= pixels as f64
            }
            None => false,
        }
    }

    fn touch_deadline(&mut self) {
        self.deadline = Instant::now() + self.config.max_session;
    }

    /// Paint one cell with the brush, composited over the stored color
    ///
    /// Silent no-op unless signed in, the row is loaded and the
    /// balance covers one more pixel. Returns whether an edit was
    /// queued; a redundant edit (effective color already matches)
    /// queues nothing.
    pub async fn paint(&mut self, x: usize, y: usize, brush: Brush) -> bool {
        if !self.signed_in() {
            tracing::debug!("paint ignored: not signed in");
            return false;
        }
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT || !self.board.row_loaded(y) {
            return false;
        }
        if !self.can_afford(1) {
            tracing::debug!("paint ignored: insufficient balance");
            return false;
        }

        // The retried edit keeps this resolved color even if the
        // background changes before the retry lands.
        let background = self.board.read_cell(x, y).color;
        let color = composite(brush.r, brush.g, brush.b, brush.alpha, background);

        let accepted = self.queue.submit(
            &mut self.board,
            Edit {
                x: x as u32,
                y: y as u32,
                color,
            },
        );
        if accepted {
            self.touch_deadline();
            self.flush(false).await;
        }
        accepted
    }

    /// Stamp an image centered on a cell; returns how many edits queued
    ///
    /// Each covered cell composites the image pixel against its own
    /// stored background; cells whose result equals the background are
    /// skipped, as are raw-zero image pixels and off-board positions.
    /// A stamp whose pixel buffer does not match its declared
    /// dimensions is rejected outright.
    pub async fn stamp(&mut self, stamp: &ImageStamp, x: usize, y: usize) -> usize {
        if !stamp.dimensions_valid() {
            tracing::warn!(
                width = stamp.width,
                height = stamp.height,
                pixels = stamp.pixels.len(),
                "stamp rejected: pixel buffer does not match dimensions"
            );
            return 0;
        }
        if !self.signed_in() || y >= BOARD_HEIGHT || !self.board.row_loaded(y) {
            return 0;
        }
        if !self.can_afford(stamp.opaque_pixels()) {
            tracing::debug!("stamp ignored: insufficient balance");
            return 0;
        }

        let x0 = x as isize - (stamp.width / 2) as isize;
        let y0 = y as isize - (stamp.height / 2) as isize;

        let mut queued = 0;
        for i in 0..stamp.height {
            for j in 0..stamp.width {
                let rgba = stamp.pixels[i * stamp.width + j];
                if rgba == 0 {
                    continue;
                }
                let (bx, by) = (x0 + j as isize, y0 + i as isize);
                if bx < 0 || bx >= BOARD_WIDTH as isize || by < 0 || by >= BOARD_HEIGHT as isize {
                    continue;
                }
                let (bx, by) = (bx as usize, by as usize);

                let background = self.board.read_cell(bx, by).color;
                let color = image_pixel_color(rgba, background);
                if color == background {
                    continue;
                }
                if self.queue.submit(
                    &mut self.board,
                    Edit {
                        x: bx as u32,
                        y: by as u32,
                        color,
                    },
                ) {
                    queued += 1;
                }
            }
        }

        if queued > 0 {
            self.touch_deadline();
            self.flush(false).await;
        }
        queued
    }

    /// Run one board poll
    ///
    /// Skips the network work (but not the caller's rescheduling)
    /// when the view is hidden and the poll was not forced. Fetch
    /// failures are logged; the next poll is the retry.
    pub async fn poll(&mut self, forced: bool) {
        if !forced && !self.visible {
            tracing::debug!("poll skipped: view hidden");
            return;
        }
        match self.engine.sync_pass(&self.remote, &mut self.board).await {
            Ok(report) => {
                self.roster.refresh(&self.remote, &report.standings).await;
            }
            Err(err) => {
                tracing::warn!("board refresh failed, retrying next poll: {err}");
            }
        }
    }

    /// Drive the write queue
    ///
    /// After any completed attempt (success, retry or drop) the board
    /// and account stats are force-refreshed (errors there are
    /// ignored, the poll loop catches up) and the in-flight batch is
    /// reconciled against the refreshed overlay.
    pub async fn flush(&mut self, force: bool) -> FlushOutcome {
        let outcome = self
            .queue
            .flush(&self.remote, &mut self.board, force)
            .await;

        match outcome {
            FlushOutcome::Sent | FlushOutcome::Failed | FlushOutcome::Dropped => {
                self.poll(true).await;
                self.refresh_account().await;
                self.queue.reconcile(&mut self.board);
            }
            FlushOutcome::InFlight | FlushOutcome::NotReady => {}
        }
        outcome
    }

    async fn refresh_account(&mut self) {
        let Some(account_id) = self.config.account_id.clone() else {
            return;
        };
        match self.remote.get_account(&account_id).await {
            Ok(record) => {
                self.account = Some(AccountStats::from_record(record, &account_id));
            }
            Err(err) => {
                tracing::warn!("account refresh failed: {err}");
            }
        }
    }

    /// Event loop: commands, poll timer, flush debounce
    ///
    /// The poll timer stops rearming once the session deadline (last
    /// edit + `max_session`) passes; the next edit restarts it. The
    /// flush timer is armed only while edits are queued and always
    /// flushes with `force`. Exits on `Shutdown` or when the command
    /// channel closes; an in-flight submit is never cancelled.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        let mut next_poll = Instant::now() + self.config.poll_interval;
        let mut poll_armed = true;
        let mut next_flush = Instant::now();
        let mut flush_armed = false;

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let mut edited = false;
                    match command {
                        Some(Command::Paint { x, y, brush }) => {
                            edited = self.paint(x, y, brush).await;
                        }
                        Some(Command::Stamp { x, y, stamp }) => {
                            edited = self.stamp(&stamp, x, y).await > 0;
                        }
                        Some(Command::SetVisible(visible)) => {
                            self.visible = visible;
                        }
                        Some(Command::Shutdown) | None => {
                            tracing::info!("session shutting down");
                            break;
                        }
                    }
                    if edited {
                        if !poll_armed {
                            poll_armed = true;
                            next_poll = Instant::now() + self.config.poll_interval;
                        }
                        if self.queue.queue_len() > 0 {
                            // Restarted on every edit, per debounce semantics.
                            flush_armed = true;
                            next_flush = Instant::now() + self.config.flush_debounce;
                        }
                    }
                }
                _ = sleep_until(next_poll), if poll_armed => {
                    self.poll(false).await;
                    if Instant::now() < self.deadline {
                        next_poll = Instant::now() + self.config.poll_interval;
                    } else {
                        tracing::info!("session deadline reached; polling paused");
                        poll_armed = false;
                    }
                }
                _ = sleep_until(next_flush), if flush_armed => {
                    flush_armed = false;
                    self.flush(true).await;
                    if self.queue.queue_len() > 0 {
                        flush_armed = true;
                        next_flush = Instant::now() + self.config.flush_debounce;
                    }
                }
            }
        }
    }
}
