//! Write-side batching queue
//!
//! Buffers user edits FIFO, deduplicates against the overlay-aware
//! effective color, and flushes bounded-size batches with at most one
//! batch in flight. A failed batch is requeued at the front in its
//! original order; after too many consecutive failures the whole
//! queue is dropped so the user can start over.

use crate::remote::{Edit, RemoteBoard};
use pixel_core::board::BoardStore;
use std::collections::VecDeque;

/// Result of one flush attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// A batch is already outstanding; nothing was done
    InFlight,
    /// Queue empty, or under one batch and not forced
    NotReady,
    /// Batch accepted by the ledger; awaiting reconcile
    Sent,
    /// Batch rejected and requeued for retry
    Failed,
    /// Retry budget exhausted; batch and queue discarded
    Dropped,
}

/// Buffers and batches outgoing pixel edits
pub struct WriteQueue {
    queue: VecDeque<Edit>,
    in_flight: Vec<Edit>,
    consecutive_failures: u32,
    batch_size: usize,
    max_failures: u32,
}

impl WriteQueue {
    pub fn new(batch_size: usize, max_failures: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            in_flight: Vec::new(),
            consecutive_failures: 0,
            batch_size,
            max_failures,
        }
    }

    /// Enqueue an edit and mark its overlay
    ///
    /// Returns false without queuing when the cell's effective color
    /// (overlay-aware) already equals the edit's color, so resending
    /// an unconfirmed edit never duplicates it.
    pub fn submit(&mut self, board: &mut BoardStore, edit: Edit) -> bool {
        let (x, y) = (edit.x as usize, edit.y as usize);
        if board.effective_color(x, y) == edit.color {
            return false;
        }
        board.set_overlay(x, y, edit.color);
        self.queue.push_back(edit);
        true
    }

    /// Edits not yet confirmed: queued plus in flight
    pub fn pending_count(&self) -> usize {
        self.queue.len() + self.in_flight.len()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Submit the next batch if one is due
    ///
    /// No-op while a batch is outstanding. Without `force`, only a
    /// full batch is sent; the debounce timer passes `force = true`
    /// to flush stragglers. On success the batch stays in the
    /// in-flight slot until [`reconcile`](Self::reconcile) runs after
    /// the follow-up board refresh.
    pub async fn flush<R: RemoteBoard>(
        &mut self,
        remote: &R,
        board: &mut BoardStore,
        force: bool,
    ) -> FlushOutcome {
        if !self.in_flight.is_empty() {
            return FlushOutcome::InFlight;
        }
        if self.queue.is_empty() || (!force && self.queue.len() < self.batch_size) {
            return FlushOutcome::NotReady;
        }

        let take = self.batch_size.min(self.queue.len());
        self.in_flight = self.queue.drain(..take).collect();

        let result = remote.draw(&self.in_flight).await;
        match result {
            Ok(()) => {
                self.consecutive_failures = 0;
                tracing::debug!(pixels = self.in_flight.len(), "draw batch accepted");
                FlushOutcome::Sent
            }
            Err(err) => {
                self.consecutive_failures += 1;
                tracing::warn!(
                    pixels = self.in_flight.len(),
                    failures = self.consecutive_failures,
                    "draw batch failed: {err}"
                );
                if self.consecutive_failures < self.max_failures {
                    // Requeue at the front, preserving the original order.
                    for edit in self.in_flight.drain(..).rev() {
                        self.queue.push_front(edit);
                    }
                    FlushOutcome::Failed
                } else {
                    tracing::warn!(
                        dropped = self.in_flight.len() + self.queue.len(),
                        "retry budget exhausted; dropping all queued edits"
                    );
                    for edit in self.in_flight.drain(..).chain(self.queue.drain(..)) {
                        let (x, y) = (edit.x as usize, edit.y as usize);
                        if board.overlay(x, y) == Some(edit.color) {
                            board.clear_overlay(x, y);
                        }
                    }
                    self.consecutive_failures = 0;
                    FlushOutcome::Dropped
                }
            }
        }
    }

    /// Release the in-flight batch after a post-send board refresh
    ///
    /// Each overlay entry is cleared only if it still carries the
    /// submitted color; a newer edit to the same cell made while the
    /// batch was in flight keeps its overlay.
    pub fn reconcile(&mut self, board: &mut BoardStore) {
        for edit in self.in_flight.drain(..) {
            let (x, y) = (edit.x as usize, edit.y as usize);
            if board.overlay(x, y) == Some(edit.color) {
                board.clear_overlay(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_sets_overlay_and_queues() {
        let mut board = BoardStore::new();
        let mut queue = WriteQueue::new(100, 3);

        let edit = Edit {
            x: 3,
            y: 4,
            color: 0x112233,
        };
        assert!(queue.submit(&mut board, edit));
        assert_eq!(queue.queue_len(), 1);
        assert_eq!(board.overlay(3, 4), Some(0x112233));
        assert_eq!(board.effective_color(3, 4), 0x112233);
    }

    #[test]
    fn test_submit_is_idempotent_while_pending() {
        let mut board = BoardStore::new();
        let mut queue = WriteQueue::new(100, 3);

        let edit = Edit {
            x: 1,
            y: 1,
            color: 0xff0000,
        };
        assert!(queue.submit(&mut board, edit));
        assert!(!queue.submit(&mut board, edit));
        assert_eq!(queue.queue_len(), 1);
    }

    #[test]
    fn test_submit_allows_newer_color_on_same_cell() {
        let mut board = BoardStore::new();
        let mut queue = WriteQueue::new(100, 3);

        assert!(queue.submit(
            &mut board,
            Edit {
                x: 1,
                y: 1,
                color: 0xff0000
            }
        ));
        assert!(queue.submit(
            &mut board,
            Edit {
                x: 1,
                y: 1,
                color: 0x00ff00
            }
        ));
        assert_eq!(queue.queue_len(), 2);
        assert_eq!(board.overlay(1, 1), Some(0x00ff00));
    }

    #[test]
    fn test_reconcile_keeps_newer_overlay() {
        let mut board = BoardStore::new();
        let mut queue = WriteQueue::new(100, 3);

        queue.in_flight = vec![Edit {
            x: 2,
            y: 2,
            color: 0x111111,
        }];
        // A newer edit overwrote the overlay while the batch flew.
        board.set_overlay(2, 2, 0x222222);

        queue.reconcile(&mut board);
        assert_eq!(queue.in_flight_len(), 0);
        assert_eq!(board.overlay(2, 2), Some(0x222222));
    }

    #[test]
    fn test_reconcile_clears_matching_overlay() {
        let mut board = BoardStore::new();
        let mut queue = WriteQueue::new(100, 3);

        board.set_overlay(5, 6, 0xabcdef);
        queue.in_flight = vec![Edit {
            x: 5,
            y: 6,
            color: 0xabcdef,
        }];

        queue.reconcile(&mut board);
        assert_eq!(board.overlay(5, 6), None);
    }
}
