//! Write-queue retry and give-up policy

use pixel_client::account::AccountRecord;
use pixel_client::remote::Edit;
use pixel_client::{Brush, ClientConfig, FlushOutcome, Session, WriteQueue};
use pixel_core::board::BoardStore;
use pixel_test_helpers::prelude::*;

fn funded_account(account_id: &str, index: u32, pixels: f64) -> AccountRecord {
    AccountRecord {
        account_id: account_id.to_string(),
        account_index: index,
        ft_balance: format!("{:.0}", pixels * 1e18),
        l_balance: "0".to_string(),
        num_pixels: 0,
    }
}

async fn signed_in_session(remote: MockRemote, config: ClientConfig) -> Session<MockRemote> {
    remote.add_account(funded_account("alice.test", 7, 1000.0));
    let mut session = Session::new(remote, config);
    session.connect().await.unwrap();
    session
}

fn alice_config() -> ClientConfig {
    ClientConfig {
        account_id: Some("alice.test".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_failed_batch_retries_in_original_order() {
    suppress_logs();
    let remote = MockRemote::new();
    let mut session = signed_in_session(remote.clone(), alice_config()).await;

    let brush = |r| Brush {
        r,
        g: 0,
        b: 0,
        alpha: 1.0,
    };
    assert!(session.paint(0, 0, brush(10)).await);
    assert!(session.paint(1, 0, brush(20)).await);
    assert!(session.paint(2, 0, brush(30)).await);

    remote.fail_next_draws(1);
    assert_eq!(session.flush(true).await, FlushOutcome::Failed);
    // Requeued, not lost; overlays still show the edits.
    assert_eq!(session.pending_count(), 3);
    assert_eq!(session.board().overlay(0, 0), Some(0x0a0000));

    assert_eq!(session.flush(true).await, FlushOutcome::Sent);
    assert_eq!(session.pending_count(), 0);

    let calls = remote.draw_calls();
    assert_eq!(calls.len(), 2);
    // The retried batch carries the same edits in the same order.
    assert_eq!(calls[0], calls[1]);
    assert_eq!(
        calls[1].iter().map(|e| e.x).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[tokio::test]
async fn test_drops_everything_after_three_failures() {
    suppress_logs();
    let remote = MockRemote::new();
    let mut session = signed_in_session(remote.clone(), alice_config()).await;

    let brush = Brush {
        r: 0x42,
        g: 0x42,
        b: 0x42,
        alpha: 1.0,
    };
    assert!(session.paint(5, 5, brush).await);
    assert!(session.paint(6, 5, brush).await);

    remote.fail_next_draws(3);
    assert_eq!(session.flush(true).await, FlushOutcome::Failed);
    assert_eq!(session.flush(true).await, FlushOutcome::Failed);
    assert_eq!(session.flush(true).await, FlushOutcome::Dropped);

    // Queue and in-flight set are both gone, overlays rolled back.
    assert_eq!(session.pending_count(), 0);
    assert_eq!(session.board().overlay(5, 5), None);
    assert_eq!(session.board().overlay(6, 5), None);
    assert_eq!(session.board().effective_color(5, 5), 0);

    // The counter reset: a fresh failure starts a new retry budget.
    assert!(session.paint(7, 5, brush).await);
    remote.fail_next_draws(1);
    assert_eq!(session.flush(true).await, FlushOutcome::Failed);
    assert_eq!(session.pending_count(), 1);
}

#[tokio::test]
async fn test_full_batch_flushes_without_force() {
    suppress_logs();
    let remote = MockRemote::new();
    let config = ClientConfig {
        batch_size: 2,
        ..alice_config()
    };
    let mut session = signed_in_session(remote.clone(), config).await;

    let brush = Brush {
        r: 9,
        g: 9,
        b: 9,
        alpha: 1.0,
    };
    assert!(session.paint(0, 0, brush).await);
    // One edit is below the batch size; nothing sent yet.
    assert!(remote.draw_calls().is_empty());

    // The second edit fills the batch and paint's internal unforced
    // flush sends it immediately.
    assert!(session.paint(1, 0, brush).await);
    assert_eq!(remote.draw_calls().len(), 1);
    assert_eq!(remote.draw_calls()[0].len(), 2);
    assert_eq!(session.pending_count(), 0);
}

#[tokio::test]
async fn test_oversized_queue_drains_in_batches() {
    suppress_logs();
    let remote = MockRemote::new();
    let config = ClientConfig {
        batch_size: 4,
        ..alice_config()
    };
    let mut session = signed_in_session(remote.clone(), config).await;

    let brush = |r| Brush {
        r,
        g: 1,
        b: 1,
        alpha: 1.0,
    };
    // 6 distinct edits across one paint burst; the 4th triggers an
    // automatic full-batch send, leaving 2 queued.
    for x in 0..6usize {
        assert!(session.paint(x, 3, brush(x as u8 + 1)).await);
    }
    assert_eq!(remote.draw_calls().len(), 1);
    assert_eq!(remote.draw_calls()[0].len(), 4);
    assert_eq!(session.pending_count(), 2);

    assert_eq!(session.flush(true).await, FlushOutcome::Sent);
    assert_eq!(remote.draw_calls().len(), 2);
    assert_eq!(remote.draw_calls()[1].len(), 2);
    assert_eq!(session.pending_count(), 0);
}

#[tokio::test]
async fn test_single_batch_in_flight() {
    suppress_logs();
    let remote = MockRemote::new();
    let mut board = BoardStore::new();
    let mut queue = WriteQueue::new(10, 3);

    for x in 0..3u32 {
        assert!(queue.submit(
            &mut board,
            Edit {
                x,
                y: 0,
                color: 0x111111 + x,
            }
        ));
    }

    // First flush sends; the batch stays in flight until reconciled.
    assert_eq!(
        queue.flush(&remote, &mut board, true).await,
        FlushOutcome::Sent
    );
    assert_eq!(queue.in_flight_len(), 3);

    // A flush while a batch is outstanding is a strict no-op.
    assert!(queue.submit(
        &mut board,
        Edit {
            x: 9,
            y: 0,
            color: 0x222222,
        }
    ));
    assert_eq!(
        queue.flush(&remote, &mut board, true).await,
        FlushOutcome::InFlight
    );
    assert_eq!(queue.queue_len(), 1);
    assert_eq!(queue.in_flight_len(), 3);
    assert_eq!(remote.draw_calls().len(), 1);

    queue.reconcile(&mut board);
    assert_eq!(queue.in_flight_len(), 0);
    assert_eq!(
        queue.flush(&remote, &mut board, true).await,
        FlushOutcome::Sent
    );
    assert_eq!(remote.draw_calls().len(), 2);
}

#[tokio::test]
async fn test_flush_on_empty_queue_is_noop() {
    suppress_logs();
    let remote = MockRemote::new();
    let mut board = BoardStore::new();
    let mut queue = WriteQueue::new(10, 3);

    assert_eq!(
        queue.flush(&remote, &mut board, true).await,
        FlushOutcome::NotReady
    );
    assert!(remote.draw_calls().is_empty());
}
