//! # Pixelboard client core
//!
//! Client-side machinery for a shared pixel board whose authoritative
//! state lives on a slow, rate-limited remote ledger.
//!
//! ## Architecture
//!
//! - **Remote seam**: the [`RemoteBoard`] trait mirrors the ledger's
//!   view/change surface; transport is the caller's concern
//! - **Read side**: [`SyncEngine`] polls per-row versions and fetches
//!   only changed rows, in bounded parallel groups
//! - **Write side**: [`WriteQueue`] batches edits with a single
//!   in-flight batch, bounded retry and give-up rollback
//! - **Actor**: [`Session`] owns all state and timers on one task
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pixel_client::{ClientConfig, Session};
//! use pixel_test_helpers::MockRemote;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig {
//!         account_id: Some("alice.test".to_string()),
//!         ..Default::default()
//!     };
//!
//!     let mut session = Session::new(MockRemote::new(), config);
//!     session.connect().await?;
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(64);
//!     tokio::spawn(session.run(rx));
//!     drop(tx);
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod config;
pub mod engine;
pub mod queue;
pub mod remote;
pub mod roster;
pub mod session;

pub use account::{AccountRecord, AccountStats, AppConfig, RemoteConfig, PIXEL_COST};
pub use config::ClientConfig;
pub use engine::{SyncEngine, SyncReport};
pub use queue::{FlushOutcome, WriteQueue};
pub use remote::{Edit, RemoteBoard};
pub use roster::OwnerRoster;
pub use session::{Brush, Command, ImageStamp, Session};

/// Common result type for client operations
pub use pixel_common::{BoardError, Result};
