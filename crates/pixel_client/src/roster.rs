//! Leaderboard account roster
//!
//! Caches account stats per owner index and refetches only owners
//! that are new or whose pixel count changed since the last pass.

use crate::account::AccountStats;
use crate::remote::RemoteBoard;
use futures_util::future::join_all;
use pixel_core::board::OwnerStanding;
use std::collections::HashMap;

/// Cached leaderboard accounts keyed by owner index
#[derive(Default)]
pub struct OwnerRoster {
    accounts: HashMap<u32, AccountStats>,
    last_counts: HashMap<u32, u32>,
    standings: Vec<OwnerStanding>,
}

impl OwnerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh cached accounts against a new standings snapshot
    ///
    /// Owners already cached with an unchanged pixel count are not
    /// refetched. Individual fetch failures are logged and leave the
    /// stale entry (if any) in place.
    pub async fn refresh<R: RemoteBoard>(&mut self, remote: &R, standings: &[OwnerStanding]) {
        let needed: Vec<u32> = standings
            .iter()
            .filter(|s| {
                !self.accounts.contains_key(&s.owner_index)
                    || self.last_counts.get(&s.owner_index) != Some(&s.num_pixels)
            })
            .map(|s| s.owner_index)
            .collect();

        let fetched = join_all(needed.iter().map(|&index| async move {
            (index, remote.get_account_by_index(index).await)
        }))
        .await;

        for (index, result) in fetched {
            match result {
                Ok(record) => {
                    self.accounts
                        .insert(index, AccountStats::from_record(record, "unknown"));
                }
                Err(err) => {
                    tracing::warn!(owner_index = index, "failed to fetch account: {err}");
                }
            }
        }

        self.last_counts = standings
            .iter()
            .map(|s| (s.owner_index, s.num_pixels))
            .collect();
        self.standings = standings.to_vec();
    }

    /// Current standings snapshot, best first
    pub fn standings(&self) -> &[OwnerStanding] {
        &self.standings
    }

    pub fn account(&self, owner_index: u32) -> Option<&AccountStats> {
        self.accounts.get(&owner_index)
    }

    pub fn accounts(&self) -> &HashMap<u32, AccountStats> {
        &self.accounts
    }
}
