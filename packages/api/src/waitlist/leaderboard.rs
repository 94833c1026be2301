//! Leaderboard: waitlist records ranked by referral count.

use std::cmp::Ordering;

use store::DocumentStore;
use tracing::{error, warn};

use super::Waitlist;
use crate::error::LeaderboardError;
use crate::models::{
    field, LeaderboardStats, WaitlistEntry, WaitlistRecord, WAITLIST_COLLECTION,
};

/// Most referrals first; equal counts keep signup order.
fn rank_order(a: &WaitlistEntry, b: &WaitlistEntry) -> Ordering {
    b.referral_count
        .cmp(&a.referral_count)
        .then(a.created_at.cmp(&b.created_at))
}

impl<S: DocumentStore> Waitlist<S> {
    /// All waitlist entries, most referrals first.
    pub async fn fetch_all(&self) -> Result<Vec<WaitlistEntry>, LeaderboardError> {
        let documents = self
            .store
            .query_all_ordered_desc(WAITLIST_COLLECTION, field::REFERRAL_COUNT)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch leaderboard");
                LeaderboardError::Unavailable(e)
            })?;

        let mut entries: Vec<WaitlistEntry> = documents
            .into_iter()
            .filter_map(|document| match WaitlistRecord::from_document(document) {
                Ok(record) => Some(record.to_entry()),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed waitlist record");
                    None
                }
            })
            .collect();
        // Backends agree on the primary key; pin the tie-break here.
        entries.sort_by(rank_order);
        Ok(entries)
    }

    /// The first `limit` entries of [`fetch_all`](Self::fetch_all).
    pub async fn fetch_top(&self, limit: usize) -> Result<Vec<WaitlistEntry>, LeaderboardError> {
        let mut entries = self.fetch_all().await?;
        entries.truncate(limit);
        Ok(entries)
    }

    /// Totals over the whole waitlist and the current top referrer.
    pub async fn stats(&self) -> Result<LeaderboardStats, LeaderboardError> {
        let entries = self.fetch_all().await?;
        Ok(LeaderboardStats::from_ranked(&entries))
    }
}
