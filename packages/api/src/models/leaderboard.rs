//! Public leaderboard projections.
//!
//! The leaderboard is readable without an account, so its rows carry only
//! what the ranking shows: name, referral code, count, points and tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WaitlistEntry;
use crate::rewards::Tier;

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub referral_code: String,
    pub referral_count: u64,
    pub points: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    pub created_at: DateTime<Utc>,
}

impl LeaderboardEntry {
    /// `rank` is 1-based.
    pub fn ranked(rank: usize, entry: &WaitlistEntry) -> Self {
        Self {
            rank,
            name: entry.name.clone(),
            referral_code: entry.referral_code.clone(),
            referral_count: entry.referral_count,
            points: entry.points,
            tier: Tier::for_referrals(entry.referral_count),
            created_at: entry.created_at,
        }
    }
}

/// Summary figures shown above the leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardStats {
    pub total_registrants: usize,
    pub total_referrals: u64,
    /// Name of the first-ranked registrant; `None` while the list is empty.
    pub top_referrer: Option<String>,
}

impl LeaderboardStats {
    /// Summarise entries already in rank order.
    pub fn from_ranked(entries: &[WaitlistEntry]) -> Self {
        Self {
            total_registrants: entries.len(),
            total_referrals: entries.iter().map(|e| e.referral_count).sum(),
            top_referrer: entries.first().map(|e| e.name.clone()),
        }
    }
}
