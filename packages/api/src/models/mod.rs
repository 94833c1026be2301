//! Data models for the application.

mod leaderboard;
mod record;

pub use leaderboard::{LeaderboardEntry, LeaderboardStats};
pub use record::{
    field, RecordFields, WaitlistEntry, WaitlistRecord, REFERRAL_QUERY_PARAM, WAITLIST_COLLECTION,
};
