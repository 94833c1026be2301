//! Referral points and achievement tiers.
//!
//! Every attributed referral is worth [`POINTS_PER_REFERRAL`]. Reaching a
//! tier threshold unlocks that tier's bonus on top.
//!
//! | Tier | Referrals | Bonus points |
//! |------|-----------|--------------|
//! | Bronze | 5+ | 500 |
//! | Silver | 10+ | 1,000 |
//! | Gold | 20+ | 2,500 |
//! | Diamond | 50+ | 10,000 |

use serde::{Deserialize, Serialize};

pub const POINTS_PER_REFERRAL: u64 = 100;

/// Points earned for `referral_count` referrals, excluding tier bonuses.
pub fn referral_points(referral_count: u64) -> u64 {
    referral_count.saturating_mul(POINTS_PER_REFERRAL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    /// Highest first.
    const ALL: [Tier; 4] = [Tier::Diamond, Tier::Gold, Tier::Silver, Tier::Bronze];

    pub fn min_referrals(self) -> u64 {
        match self {
            Tier::Bronze => 5,
            Tier::Silver => 10,
            Tier::Gold => 20,
            Tier::Diamond => 50,
        }
    }

    pub fn bonus_points(self) -> u64 {
        match self {
            Tier::Bronze => 500,
            Tier::Silver => 1_000,
            Tier::Gold => 2_500,
            Tier::Diamond => 10_000,
        }
    }

    /// The highest tier reached with `referral_count` referrals, if any.
    pub fn for_referrals(referral_count: u64) -> Option<Tier> {
        Self::ALL
            .into_iter()
            .find(|tier| referral_count >= tier.min_referrals())
    }
}
