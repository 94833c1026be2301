//! # Waitlist service — signup, referral attribution, leaderboard
//!
//! [`Waitlist`] owns a handle to a [`DocumentStore`] and the
//! [`WaitlistSettings`] that tune it. It is constructed once at the
//! application's composition root and shared (it is `Clone` whenever the store
//! is), so tests swap in a [`store::MemoryStore`] where production uses the
//! Postgres-backed store.
//!
//! | Operation | Module | Description |
//! |-----------|--------|-------------|
//! | [`submit`](Waitlist::submit) | `signup` | Validate, reject duplicates, create the record, credit the referrer. |
//! | [`fetch_all`](Waitlist::fetch_all) / [`fetch_top`](Waitlist::fetch_top) / [`stats`](Waitlist::stats) | `leaderboard` | Records ranked by referral count, and summary totals. |
//! | [`email_exists`](Waitlist::email_exists) / [`referral_code_exists`](Waitlist::referral_code_exists) | `lookup` | Exact-match existence checks. |

use store::DocumentStore;

use crate::referral::generate_referral_code;
use crate::settings::WaitlistSettings;

mod leaderboard;
mod lookup;
mod signup;

pub use lookup::normalize_email;
pub use signup::{Attribution, SignupForm, SignupOutcome};

#[derive(Debug, Clone)]
pub struct Waitlist<S> {
    store: S,
    settings: WaitlistSettings,
    generate_code: fn() -> String,
}

impl<S: DocumentStore> Waitlist<S> {
    pub fn new(store: S, settings: WaitlistSettings) -> Self {
        Self {
            store,
            settings,
            generate_code: generate_referral_code,
        }
    }

    /// Replace the referral code generator.
    pub fn with_code_generator(mut self, generate: fn() -> String) -> Self {
        self.generate_code = generate;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &WaitlistSettings {
        &self.settings
    }
}
