//! # API crate — waitlist signup, referral attribution and leaderboard
//!
//! This crate holds the business logic of the LearnFi waitlist. The web binary
//! constructs a [`Waitlist`] over a [`store::DocumentStore`] and calls into it;
//! nothing here knows about HTTP.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Argon2id password hashing and verification |
//! | [`db`] | `server` | Postgres connection pool, migrations, and the [`db::PgStore`] document store |
//! | [`error`] | — | User-facing error types for signup and leaderboard |
//! | [`models`] | — | The stored [`WaitlistRecord`] and its client-safe projection [`WaitlistEntry`] |
//! | [`referral`] | — | Six-character referral code generation |
//! | [`rewards`] | — | Referral points and achievement tiers |
//! | [`settings`] | — | Layered configuration (defaults, `waitlist.toml`, `WAITLIST_*` env) |
//! | [`waitlist`] | — | The [`Waitlist`] service: `submit`, `fetch_all`, `fetch_top`, `stats`, existence checks |
//!
//! ## Signup flow
//!
//! 1. Validate the form (all fields present, password long enough).
//! 2. Reject an email that is already registered.
//! 3. Draw a referral code and create the record with `referralCount = 0`.
//! 4. If the registrant arrived through a `?ref=CODE` link, atomically
//!    increment the referrer's `referralCount`. The outcome of this step is
//!    reported in [`Attribution`] and never fails the signup.

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod referral;
pub mod rewards;
pub mod settings;
pub mod waitlist;

pub use error::{LeaderboardError, SignupError, ValidationError};
pub use models::{LeaderboardEntry, LeaderboardStats, WaitlistEntry, WaitlistRecord};
pub use settings::Settings;
pub use waitlist::{Attribution, SignupForm, SignupOutcome, Waitlist};
