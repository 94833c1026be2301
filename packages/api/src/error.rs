//! Errors surfaced by the waitlist workflows.
//!
//! Display strings are the messages shown to registrants, so store and
//! hashing details stay in the error source chain and out of the UI.

use store::StoreError;
use thiserror::Error;

use crate::auth::PasswordError;

/// Signup form rejected before touching the store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Password must be at least {min} characters long.")]
    PasswordTooShort { min: usize },
}

#[derive(Debug, Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An account with this email already exists.")]
    DuplicateEmail,

    #[error("Failed to join waitlist. Please try again.")]
    Unavailable(#[source] StoreError),

    #[error("Failed to join waitlist. Please try again.")]
    Credential(#[from] PasswordError),
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("Failed to load leaderboard. Please try again.")]
    Unavailable(#[source] StoreError),
}
