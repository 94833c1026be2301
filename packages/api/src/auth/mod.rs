//! Credential handling for waitlist registrants.

mod password;

pub use password::{hash_password, verify_password, PasswordError};
