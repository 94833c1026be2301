//! # Database module — Postgres document store
//!
//! Everything here is gated behind `#[cfg(feature = "server")]` so that the
//! workflow crate and its tests build without SQLx or a database.
//!
//! ## Design
//!
//! The pool is **not** a process-wide singleton: [`connect`] opens a pool from
//! [`DatabaseSettings`](crate::settings::DatabaseSettings) and the caller owns
//! it. [`PgStore`] wraps that pool and implements [`store::DocumentStore`] over
//! a single `documents` table holding one JSONB object per document. The
//! migrations embedded by [`migrate`] create the table, a GIN index for
//! exact-match queries, and the unique indexes on waitlist emails and referral
//! codes.
//!
//! ## Re-exports
//!
//! - [`connect`] — opens a `PgPool`.
//! - [`migrate`] — runs the embedded migrations.
//! - [`PgStore`] — the `DocumentStore` implementation.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod postgres;

#[cfg(feature = "server")]
pub use pool::{connect, migrate};
#[cfg(feature = "server")]
pub use postgres::PgStore;
