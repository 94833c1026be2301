//! # Waitlist record model
//!
//! Defines the two representations of a waitlist registrant:
//!
//! ## [`WaitlistRecord`]
//!
//! The complete document from the `waitlist` collection, including the
//! Argon2 `password_hash`. Loaded with [`WaitlistRecord::from_document`]; the
//! document keys are camelCase (`referralCode`, `referredBy`, `referralCount`,
//! `passwordHash`) while `id` and `created_at` come from the store metadata.
//!
//! ## [`WaitlistEntry`]
//!
//! The projection handed to callers outside the service. It omits the
//! password hash and carries the registrant's referral points. The helper
//! [`WaitlistEntry::referral_link`] builds the shareable `?ref=` URL.
//! Public leaderboard rows use the narrower
//! [`LeaderboardEntry`](super::LeaderboardEntry), which also drops the email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::{Document, Fields, StoreError};

use crate::rewards::referral_points;

/// Collection holding one document per registrant.
pub const WAITLIST_COLLECTION: &str = "waitlist";

/// Document keys that are queried, indexed, or incremented.
pub mod field {
    pub const EMAIL: &str = "email";
    pub const REFERRAL_CODE: &str = "referralCode";
    pub const REFERRAL_COUNT: &str = "referralCount";
}

/// Query parameter carrying the referrer's code on shared links.
pub const REFERRAL_QUERY_PARAM: &str = "ref";

/// Persisted field layout of a waitlist document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub referral_code: String,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub referral_count: u64,
}

impl RecordFields {
    pub fn into_fields(self) -> Fields {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct of strings and integers always serializes to an object.
            _ => Fields::new(),
        }
    }
}

/// Full waitlist record from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub referral_code: String,
    pub referred_by: Option<String>,
    pub referral_count: u64,
    pub created_at: DateTime<Utc>,
}

impl WaitlistRecord {
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        let fields: RecordFields = document.decode()?;
        Ok(Self {
            id: document.id,
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            referral_code: fields.referral_code,
            referred_by: fields.referred_by,
            referral_count: fields.referral_count,
            created_at: document.created_at,
        })
    }

    /// Convert to WaitlistEntry for client consumption.
    pub fn to_entry(&self) -> WaitlistEntry {
        WaitlistEntry {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            referral_code: self.referral_code.clone(),
            referred_by: self.referred_by.clone(),
            referral_count: self.referral_count,
            points: referral_points(self.referral_count),
            created_at: self.created_at,
        }
    }
}

/// Waitlist record safe to send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: String,
    pub name: String,
    pub email: String,
    pub referral_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referred_by: Option<String>,
    pub referral_count: u64,
    /// Referral points, 100 per attributed referral.
    pub points: u64,
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// Shareable link that credits this entry when someone signs up through it.
    pub fn referral_link(&self, base_url: &str) -> String {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        format!(
            "{base_url}{separator}{REFERRAL_QUERY_PARAM}={}",
            self.referral_code
        )
    }
}
