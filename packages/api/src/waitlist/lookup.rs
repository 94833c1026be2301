//! Exact-match existence checks.

use store::{DocumentStore, StoreError};
use tracing::warn;

use super::Waitlist;
use crate::models::{field, WAITLIST_COLLECTION};

/// Canonical form of an email address: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<S: DocumentStore> Waitlist<S> {
    /// Whether a record with this email (after normalisation) exists.
    pub async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Ok(false);
        }
        let matches = self
            .store
            .query_exact(WAITLIST_COLLECTION, field::EMAIL, &email)
            .await?;
        Ok(!matches.is_empty())
    }

    /// Whether a record owns this referral code.
    ///
    /// A store failure is logged and reported as `false`.
    pub async fn referral_code_exists(&self, code: &str) -> bool {
        let code = code.trim();
        if code.is_empty() {
            return false;
        }
        match self
            .store
            .query_exact(WAITLIST_COLLECTION, field::REFERRAL_CODE, code)
            .await
        {
            Ok(matches) => !matches.is_empty(),
            Err(e) => {
                warn!(error = %e, code, "Failed to validate referral code");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use store::Operation;

    use super::*;
    use crate::waitlist::testing::{form, waitlist};

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[tokio::test]
    async fn test_email_exists() {
        let (waitlist, store) = waitlist();
        assert!(!waitlist.email_exists("alice@x.com").await.unwrap());

        waitlist
            .submit(form("Alice", "alice@x.com", "secret1", None))
            .await
            .unwrap();
        assert!(waitlist.email_exists("alice@x.com").await.unwrap());
        assert!(waitlist.email_exists(" ALICE@x.com").await.unwrap());
        assert!(!waitlist.email_exists("bob@x.com").await.unwrap());
        assert!(!waitlist.email_exists("").await.unwrap());

        store.fail_operations(&[Operation::QueryExact]);
        assert!(waitlist.email_exists("alice@x.com").await.is_err());
    }

    #[tokio::test]
    async fn test_referral_code_exists() {
        let (waitlist, store) = waitlist();
        let alice = waitlist
            .submit(form("Alice", "alice@x.com", "secret1", None))
            .await
            .unwrap()
            .entry;

        assert!(waitlist.referral_code_exists(&alice.referral_code).await);
        assert!(!waitlist.referral_code_exists("NOPE00").await);
        assert!(!waitlist.referral_code_exists("").await);

        store.fail_operations(&[Operation::QueryExact]);
        assert!(!waitlist.referral_code_exists(&alice.referral_code).await);
    }
}
