//! Signup workflow: validation, duplicate check, record creation and
//! referral attribution.

use serde::Deserialize;
use store::{DocumentStore, StoreError};
use tracing::{debug, error, info, warn};

use super::lookup::normalize_email;
use super::Waitlist;
use crate::auth::hash_password;
use crate::error::{SignupError, ValidationError};
use crate::models::{field, RecordFields, WaitlistEntry, WaitlistRecord, WAITLIST_COLLECTION};

/// Raw signup form as submitted by a registrant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Referral code from the `ref` query parameter of the landing page.
    #[serde(default)]
    pub referred_by: Option<String>,
}

/// A form that passed validation, with name and email normalised.
#[derive(Debug)]
struct ValidSignup<'a> {
    name: &'a str,
    email: String,
    password: &'a str,
    referred_by: Option<&'a str>,
}

impl SignupForm {
    /// Check the form without touching the store.
    pub fn validate(&self, min_password_len: usize) -> Result<(), ValidationError> {
        self.validated(min_password_len).map(|_| ())
    }

    fn validated(&self, min_password_len: usize) -> Result<ValidSignup<'_>, ValidationError> {
        let name = self.name.trim();
        let email = normalize_email(&self.email);
        if name.is_empty() || email.is_empty() || self.password.trim().is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password.chars().count() < min_password_len {
            return Err(ValidationError::PasswordTooShort {
                min: min_password_len,
            });
        }

        Ok(ValidSignup {
            name,
            email,
            password: &self.password,
            referred_by: self
                .referred_by
                .as_deref()
                .map(str::trim)
                .filter(|code| !code.is_empty()),
        })
    }
}

/// What happened to the referral credit of a signup.
///
/// Attribution is best effort: none of these outcomes fail the signup, and
/// they are logged rather than shown to the registrant.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    NotReferred,
    Credited { referrer_id: String },
    /// No record carries the supplied code.
    UnknownCode,
    /// More than one record carries the supplied code; nobody was credited.
    Ambiguous,
    Failed(StoreError),
}

impl Attribution {
    pub fn is_credited(&self) -> bool {
        matches!(self, Attribution::Credited { .. })
    }

    pub fn failure(&self) -> Option<&StoreError> {
        match self {
            Attribution::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn status(&self) -> &'static str {
        match self {
            Attribution::NotReferred => "none",
            Attribution::Credited { .. } => "credited",
            Attribution::UnknownCode => "unknown_code",
            Attribution::Ambiguous => "ambiguous",
            Attribution::Failed(_) => "failed",
        }
    }
}

/// Result of a successful signup.
#[derive(Debug, Clone, PartialEq)]
pub struct SignupOutcome {
    pub entry: WaitlistEntry,
    pub attribution: Attribution,
}

impl<S: DocumentStore> Waitlist<S> {
    /// Add a registrant to the waitlist and credit their referrer.
    pub async fn submit(&self, form: SignupForm) -> Result<SignupOutcome, SignupError> {
        let signup = form.validated(self.settings.min_password_len)?;

        match self.email_exists(&signup.email).await {
            Ok(true) => return Err(SignupError::DuplicateEmail),
            Ok(false) => {}
            Err(e) => {
                error!(error = %e, "Failed to check email during signup");
                return Err(SignupError::Unavailable(e));
            }
        }

        let password_hash = hash_password(signup.password)?;
        let record = self.create_record(&signup, password_hash).await?;

        let attribution = match record.referred_by.as_deref() {
            Some(code) => self.attribute_referral(&record.id, code).await,
            None => Attribution::NotReferred,
        };
        info!(
            id = %record.id,
            referral = attribution.status(),
            "Joined waitlist"
        );

        Ok(SignupOutcome {
            entry: record.to_entry(),
            attribution,
        })
    }

    async fn create_record(
        &self,
        signup: &ValidSignup<'_>,
        password_hash: String,
    ) -> Result<WaitlistRecord, SignupError> {
        let attempts = self.settings.referral_code_attempts.max(1);
        let mut last_conflict = None;

        for attempt in 1..=attempts {
            let referral_code = (self.generate_code)();
            // A registrant can never refer themselves.
            if signup.referred_by == Some(referral_code.as_str()) {
                continue;
            }

            let fields = RecordFields {
                name: signup.name.to_string(),
                email: signup.email.clone(),
                password_hash: password_hash.clone(),
                referral_code,
                referred_by: signup.referred_by.map(str::to_string),
                referral_count: 0,
            }
            .into_fields();

            match self.store.create(WAITLIST_COLLECTION, fields).await {
                Ok(document) => {
                    return WaitlistRecord::from_document(document)
                        .map_err(SignupError::Unavailable)
                }
                Err(e) if e.is_conflict_on(field::EMAIL) => {
                    return Err(SignupError::DuplicateEmail);
                }
                Err(e) if e.is_conflict_on(field::REFERRAL_CODE) => {
                    warn!(attempt, "Referral code collision, drawing a new code");
                    last_conflict = Some(e);
                }
                Err(e) => {
                    error!(error = %e, "Failed to create waitlist record");
                    return Err(SignupError::Unavailable(e));
                }
            }
        }

        error!(attempts, "Gave up drawing a unique referral code");
        Err(SignupError::Unavailable(last_conflict.unwrap_or_else(|| {
            StoreError::Conflict {
                collection: WAITLIST_COLLECTION.to_string(),
                field: field::REFERRAL_CODE.to_string(),
            }
        })))
    }

    /// Credit the record owning `code` with one referral.
    async fn attribute_referral(&self, new_id: &str, code: &str) -> Attribution {
        let matches = match self
            .store
            .query_exact(WAITLIST_COLLECTION, field::REFERRAL_CODE, code)
            .await
        {
            Ok(docs) => docs,
            Err(e) => {
                error!(error = %e, code, "Failed to look up referrer");
                return Attribution::Failed(e);
            }
        };

        let mut referrers: Vec<_> = matches.into_iter().filter(|d| d.id != new_id).collect();
        let referrer = match referrers.len() {
            0 => {
                warn!(code, "Referral code matches no waitlist record");
                return Attribution::UnknownCode;
            }
            1 => referrers.remove(0),
            n => {
                error!(code, matches = n, "Referral code matches several records");
                return Attribution::Ambiguous;
            }
        };

        match self
            .store
            .increment_field(WAITLIST_COLLECTION, &referrer.id, field::REFERRAL_COUNT, 1)
            .await
        {
            Ok(()) => {
                debug!(referrer = %referrer.id, "Credited referral");
                Attribution::Credited {
                    referrer_id: referrer.id,
                }
            }
            Err(e) => {
                error!(error = %e, referrer = %referrer.id, "Failed to credit referral");
                Attribution::Failed(e)
            }
        }
    }
}
