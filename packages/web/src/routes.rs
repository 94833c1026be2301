//! JSON endpoints over the waitlist service.
//!
//! | Method & path | Description |
//! |---------------|-------------|
//! | `POST /api/waitlist?ref=CODE` | Join the waitlist; `ref` credits the referrer. |
//! | `GET /api/leaderboard?limit=N` | Ranked public rows, top `N` (default from settings). |
//! | `GET /api/leaderboard/stats` | Registrant and referral totals, top referrer. |
//! | `GET /api/waitlist/exists?email=` | Whether an email is already registered. |
//! | `GET /api/referrals/{code}` | Whether a referral code belongs to someone. |
//!
//! Every failure, including an unreadable body or query string, answers with
//! a `{"error": "..."}` body.

use std::sync::Arc;

use api::models::{LeaderboardEntry, LeaderboardStats, WaitlistEntry};
use api::{SignupForm, Waitlist};
use axum::extract::{FromRequest, FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use store::DocumentStore;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState<S> {
    waitlist: Waitlist<S>,
    public_url: Arc<str>,
}

impl<S> AppState<S> {
    pub fn new(waitlist: Waitlist<S>, public_url: impl Into<String>) -> Self {
        Self {
            waitlist,
            public_url: Arc::from(public_url.into()),
        }
    }
}

pub fn router<S>(state: AppState<S>) -> Router
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/waitlist", post(join::<S>))
        .route("/api/waitlist/exists", get(email_exists::<S>))
        .route("/api/leaderboard", get(leaderboard::<S>))
        .route("/api/leaderboard/stats", get(leaderboard_stats::<S>))
        .route("/api/referrals/{code}", get(referral_code::<S>))
        .with_state(state)
}

/// `Json` whose rejections answer with [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
struct JsonBody<T>(T);

/// `Query` whose rejections answer with [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
struct QueryParams<T>(T);

/// Signup body. Missing fields deserialize as empty so that validation, not
/// the JSON extractor, reports them.
#[derive(Debug, Deserialize)]
struct JoinRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
struct ReferralQuery {
    #[serde(rename = "ref")]
    referred_by: Option<String>,
}

/// The registrant's own entry. How their referral code was attributed is
/// logged, never returned.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinResponse {
    entry: WaitlistEntry,
    referral_link: String,
}

async fn join<S>(
    State(state): State<AppState<S>>,
    QueryParams(query): QueryParams<ReferralQuery>,
    JsonBody(body): JsonBody<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    let form = SignupForm {
        name: body.name,
        email: body.email,
        password: body.password,
        referred_by: query.referred_by,
    };
    let outcome = state.waitlist.submit(form).await?;

    let response = JoinResponse {
        referral_link: outcome.entry.referral_link(&state.public_url),
        entry: outcome.entry,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

async fn leaderboard<S>(
    State(state): State<AppState<S>>,
    QueryParams(query): QueryParams<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    let limit = query
        .limit
        .unwrap_or(state.waitlist.settings().leaderboard_limit);
    let entries = state.waitlist.fetch_top(limit).await?;

    Ok(Json(
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| LeaderboardEntry::ranked(i + 1, entry))
            .collect(),
    ))
}

async fn leaderboard_stats<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<LeaderboardStats>, ApiError>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    Ok(Json(state.waitlist.stats().await?))
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Serialize)]
struct ExistsResponse {
    exists: bool,
}

async fn email_exists<S>(
    State(state): State<AppState<S>>,
    QueryParams(query): QueryParams<EmailQuery>,
) -> Result<Json<ExistsResponse>, ApiError>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    let exists = state
        .waitlist
        .email_exists(&query.email)
        .await
        .map_err(ApiError::Lookup)?;
    Ok(Json(ExistsResponse { exists }))
}

#[derive(Debug, Serialize)]
struct ValidResponse {
    valid: bool,
}

async fn referral_code<S>(
    State(state): State<AppState<S>>,
    Path(code): Path<String>,
) -> Json<ValidResponse>
where
    S: DocumentStore + Clone + Send + Sync + 'static,
{
    Json(ValidResponse {
        valid: state.waitlist.referral_code_exists(&code).await,
    })
}
