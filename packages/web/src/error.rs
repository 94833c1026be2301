//! Mapping of service errors onto HTTP responses.

use api::{LeaderboardError, SignupError};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Signup(#[from] SignupError),
    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
    #[error("Failed to check email. Please try again.")]
    Lookup(#[source] StoreError),
    /// The request body or query string could not be extracted.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Signup(SignupError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Signup(SignupError::DuplicateEmail) => StatusCode::CONFLICT,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Signup(_) | ApiError::Leaderboard(_) | ApiError::Lookup(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
