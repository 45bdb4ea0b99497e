//! Error responses for the REST API.
//!
//! Unlike the webhook (which always acknowledges), the REST endpoints
//! report failures honestly: [`ApiError`] maps every failure mode to an
//! HTTP status and a JSON body via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use civbot_engine::GameError;

use crate::dispatch::EventError;

/// Errors surfaced by the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required request field was missing or malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation lost a concurrent race and was not applied.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A game rule rejected the operation.
    #[error(transparent)]
    Game(#[from] GameError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<civbot_db::DbError> for ApiError {
    fn from(error: civbot_db::DbError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<EventError> for ApiError {
    fn from(error: EventError) -> Self {
        match error {
            EventError::Game(game) => Self::Game(game),
            EventError::Storage(e) => Self::Internal(e.to_string()),
            EventError::Delivery(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Game(game) => game_status(game),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// HTTP status for each domain error kind.
const fn game_status(error: &GameError) -> StatusCode {
    match error {
        GameError::NotRegistered | GameError::TargetNotFound => StatusCode::NOT_FOUND,
        GameError::SelfAttackForbidden | GameError::MissingTarget => StatusCode::BAD_REQUEST,
        GameError::OnCooldown { .. } => StatusCode::TOO_MANY_REQUESTS,
        GameError::InsufficientResources { .. } | GameError::AlreadyOwned => StatusCode::CONFLICT,
    }
}
