//! HTTP route handlers

pub mod analyze;
pub mod games;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::SessionId;

/// Error returned by route handlers as a JSON `{ "error": ... }` body
#[derive(Debug)]
pub enum ApiError {
    SessionNotFound(SessionId),
    BadRequest(String),
    Game(tictac_core::Error),
    Internal(String),
}

impl From<tictac_core::Error> for ApiError {
    fn from(err: tictac_core::Error) -> Self {
        ApiError::Game(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("No game session with id {}", id))
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Game(err) => {
                let status = match err {
                    tictac_core::Error::CellOccupied { .. }
                    | tictac_core::Error::GameOver
                    | tictac_core::Error::NotYourTurn(_) => StatusCode::CONFLICT,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, err.to_string())
            }
            ApiError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        tracing::debug!(%status, %message, "request rejected");
        (status, Json(json!({ "error": message }))).into_response()
    }
}
