//! Status endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::state::ServerState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
    pub sessions: usize,
}

pub async fn status_handler(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: "alpha-beta",
        sessions: state.session_count(),
    })
}
