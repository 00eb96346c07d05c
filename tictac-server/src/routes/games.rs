//! Game session endpoints
//!
//! Create and delete sessions, apply moves (by cell or by canvas point),
//! restart and switch modes. A move that finishes the game schedules a
//! delayed restart.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tictac_core::{AlphaBetaAI, Board, Coord, GameResult, GameSession, Mode, Player, AI_PLAYER};

use super::ApiError;
use crate::geometry::cell_at_point;
use crate::state::{ServerState, SessionId};

/// Snapshot of one session as sent to clients
#[derive(Serialize)]
pub struct SessionView {
    pub id: SessionId,
    pub board: Board,
    pub current_player: Player,
    pub mode: Mode,
    pub mode_label: &'static str,
    pub result: GameResult,
    pub status: String,
    pub game_over: bool,
    pub generation: u64,
}

impl SessionView {
    fn new(id: SessionId, session: &GameSession) -> Self {
        Self {
            id,
            board: *session.board(),
            current_player: session.current_player(),
            mode: session.mode(),
            mode_label: session.mode().label(),
            result: session.result(),
            status: session.status_text(),
            game_over: session.is_over(),
            generation: session.generation(),
        }
    }
}

#[derive(Serialize)]
pub struct MoveResponse {
    #[serde(flatten)]
    pub session: SessionView,
    pub placed: Coord,
    pub ai_move: Option<Coord>,
}

/// A move given either as a cell or as a point on the canvas
#[derive(Deserialize)]
#[serde(untagged)]
pub enum MoveRequest {
    Cell { row: usize, col: usize },
    Point { x: f64, y: f64 },
}

impl MoveRequest {
    fn coord(&self) -> Result<Coord, ApiError> {
        match *self {
            MoveRequest::Cell { row, col } => Ok(Coord::new(row, col)?),
            MoveRequest::Point { x, y } => cell_at_point(x, y).ok_or_else(|| {
                ApiError::BadRequest(format!("Point ({}, {}) is outside the board", x, y))
            }),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct ModeRequest {
    pub mode: Option<Mode>,
}

/// Body that may be left out entirely. A request without a JSON content
/// type counts as absent; a JSON body that does not parse is rejected.
fn optional_body<T: Default>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

/// Create a new session
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    body: Result<Json<ModeRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let mode = optional_body(body)?.mode;
    let (id, session) = state.create_session(mode);
    Ok(Json(SessionView::new(id, &session)))
}

/// Get a session snapshot
pub async fn get_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .with_session(id, |session| Json(SessionView::new(id, session)))
        .ok_or(ApiError::SessionNotFound(id))
}

/// Drop a session
pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(id))
    }
}

/// Apply a player's move, plus the engine's answer in player-vs-AI mode.
///
/// The engine searches a copy of the board on the blocking pool with the
/// session lock released. Its move is applied only if the session is still
/// at the searched position.
pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(req) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let pos = req.coord()?;

    let (placed, pending, mut view) = state
        .with_session_mut(id, |session| {
            session.play_human(pos).map(|report| {
                let pending = session
                    .awaiting_ai()
                    .then(|| (*session.board(), session.generation()));
                (report.placed, pending, SessionView::new(id, session))
            })
        })
        .ok_or(ApiError::SessionNotFound(id))??;

    let mut ai_move = None;
    if let Some((board, generation)) = pending {
        let reply = tokio::task::spawn_blocking(move || {
            AlphaBetaAI::new(AI_PLAYER).best_move(&board)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("engine task failed: {}", e)))?;

        view = state
            .with_session_mut(id, |session| {
                if let Some(mv) = reply {
                    let unchanged =
                        session.generation() == generation && *session.board() == board;
                    if unchanged && session.apply_ai_move(mv).is_ok() {
                        ai_move = Some(mv);
                    } else {
                        tracing::debug!(id, "engine reply discarded, session changed");
                    }
                }
                SessionView::new(id, session)
            })
            .ok_or(ApiError::SessionNotFound(id))?;
    }

    tracing::info!(
        id,
        %placed,
        ai_move = ?ai_move,
        status = %view.status,
        "move applied"
    );

    if view.game_over {
        state.schedule_restart(id, view.generation);
    }

    Ok(Json(MoveResponse {
        session: view,
        placed,
        ai_move,
    }))
}

/// Clear the board immediately
pub async fn restart_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    state
        .with_session_mut(id, |session| {
            session.restart();
            Json(SessionView::new(id, session))
        })
        .ok_or(ApiError::SessionNotFound(id))
}

/// Toggle the mode, or set it when a mode is given. Either way the game
/// restarts.
pub async fn change_mode(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
    body: Result<Json<ModeRequest>, JsonRejection>,
) -> Result<Json<SessionView>, ApiError> {
    let requested = optional_body(body)?.mode;

    state
        .with_session_mut(id, |session| {
            match requested {
                Some(mode) => session.set_mode(mode),
                None => {
                    session.toggle_mode();
                }
            }
            tracing::info!(id, mode = %session.mode(), "mode changed");
            Json(SessionView::new(id, session))
        })
        .ok_or(ApiError::SessionNotFound(id))
}
