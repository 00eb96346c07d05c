//! Stateless position analysis

use axum::Json;
use serde::Deserialize;
use tictac_core::{AlphaBetaAI, Analysis, Board, Player};

use super::ApiError;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Nine cells of `x`, `o` or `.`, row-major
    pub board: String,
    /// Side to search for; defaults to the side to move
    pub player: Option<String>,
}

/// Run the engine on a submitted position
pub async fn analyze_position(Json(req): Json<AnalyzeRequest>) -> Result<Json<Analysis>, ApiError> {
    let board: Board = req.board.parse()?;
    let player = match req.player.as_deref() {
        Some(p) => p.parse::<Player>()?,
        None => board.side_to_move(),
    };

    Ok(Json(AlphaBetaAI::new(player).analyze(&board)))
}
