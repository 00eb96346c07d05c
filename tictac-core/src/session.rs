//! Game session - turn orchestration for one game
//!
//! A session owns the board, whose turn it is, the mode and the result.
//! In player-vs-AI mode X is the human and O is answered by the engine on
//! the same call that passes it the turn.

use crate::ai::AlphaBetaAI;
use crate::board::{Board, Cell, Coord, GameResult, Player};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side played by the engine in player-vs-AI mode
pub const AI_PLAYER: Player = Player::O;

/// Who controls the O side
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "pvp")]
    PlayerVsPlayer,
    #[default]
    #[serde(rename = "pvai")]
    PlayerVsAi,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::PlayerVsPlayer => Mode::PlayerVsAi,
            Mode::PlayerVsAi => Mode::PlayerVsPlayer,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::PlayerVsPlayer => "Player vs Player",
            Mode::PlayerVsAi => "Player vs AI",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::PlayerVsPlayer => write!(f, "pvp"),
            Mode::PlayerVsAi => write!(f, "pvai"),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(Mode::PlayerVsPlayer),
            "pvai" | "ai" => Ok(Mode::PlayerVsAi),
            _ => Err(Error::InvalidMode(s.to_string())),
        }
    }
}

/// What happened during one call to [`GameSession::play`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub placed: Coord,
    pub ai_move: Option<Coord>,
    pub result: GameResult,
}

/// State of one game
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    current: Player,
    mode: Mode,
    result: GameResult,
    /// Incremented on every restart
    generation: u64,
}

impl GameSession {
    pub fn new(mode: Mode) -> Self {
        Self {
            board: Board::new(),
            current: Player::X,
            mode,
            result: GameResult::Ongoing,
            generation: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    /// Place the current player's mark, then let the engine answer if it
    /// is its turn.
    pub fn play(&mut self, pos: Coord) -> Result<TurnReport> {
        let mut report = self.play_human(pos)?;

        if self.awaiting_ai() {
            if let Some(mv) = AlphaBetaAI::new(AI_PLAYER).best_move(&self.board) {
                self.apply_ai_move(mv)?;
                report.ai_move = Some(mv);
                report.result = self.result;
            }
        }

        Ok(report)
    }

    /// Place the current player's mark without answering for the engine.
    ///
    /// While [`GameSession::awaiting_ai`] holds, human moves are refused
    /// with `NotYourTurn`.
    pub fn play_human(&mut self, pos: Coord) -> Result<TurnReport> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        if self.awaiting_ai() {
            return Err(Error::NotYourTurn(AI_PLAYER.opponent()));
        }
        self.check_empty(pos)?;

        self.place(pos);

        Ok(TurnReport {
            placed: pos,
            ai_move: None,
            result: self.result,
        })
    }

    /// True when the engine has the move in player-vs-AI mode
    pub fn awaiting_ai(&self) -> bool {
        !self.is_over() && self.mode == Mode::PlayerVsAi && self.current == AI_PLAYER
    }

    /// Place the engine's mark, computed elsewhere from a copy of the board
    pub fn apply_ai_move(&mut self, pos: Coord) -> Result<()> {
        if self.is_over() {
            return Err(Error::GameOver);
        }
        if !self.awaiting_ai() {
            return Err(Error::NotYourTurn(AI_PLAYER));
        }
        self.check_empty(pos)?;
        self.place(pos);
        Ok(())
    }

    fn check_empty(&self, pos: Coord) -> Result<()> {
        if self.board.at(pos) != Cell::Empty {
            return Err(Error::CellOccupied {
                row: pos.row(),
                col: pos.col(),
            });
        }
        Ok(())
    }

    /// Row/column convenience wrapper around [`GameSession::play`]
    pub fn play_at(&mut self, row: usize, col: usize) -> Result<TurnReport> {
        self.play(Coord::new(row, col)?)
    }

    fn place(&mut self, pos: Coord) {
        let player = self.current;
        self.board.put(pos, player.cell());

        if self.board.winner(player.cell()) {
            self.result = GameResult::Won(player);
            tracing::info!(winner = %player, board = %self.board, "game won");
        } else if self.board.is_full() {
            self.result = GameResult::Draw;
            tracing::info!(board = %self.board, "game drawn");
        } else {
            self.current = player.opponent();
        }
    }

    /// Clear the board in place and hand the first move back to X
    pub fn restart(&mut self) {
        self.board.reset();
        self.current = Player::X;
        self.result = GameResult::Ongoing;
        self.generation += 1;
        tracing::debug!(generation = self.generation, mode = %self.mode, "session restarted");
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.restart();
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Status line shown to players
    pub fn status_text(&self) -> String {
        match self.result {
            GameResult::Won(player) if player == AI_PLAYER && self.mode == Mode::PlayerVsAi => {
                "AI Wins!".to_string()
            }
            GameResult::Won(player) => format!("Player {} Wins!", player),
            GameResult::Draw => "It's a Draw!".to_string(),
            GameResult::Ongoing => format!("Player {}'s turn", self.current),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}
