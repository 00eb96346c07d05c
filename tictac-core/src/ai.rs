//! Exhaustive minimax AI with alpha-beta pruning

use crate::board::{Board, Cell, Coord, GameResult, Player};
use serde::Serialize;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score of a won position before the depth adjustment
pub const WIN_SCORE: i32 = 10;

/// Score of a lost position before the depth adjustment
pub const LOSS_SCORE: i32 = -10;

// ============================================================================
// SEARCH TYPES
// ============================================================================

/// Score and move found by a search.
///
/// The score is from the maximizing side's point of view. `mv` is `None`
/// at terminal nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub score: i32,
    #[serde(rename = "move")]
    pub mv: Option<Coord>,
}

impl SearchResult {
    fn terminal(score: i32) -> Self {
        Self { score, mv: None }
    }
}

/// Node counters for one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Positions visited, terminal ones included
    pub nodes: u64,
    /// Nodes where remaining candidates were skipped
    pub cutoffs: u64,
}

// ============================================================================
// MINIMAX WITH ALPHA-BETA
// ============================================================================

/// Minimax searcher for a fixed maximizing side.
///
/// `search` places and removes marks on the board it is given, so it is not
/// reentrant: the `&mut Board` borrow keeps the board exclusively owned for
/// the whole call and every placement is undone before returning.
#[derive(Clone, Debug)]
pub struct Searcher {
    maximizer: Player,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(maximizer: Player) -> Self {
        Self {
            maximizer,
            stats: SearchStats::default(),
        }
    }

    pub fn maximizer(&self) -> Player {
        self.maximizer
    }

    pub fn minimizer(&self) -> Player {
        self.maximizer.opponent()
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Minimax search from `board`.
    ///
    /// Wins are worth `10 - depth` and losses `-10 + depth`, so faster wins
    /// and slower losses score better. Candidates are tried in row-major
    /// order and only a strictly better score replaces the current best, so
    /// ties go to the earliest cell.
    pub fn search(
        &mut self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> SearchResult {
        self.stats.nodes += 1;

        if board.winner(self.minimizer().cell()) {
            return SearchResult::terminal(LOSS_SCORE + depth);
        }
        if board.winner(self.maximizer.cell()) {
            return SearchResult::terminal(WIN_SCORE - depth);
        }
        if board.is_full() {
            return SearchResult::terminal(0);
        }

        let mark = if maximizing {
            self.maximizer.cell()
        } else {
            self.minimizer().cell()
        };
        let mut best = SearchResult {
            score: if maximizing { i32::MIN } else { i32::MAX },
            mv: None,
        };

        for pos in Coord::all() {
            if board.at(pos) != Cell::Empty {
                continue;
            }

            board.put(pos, mark);
            let child = self.search(board, depth + 1, !maximizing, alpha, beta);
            board.put(pos, Cell::Empty);

            if maximizing {
                if child.score > best.score {
                    best = SearchResult { score: child.score, mv: Some(pos) };
                }
                alpha = alpha.max(child.score);
            } else {
                if child.score < best.score {
                    best = SearchResult { score: child.score, mv: Some(pos) };
                }
                beta = beta.min(child.score);
            }

            if beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        best
    }
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Root search outcome with node counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub player: Player,
    #[serde(flatten)]
    pub result: SearchResult,
    #[serde(flatten)]
    pub stats: SearchStats,
}

/// Alpha-Beta AI player
#[derive(Clone, Copy, Debug)]
pub struct AlphaBetaAI {
    pub player: Player,
}

impl AlphaBetaAI {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    /// Get best move for current position
    pub fn best_move(&self, board: &Board) -> Option<Coord> {
        self.analyze(board).result.mv
    }

    /// Full-window search from the root, on a copy of `board`
    pub fn analyze(&self, board: &Board) -> Analysis {
        let mut scratch = *board;
        let mut searcher = Searcher::new(self.player);
        let result = searcher.search(&mut scratch, 0, true, i32::MIN, i32::MAX);
        let stats = searcher.stats();

        tracing::debug!(
            player = %self.player,
            board = %board,
            score = result.score,
            mv = ?result.mv,
            nodes = stats.nodes,
            cutoffs = stats.cutoffs,
            "alpha-beta search finished"
        );

        Analysis {
            player: self.player,
            result,
            stats,
        }
    }

    /// Play a game to the end with the engine choosing for both sides.
    ///
    /// The side to move is taken from the mark counts on `initial`.
    pub fn play_game(initial: Board) -> (Board, Vec<Coord>) {
        let mut board = initial;
        let mut history = Vec::new();

        while board.result() == GameResult::Ongoing {
            let side = board.side_to_move();
            match AlphaBetaAI::new(side).best_move(&board) {
                Some(mv) => {
                    board.put(mv, side.cell());
                    history.push(mv);
                }
                None => break,
            }
        }

        (board, history)
    }
}

// ============================================================================
// TESTS
// ============================================================================
