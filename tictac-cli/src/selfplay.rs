//! Selfplay command - engine-vs-engine games from random openings
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: RNG and formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use tictac_core::{AlphaBetaAI, Board, Coord, GameResult, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to play
    #[arg(long, default_value = "20")]
    pub games: usize,

    /// Random plies played before the engine takes over both sides
    #[arg(long, default_value = "2")]
    pub random_plies: usize,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    opening: String,
    /// Engine value of the opening for the side to move
    opening_value: i32,
    result: GameResult,
    moves: Vec<Coord>,
    /// Whether the outcome matches the opening value
    consistent: bool,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
struct SelfplayResults {
    total_games: usize,
    x_wins: usize,
    o_wins: usize,
    draws: usize,
    inconsistent: usize,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Play all games in parallel, one board per game
/// 2. Report results
pub fn run(args: SelfplayArgs) -> Result<()> {
    let base_seed = args.seed.unwrap_or_else(rand::random);

    tracing::info!(
        "Starting selfplay: {} games, {} random plies, seed={}",
        args.games,
        args.random_plies,
        base_seed
    );

    let results = play_games(&args, base_seed);

    if results.inconsistent > 0 {
        tracing::warn!("{} games ended against their opening value", results.inconsistent);
    }

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(args: &SelfplayArgs, base_seed: u64) -> SelfplayResults {
    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.games as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let games: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let record = play_single_game(i + 1, args.random_plies, base_seed.wrapping_add(i as u64));
            progress.inc(1);
            record
        })
        .collect();

    progress.finish_and_clear();
    compute_statistics(games)
}

fn report_results(results: &SelfplayResults, args: &SelfplayArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(game_number: usize, random_plies: usize, seed: u64) -> GameRecord {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let opening = random_opening(random_plies, &mut rng);

    let mover = opening.side_to_move();
    let opening_value = AlphaBetaAI::new(mover).analyze(&opening).result.score;

    let (final_board, moves) = AlphaBetaAI::play_game(opening);
    let result = final_board.result();

    tracing::debug!(game_number, opening = %opening, ?result, "game finished");

    GameRecord {
        game_number,
        opening: opening.to_string(),
        opening_value,
        result,
        moves,
        consistent: outcome_matches_value(result, mover, opening_value),
    }
}

/// Play `plies` random legal moves from the empty board
fn random_opening(plies: usize, rng: &mut ChaCha8Rng) -> Board {
    let mut board = Board::new();
    for _ in 0..plies {
        if board.result() != GameResult::Ongoing {
            break;
        }
        let side = board.side_to_move();
        match board.empty_cells().choose(rng) {
            Some(pos) => board.put(pos, side.cell()),
            None => break,
        }
    }
    board
}

/// Optimal play from a position must realize its value: positive means the
/// side to move wins, negative means it loses, zero is a draw.
fn outcome_matches_value(result: GameResult, mover: Player, value: i32) -> bool {
    match result {
        GameResult::Won(winner) if winner == mover => value > 0,
        GameResult::Won(_) => value < 0,
        GameResult::Draw => value == 0,
        GameResult::Ongoing => false,
    }
}

fn compute_statistics(games: Vec<GameRecord>) -> SelfplayResults {
    let count = |result: GameResult| games.iter().filter(|g| g.result == result).count();

    SelfplayResults {
        total_games: games.len(),
        x_wins: count(GameResult::Won(Player::X)),
        o_wins: count(GameResult::Won(Player::O)),
        draws: count(GameResult::Draw),
        inconsistent: games.iter().filter(|g| !g.consistent).count(),
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

fn print_text_results(results: &SelfplayResults) {
    let total = results.total_games;

    println!("\n=== Selfplay Results ===");
    println!("Total games: {}", total);
    println!("X wins:      {} ({:.1}%)", results.x_wins, percent(results.x_wins, total));
    println!("O wins:      {} ({:.1}%)", results.o_wins, percent(results.o_wins, total));
    println!("Draws:       {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Inconsistent: {}", results.inconsistent);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} (value {:+}) -> {:?} in {} engine moves",
            game.game_number,
            game.opening,
            game.opening_value,
            game.result,
            game.moves.len()
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(vec![]);
        assert_eq!(results.total_games, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_no_random_plies_is_a_draw() {
        let record = play_single_game(1, 0, 42);
        assert_eq!(record.opening, ".........");
        assert_eq!(record.result, GameResult::Draw);
        assert_eq!(record.opening_value, 0);
        assert!(record.consistent);
    }

    #[test]
    fn test_random_openings_are_realized() {
        for seed in 0..20 {
            let record = play_single_game(1, 3, seed);
            assert!(record.consistent, "game from {} was not consistent", record.opening);
        }
    }

    #[test]
    fn test_random_opening_deterministic() {
        let mut rng1 = ChaCha8Rng::seed_from_u64(42);
        let mut rng2 = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(random_opening(4, &mut rng1), random_opening(4, &mut rng2));
    }

    #[test]
    fn test_outcome_matches_value() {
        assert!(outcome_matches_value(GameResult::Won(Player::X), Player::X, 7));
        assert!(!outcome_matches_value(GameResult::Won(Player::X), Player::O, 7));
        assert!(outcome_matches_value(GameResult::Won(Player::X), Player::O, -7));
        assert!(outcome_matches_value(GameResult::Draw, Player::X, 0));
    }
}
