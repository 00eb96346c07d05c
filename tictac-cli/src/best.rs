//! Best command - engine move for a single position

use anyhow::{Context, Result};
use clap::Args;

use tictac_core::{AlphaBetaAI, Analysis, Board, GameResult, Player};

#[derive(Args)]
pub struct BestArgs {
    /// Position as 9 cells of x, o or '.', row-major (e.g. "x.o/.x./...")
    pub board: String,

    /// Side to move; defaults to whoever is on turn by mark count
    #[arg(long)]
    pub player: Option<String>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: BestArgs) -> Result<()> {
    let board: Board = args
        .board
        .parse()
        .with_context(|| format!("Invalid board: {}", args.board))?;
    let player = match args.player.as_deref() {
        Some(p) => p.parse::<Player>()?,
        None => board.side_to_move(),
    };

    let analysis = AlphaBetaAI::new(player).analyze(&board);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!("{}", format_analysis(&board, &analysis));
    }
    Ok(())
}

fn format_analysis(board: &Board, analysis: &Analysis) -> String {
    let mut out = render_board(board);
    match (analysis.result.mv, board.result()) {
        (Some(mv), _) => out.push_str(&format!(
            "Best move for {}: {} score {:+} ({} nodes, {} cutoffs)",
            analysis.player, mv, analysis.result.score, analysis.stats.nodes, analysis.stats.cutoffs
        )),
        (None, GameResult::Won(winner)) => {
            out.push_str(&format!("Position is decided: {} has won", winner))
        }
        (None, _) => out.push_str("Position is decided: draw"),
    }
    out
}

/// ASCII rendering shared with the play command
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    let rows = board.rows();
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|c| c.symbol().to_ascii_uppercase().to_string())
            .collect();
        out.push_str(&format!(" {} \n", cells.join(" | ")));
        if i + 1 < rows.len() {
            out.push_str("---+---+---\n");
        }
    }
    out
}
