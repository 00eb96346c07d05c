//! Pointer-to-cell mapping for the 450x450 canvas front-end

use tictac_core::{Coord, COLS, ROWS};

/// Canvas width and height in pixels
pub const BOARD_SIZE_PX: f64 = 450.0;

/// Side of one cell in pixels
pub const SQUARE_SIZE_PX: f64 = BOARD_SIZE_PX / COLS as f64;

/// Map a point relative to the canvas origin to the cell under it.
/// Points outside the canvas map to nothing.
pub fn cell_at_point(x: f64, y: f64) -> Option<Coord> {
    if !(0.0..BOARD_SIZE_PX).contains(&x) || !(0.0..BOARD_SIZE_PX).contains(&y) {
        return None;
    }
    let col = ((x / SQUARE_SIZE_PX).floor() as usize).min(COLS - 1);
    let row = ((y / SQUARE_SIZE_PX).floor() as usize).min(ROWS - 1);
    Coord::new(row, col).ok()
}
