//! 3x3 board state with win and draw detection

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

pub const ROWS: usize = 3;
pub const COLS: usize = 3;

/// Number of cells on the board
pub const CELLS: usize = ROWS * COLS;

/// Every complete line as cell indices (rows, columns, diagonals)
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

// ============================================================================
// CORE TYPES
// ============================================================================

/// Mark held by a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'x',
            Cell::O => 'o',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            '.' | '_' | '-' => Some(Cell::Empty),
            'x' => Some(Cell::X),
            'o' => Some(Cell::O),
            _ => None,
        }
    }
}

/// Player color. X always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// The mark this player places
    pub fn cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

impl FromStr for Player {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Player::X),
            "o" => Ok(Player::O),
            _ => Err(Error::InvalidPlayer(s.to_string())),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    Won(Player),
    Draw,
}

/// A board coordinate. Always in range once constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCoord")]
pub struct Coord {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct RawCoord {
    row: usize,
    col: usize,
}

impl TryFrom<RawCoord> for Coord {
    type Error = Error;

    fn try_from(raw: RawCoord) -> Result<Self> {
        Coord::new(raw.row, raw.col)
    }
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Result<Self> {
        if row >= ROWS || col >= COLS {
            return Err(Error::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// Row-major cell index (0-8)
    pub fn index(self) -> usize {
        self.row * COLS + self.col
    }

    fn from_index(index: usize) -> Self {
        Self {
            row: index / COLS,
            col: index % COLS,
        }
    }

    /// All coordinates in row-major order
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..CELLS).map(Coord::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Fixed 3x3 grid, row-major. Cheap to copy, so searches can work on a
/// private snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[[Cell; COLS]; ROWS]", into = "[[Cell; COLS]; ROWS]")]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds-checked read
    pub fn get(&self, row: usize, col: usize) -> Result<Cell> {
        Ok(self.at(Coord::new(row, col)?))
    }

    /// Bounds-checked write.
    ///
    /// Does not check that the target cell was Empty. Rejecting illegal
    /// moves is the caller's job (see [`crate::GameSession::play`]).
    pub fn set(&mut self, row: usize, col: usize, mark: Cell) -> Result<()> {
        self.put(Coord::new(row, col)?, mark);
        Ok(())
    }

    pub fn at(&self, pos: Coord) -> Cell {
        self.cells[pos.index()]
    }

    pub fn put(&mut self, pos: Coord, mark: Cell) {
        self.cells[pos.index()] = mark;
    }

    /// Clear every cell in place
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELLS];
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| c == Cell::Empty)
    }

    /// True iff `mark` fills a row, a column or a diagonal
    pub fn winner(&self, mark: Cell) -> bool {
        if mark == Cell::Empty {
            return false;
        }
        LINES
            .iter()
            .any(|line| line.iter().all(|&idx| self.cells[idx] == mark))
    }

    pub fn result(&self) -> GameResult {
        if self.winner(Cell::X) {
            GameResult::Won(Player::X)
        } else if self.winner(Cell::O) {
            GameResult::Won(Player::O)
        } else if self.is_full() {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        Coord::all().filter(move |&pos| self.at(pos) == Cell::Empty)
    }

    /// Number of cells holding `mark`
    pub fn count(&self, mark: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == mark).count()
    }

    /// Whose turn it is, assuming X moved first
    pub fn side_to_move(&self) -> Player {
        if self.count(Cell::X) > self.count(Cell::O) {
            Player::O
        } else {
            Player::X
        }
    }

    pub fn rows(&self) -> [[Cell; COLS]; ROWS] {
        let mut rows = [[Cell::Empty; COLS]; ROWS];
        for pos in Coord::all() {
            rows[pos.row()][pos.col()] = self.at(pos);
        }
        rows
    }
}

impl From<[[Cell; COLS]; ROWS]> for Board {
    fn from(rows: [[Cell; COLS]; ROWS]) -> Self {
        let mut board = Board::new();
        for pos in Coord::all() {
            board.put(pos, rows[pos.row()][pos.col()]);
        }
        board
    }
}

impl From<Board> for [[Cell; COLS]; ROWS] {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parse 9 cells of `x`, `o` or `.`, ignoring whitespace, `/` and `|`
    fn from_str(s: &str) -> Result<Self> {
        let mut board = Board::new();
        let mut position = 0;

        for c in s.chars() {
            if c.is_whitespace() || c == '/' || c == '|' {
                continue;
            }
            let cell = Cell::from_symbol(c)
                .ok_or(Error::InvalidCellCharacter { character: c, position })?;
            if position < CELLS {
                board.cells[position] = cell;
            }
            position += 1;
        }

        if position != CELLS {
            return Err(Error::InvalidBoardLength {
                expected: CELLS,
                got: position,
            });
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.cells {
            write!(f, "{}", c.symbol())?;
        }
        Ok(())
    }
}
