use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SIZE: usize = 4;
pub const WIN_TILE: u32 = 2048;
const FOUR_CHANCE: f64 = 0.1;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ]
    }

    fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    // Lines are read starting from the edge the tiles slide toward.
    fn is_reversed(self) -> bool {
        matches!(self, Direction::Down | Direction::Right)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("unknown direction: {s}")),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Outcome of sliding a single line toward index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineMove {
    pub line: [u32; SIZE],
    pub moved: bool,
    pub score: u32,
}

/// Compacts a line toward index 0 and merges equal neighbours in one pass.
///
/// A tile produced by a merge is never merged again during the same pass, so
/// `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`. The returned score is the sum of all
/// merged values.
pub fn slide_and_merge(line: [u32; SIZE]) -> LineMove {
    let mut out = [0u32; SIZE];
    let mut len = 0;
    let mut score = 0;
    let mut pending: Option<u32> = None;

    for value in line.into_iter().filter(|&v| v != 0) {
        match pending {
            Some(prev) if prev == value => {
                let merged = prev * 2;
                out[len] = merged;
                len += 1;
                score += merged;
                pending = None;
            }
            Some(prev) => {
                out[len] = prev;
                len += 1;
                pending = Some(value);
            }
            None => pending = Some(value),
        }
    }
    if let Some(prev) = pending {
        out[len] = prev;
    }

    LineMove {
        line: out,
        moved: out != line,
        score,
    }
}

/// Result of shifting a whole board in one direction, before any spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardMove {
    pub board: Board,
    pub moved: bool,
    pub score: u32,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [[u32; SIZE]; SIZE],
}

impl Board {
    pub const EMPTY: Board = Board {
        cells: [[0; SIZE]; SIZE],
    };

    pub fn from_rows(cells: [[u32; SIZE]; SIZE]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[[u32; SIZE]; SIZE] {
        &self.cells
    }

    pub fn get(&self, pos: Position) -> u32 {
        self.cells[pos.row][pos.col]
    }

    pub fn set(&mut self, pos: Position, value: u32) {
        self.cells[pos.row][pos.col] = value;
    }

    pub fn positions() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position::new(row, col)))
    }

    pub fn empty_cells(&self) -> Vec<Position> {
        Self::positions().filter(|&p| self.get(p) == 0).collect()
    }

    pub fn occupied_count(&self) -> usize {
        Self::positions().filter(|&p| self.get(p) != 0).count()
    }

    pub fn max_tile(&self) -> u32 {
        self.cells.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn contains(&self, value: u32) -> bool {
        self.cells.iter().flatten().any(|&v| v == value)
    }

    fn line(&self, dir: Direction, index: usize) -> [u32; SIZE] {
        let mut line = [0u32; SIZE];
        for (i, slot) in line.iter_mut().enumerate() {
            *slot = self.get(line_position(dir, index, i));
        }
        line
    }

    fn set_line(&mut self, dir: Direction, index: usize, line: [u32; SIZE]) {
        for (i, value) in line.into_iter().enumerate() {
            self.set(line_position(dir, index, i), value);
        }
    }

    /// Slides every line toward `dir`. Does not spawn.
    pub fn shift(&self, dir: Direction) -> BoardMove {
        let mut board = *self;
        let mut moved = false;
        let mut score = 0;
        for index in 0..SIZE {
            let result = slide_and_merge(self.line(dir, index));
            if result.moved {
                moved = true;
                board.set_line(dir, index, result.line);
                score += result.score;
            }
        }
        BoardMove {
            board,
            moved,
            score,
        }
    }

    /// Places a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    /// Returns `None` when the board is full.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Position> {
        let empties = self.empty_cells();
        let pos = *empties.choose(rng)?;
        let value = if rng.gen_bool(FOUR_CHANCE) { 4 } else { 2 };
        self.set(pos, value);
        Some(pos)
    }

    pub fn is_game_over(&self) -> bool {
        if self.cells.iter().flatten().any(|&v| v == 0) {
            return false;
        }
        for row in 0..SIZE {
            for col in 0..SIZE {
                let current = self.cells[row][col];
                if (row + 1 < SIZE && self.cells[row + 1][col] == current)
                    || (col + 1 < SIZE && self.cells[row][col + 1] == current)
                {
                    return false;
                }
            }
        }
        true
    }

    /// True when the tile at `pos` has an equal orthogonal neighbour.
    pub fn can_merge_at(&self, pos: Position) -> bool {
        let value = self.get(pos);
        if value == 0 {
            return false;
        }
        let Position { row, col } = pos;
        (row > 0 && self.cells[row - 1][col] == value)
            || (row + 1 < SIZE && self.cells[row + 1][col] == value)
            || (col > 0 && self.cells[row][col - 1] == value)
            || (col + 1 < SIZE && self.cells[row][col + 1] == value)
    }

    pub fn hint_cells(&self) -> [[bool; SIZE]; SIZE] {
        let mut hints = [[false; SIZE]; SIZE];
        for pos in Self::positions() {
            hints[pos.row][pos.col] = self.can_merge_at(pos);
        }
        hints
    }
}

fn line_position(dir: Direction, index: usize, offset: usize) -> Position {
    let along = if dir.is_reversed() {
        SIZE - 1 - offset
    } else {
        offset
    };
    if dir.is_vertical() {
        Position::new(along, index)
    } else {
        Position::new(index, along)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (col, &value) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>5}", ".")?;
                } else {
                    write!(f, "{:>5}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
