//! Plain grid containers used by the rule engine.
//!
//! [`Board`] holds stone states and [`ScanTable`] is the flood-fill work
//! buffer. Both use signed coordinates so that callers can look at neighbors
//! of edge points without checking bounds first: reads outside the grid
//! return `None` and writes outside it are ignored.

use std::fmt;

/// State of a single board point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum StoneType {
    #[default]
    Empty,
    Black,
    White,
}

impl StoneType {
    /// Swap Black and White; `Empty` stays `Empty`.
    pub fn reverse(self) -> Self {
        match self {
            StoneType::Black => StoneType::White,
            StoneType::White => StoneType::Black,
            StoneType::Empty => StoneType::Empty,
        }
    }

    /// True for an actual stone color.
    pub fn exists(self) -> bool {
        self != StoneType::Empty
    }
}

impl fmt::Display for StoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoneType::Empty => write!(f, "empty"),
            StoneType::Black => write!(f, "black"),
            StoneType::White => write!(f, "white"),
        }
    }
}

/// A square grid of stone states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<StoneType>,
}

impl Board {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![StoneType::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_out_of_range(x, y) {
            return None;
        }
        Some(y as usize * self.size + x as usize)
    }

    pub fn is_out_of_range(&self, x: i32, y: i32) -> bool {
        x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size
    }

    /// Stone at `(x, y)`, or `None` when the point is off the board.
    pub fn get(&self, x: i32, y: i32) -> Option<StoneType> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Place `stone` at `(x, y)`. Returns false (and does nothing) off the board.
    pub fn set(&mut self, x: i32, y: i32, stone: StoneType) -> bool {
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = stone;
                true
            }
            None => false,
        }
    }

    /// Number of points holding `stone`.
    pub fn count(&self, stone: StoneType) -> usize {
        self.cells.iter().filter(|&&c| c == stone).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(StoneType::Empty);
    }

    /// Overwrite this board with `other`. Boards of different size are left alone.
    pub fn copy_from(&mut self, other: &Board) {
        if self.size != other.size {
            return;
        }
        self.cells.copy_from_slice(&other.cells);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size as i32 {
            for x in 0..self.size as i32 {
                let ch = match self.get(x, y) {
                    Some(StoneType::Black) => 'X',
                    Some(StoneType::White) => 'O',
                    _ => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-point marks plus an `enabled` flag.
///
/// A scan disables its table when it touches the abort color; see
/// [`crate::scan::Scanner`] for how the flag is interpreted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTable {
    size: usize,
    marks: Vec<bool>,
    enabled: bool,
}

impl ScanTable {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            marks: vec![false; size * size],
            enabled: true,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return None;
        }
        Some(y as usize * self.size + x as usize)
    }

    pub fn mark(&mut self, x: i32, y: i32) {
        if let Some(i) = self.idx(x, y) {
            self.marks[i] = true;
        }
    }

    pub fn is_marked(&self, x: i32, y: i32) -> bool {
        self.idx(x, y).is_some_and(|i| self.marks[i])
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// OR `other` into this table. Disabled or differently sized tables are ignored.
    pub fn merge(&mut self, other: &ScanTable) {
        if !other.enabled || other.size != self.size {
            return;
        }
        for (mine, &theirs) in self.marks.iter_mut().zip(&other.marks) {
            *mine |= theirs;
        }
    }

    pub fn count(&self) -> usize {
        self.marks.iter().filter(|&&m| m).count()
    }

    /// Unmark everything and re-enable.
    pub fn clear(&mut self) {
        self.marks.fill(false);
        self.enabled = true;
    }

    /// Marked points in row-major order.
    pub fn marked(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let size = self.size;
        self.marks
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(move |(i, _)| ((i % size) as i32, (i / size) as i32))
    }
}
