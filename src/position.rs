//! Go rules: move legality, captures, ko, and territory scoring.
//!
//! [`RuleEngine`] owns the board together with the game counters. Every
//! move is evaluated on a scratch copy of the board and only committed once
//! it is known to be legal, so a rejected move never touches the real state.
//!
//! The ko rule only forbids an immediate single-stone recapture at the
//! remembered point; whole-board repetition is not tracked.

use log::trace;

use crate::board::{Board, ScanTable, StoneType};
use crate::point::Point;
use crate::scan::{DIRECTIONS, Scanner};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// Point is off the board
    OutOfRange,
    /// Point is not empty
    Occupied,
    /// Move retakes a ko immediately
    Ko,
    /// Move would leave its own group without liberties
    Suicide,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::OutOfRange => write!(f, "illegal move: point is off the board"),
            MoveError::Occupied => write!(f, "illegal move: point not empty"),
            MoveError::Ko => write!(f, "illegal move: retakes ko"),
            MoveError::Suicide => write!(f, "illegal move: suicide"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Board plus game counters for one board size.
#[derive(Clone, Debug)]
pub struct RuleEngine {
    board: Board,
    /// Color to play next
    next_stone: StoneType,
    /// Point of the single stone captured by the last move, if any
    ko: Option<Point>,
    /// Stones captured by Black
    black_prisoners: usize,
    /// Stones captured by White
    white_prisoners: usize,
    /// Moves and passes played
    count: usize,

    scanner: Scanner,
    removed: ScanTable,
    scratch: Board,
}

impl RuleEngine {
    pub fn new(size: usize) -> Self {
        Self {
            board: Board::new(size),
            next_stone: StoneType::Black,
            ko: None,
            black_prisoners: 0,
            white_prisoners: 0,
            count: 0,
            scanner: Scanner::new(size),
            removed: ScanTable::new(size),
            scratch: Board::new(size),
        }
    }

    /// Reset to an empty board with Black to play.
    pub fn clear(&mut self) {
        self.board.clear();
        self.next_stone = StoneType::Black;
        self.ko = None;
        self.black_prisoners = 0;
        self.white_prisoners = 0;
        self.count = 0;
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn next_stone(&self) -> StoneType {
        self.next_stone
    }

    /// Override the color to play. Ignored for `Empty` or the current color;
    /// an actual change forgets the ko point.
    pub fn set_next_stone(&mut self, stone: StoneType) {
        if stone.exists() && stone != self.next_stone {
            self.ko = None;
            self.next_stone = stone;
        }
    }

    pub fn ko(&self) -> Option<Point> {
        self.ko
    }

    /// Number of moves and passes played since the last [`clear`](Self::clear).
    pub fn move_count(&self) -> usize {
        self.count
    }

    pub fn prisoners(&self, stone: StoneType) -> usize {
        match stone {
            StoneType::Black => self.black_prisoners,
            StoneType::White => self.white_prisoners,
            StoneType::Empty => 0,
        }
    }

    pub fn stone(&self, x: i32, y: i32) -> Option<StoneType> {
        self.board.get(x, y)
    }

    /// Edit the board directly, bypassing capture, ko, and suicide checks.
    ///
    /// Always forgets the ko point. Returns false off the board.
    pub fn set_stone(&mut self, x: i32, y: i32, stone: StoneType) -> bool {
        if !self.board.set(x, y, stone) {
            return false;
        }
        self.ko = None;
        true
    }

    /// Pass: the other color plays next and the ko point is forgotten.
    pub fn pass(&mut self) {
        self.next_stone = self.next_stone.reverse();
        self.count += 1;
        self.ko = None;
    }

    /// Play the next color at `(x, y)`.
    ///
    /// Returns the number of stones captured. On error the engine is left
    /// exactly as it was.
    pub fn put_stone(&mut self, x: i32, y: i32) -> Result<usize, MoveError> {
        let stone = self.next_stone;
        let opponent = stone.reverse();

        match self.board.get(x, y) {
            None => return Err(MoveError::OutOfRange),
            Some(StoneType::Empty) => {}
            Some(_) => return Err(MoveError::Occupied),
        }

        self.scratch.copy_from(&self.board);
        self.scratch.set(x, y, stone);

        // Opponent groups next to the new stone that have no liberty left.
        self.removed.clear();
        for (dx, dy) in DIRECTIONS {
            let group = self.scanner.scan(
                x + dx,
                y + dy,
                &self.scratch,
                opponent,
                StoneType::Empty,
            );
            self.removed.merge(group);
        }
        let captured = self.removed.count();

        if self.ko == Some(Point::new(x, y)) && captured == 1 {
            trace!("rejecting ko recapture at ({x}, {y})");
            return Err(MoveError::Ko);
        }

        for (rx, ry) in self.removed.marked() {
            self.scratch.set(rx, ry, StoneType::Empty);
        }

        if self
            .scanner
            .scan(x, y, &self.scratch, stone, StoneType::Empty)
            .is_enabled()
        {
            trace!("rejecting suicide at ({x}, {y})");
            return Err(MoveError::Suicide);
        }

        self.board.copy_from(&self.scratch);
        self.ko = if captured == 1 {
            self.removed.marked().next().map(|(kx, ky)| Point::new(kx, ky))
        } else {
            None
        };
        match stone {
            StoneType::Black => self.black_prisoners += captured,
            StoneType::White => self.white_prisoners += captured,
            StoneType::Empty => {}
        }
        self.next_stone = opponent;
        self.count += 1;
        Ok(captured)
    }

    /// Empty points enclosed by `stone` alone.
    ///
    /// An empty board has no territory for either color. Uses its own
    /// scanner so that scoring works through a shared reference.
    pub fn territory(&self, stone: StoneType) -> ScanTable {
        let opponent = stone.reverse();
        let size = self.board.size() as i32;
        let mut result = ScanTable::new(self.board.size());
        let mut scanner = Scanner::new(self.board.size());

        if self.board.count(StoneType::Black) == 0 && self.board.count(StoneType::White) == 0 {
            return result;
        }

        for y in 0..size {
            for x in 0..size {
                if result.is_marked(x, y) || self.board.get(x, y) != Some(StoneType::Empty) {
                    continue;
                }
                let region = scanner.scan(x, y, &self.board, StoneType::Empty, opponent);
                result.merge(region);
            }
        }
        result
    }

    /// Territory plus prisoners for `stone`.
    pub fn score(&self, stone: StoneType) -> usize {
        self.territory(stone).count() + self.prisoners(stone)
    }
}
