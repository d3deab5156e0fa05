//! Flood fill over a [`Board`].
//!
//! One primitive serves both liberty detection and territory detection:
//!
//! - `fillable = color, abort = Empty`: the table stays enabled only if the
//!   group has no liberty.
//! - `fillable = Empty, abort = opponent`: the table stays enabled only if
//!   the empty region never touches the opponent.

use crate::board::{Board, ScanTable, StoneType};

/// Orthogonal neighbor offsets: East, West, North, South.
pub const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, -1), (0, 1)];

/// Reusable flood-fill state: the result table and the work stack.
#[derive(Clone, Debug)]
pub struct Scanner {
    table: ScanTable,
    stack: Vec<(i32, i32)>,
}

impl Scanner {
    pub fn new(size: usize) -> Self {
        Self {
            table: ScanTable::new(size),
            stack: Vec::with_capacity(size * size),
        }
    }

    /// Fill from `(x, y)` across 4-connected points holding `fillable`.
    ///
    /// Any visited point holding `abort` disables the returned table; the
    /// fill still runs to completion. The table is overwritten by the next
    /// call.
    pub fn scan(
        &mut self,
        x: i32,
        y: i32,
        board: &Board,
        fillable: StoneType,
        abort: StoneType,
    ) -> &ScanTable {
        self.table.clear();
        if board.size() != self.table.size() {
            return &self.table;
        }
        self.stack.clear();
        self.stack.push((x, y));

        while let Some((cx, cy)) = self.stack.pop() {
            let Some(stone) = board.get(cx, cy) else {
                continue;
            };
            if self.table.is_marked(cx, cy) {
                continue;
            }
            if stone == abort {
                self.table.disable();
            }
            if stone != fillable {
                continue;
            }
            self.table.mark(cx, cy);
            for (dx, dy) in DIRECTIONS {
                if !self.table.is_marked(cx + dx, cy + dy) {
                    self.stack.push((cx + dx, cy + dy));
                }
            }
        }
        &self.table
    }
}
