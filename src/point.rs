//! Board coordinates and moves.
//!
//! Points are written as two letters, `a`-`z` for 0-25 and `A`-`Z` for
//! 26-51, column first. The empty string is a pass.

use std::fmt;

use crate::board::StoneType;
use crate::constants::PASS_COORD;

/// A board coordinate. `(-1, -1)` encodes a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const PASS: Point = Point {
        x: PASS_COORD,
        y: PASS_COORD,
    };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_pass(&self) -> bool {
        self.x < 0 || self.y < 0
    }

    /// Parse a point value. Accepts `""` (pass) or exactly two letters.
    pub fn parse(s: &str) -> Option<Point> {
        if s.is_empty() {
            return Some(Point::PASS);
        }
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let x = letter_to_coord(bytes[0])?;
        let y = letter_to_coord(bytes[1])?;
        Some(Point::new(x, y))
    }
}

/// Renders the two-letter form, or nothing when either coordinate is
/// negative or beyond the encodable range.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(x), Some(y)) = (coord_to_letter(self.x), coord_to_letter(self.y)) {
            write!(f, "{x}{y}")?;
        }
        Ok(())
    }
}

fn letter_to_coord(c: u8) -> Option<i32> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as i32),
        b'A'..=b'Z' => Some((c - b'A') as i32 + 26),
        _ => None,
    }
}

fn coord_to_letter(v: i32) -> Option<char> {
    match v {
        0..=25 => Some((b'a' + v as u8) as char),
        26..=51 => Some((b'A' + (v - 26) as u8) as char),
        _ => None,
    }
}

/// A stone of `stone` color played at `(x, y)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub x: i32,
    pub y: i32,
    pub stone: StoneType,
}

impl Move {
    pub fn new(x: i32, y: i32, stone: StoneType) -> Self {
        Self { x, y, stone }
    }

    pub fn at(point: Point, stone: StoneType) -> Self {
        Self::new(point.x, point.y, stone)
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_pass(&self) -> bool {
        self.x < 0 || self.y < 0
    }
}
