//! Property identifiers and typed property values.
//!
//! Each known identifier has a fixed [`ValueKind`]. Bracket blocks read for
//! a known identifier are parsed into a [`PropValue`]; when that fails the
//! blocks are kept untouched as [`PropEntry::ParseFailed`]. Identifiers this
//! crate does not know are kept as [`PropEntry::NotParsed`].

use std::fmt;

use crate::point::Point;

/// A property identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropIdent {
    // Moves
    Black,
    White,
    Ko,
    MoveNumber,
    // Setup
    AddBlack,
    AddEmpty,
    AddWhite,
    // Comments
    Comment,
    GameComment,
    // Root and game information
    Charset,
    FileFormat,
    Game,
    Style,
    Size,
    Annotator,
    BlackRank,
    BlackTeam,
    Copyright,
    Date,
    Event,
    GameName,
    Opening,
    Overtime,
    PlayerBlack,
    Place,
    PlayerWhite,
    Result,
    Round,
    Rules,
    Source,
    TimeLimit,
    User,
    WhiteRank,
    WhiteTeam,
    Komi,
    // Timing
    BlackTimeLeft,
    WhiteTimeLeft,
    OtStonesBlack,
    OtStonesWhite,
    /// Anything else, kept verbatim
    Unknown(String),
}

/// The value grammar of a property.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// One point; an empty value is a pass
    Point,
    /// A list of points, compressed `aa:cc` rectangles allowed
    PointList,
    Number,
    Real,
    /// Single-line text
    SimpleText,
    /// Multi-line text
    Text,
}

impl PropIdent {
    pub fn from_name(name: &str) -> PropIdent {
        match name {
            "B" => PropIdent::Black,
            "W" => PropIdent::White,
            "KO" => PropIdent::Ko,
            "MN" => PropIdent::MoveNumber,
            "AB" => PropIdent::AddBlack,
            "AE" => PropIdent::AddEmpty,
            "AW" => PropIdent::AddWhite,
            "C" => PropIdent::Comment,
            "GC" => PropIdent::GameComment,
            "CA" => PropIdent::Charset,
            "FF" => PropIdent::FileFormat,
            "GM" => PropIdent::Game,
            "ST" => PropIdent::Style,
            "SZ" => PropIdent::Size,
            "AN" => PropIdent::Annotator,
            "BR" => PropIdent::BlackRank,
            "BT" => PropIdent::BlackTeam,
            "CP" => PropIdent::Copyright,
            "DT" => PropIdent::Date,
            "EV" => PropIdent::Event,
            "GN" => PropIdent::GameName,
            "ON" => PropIdent::Opening,
            "OT" => PropIdent::Overtime,
            "PB" => PropIdent::PlayerBlack,
            "PC" => PropIdent::Place,
            "PW" => PropIdent::PlayerWhite,
            "RE" => PropIdent::Result,
            "RO" => PropIdent::Round,
            "RU" => PropIdent::Rules,
            "SO" => PropIdent::Source,
            "TM" => PropIdent::TimeLimit,
            "US" => PropIdent::User,
            "WR" => PropIdent::WhiteRank,
            "WT" => PropIdent::WhiteTeam,
            "KM" => PropIdent::Komi,
            "BL" => PropIdent::BlackTimeLeft,
            "WL" => PropIdent::WhiteTimeLeft,
            "OB" => PropIdent::OtStonesBlack,
            "OW" => PropIdent::OtStonesWhite,
            other => PropIdent::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropIdent::Black => "B",
            PropIdent::White => "W",
            PropIdent::Ko => "KO",
            PropIdent::MoveNumber => "MN",
            PropIdent::AddBlack => "AB",
            PropIdent::AddEmpty => "AE",
            PropIdent::AddWhite => "AW",
            PropIdent::Comment => "C",
            PropIdent::GameComment => "GC",
            PropIdent::Charset => "CA",
            PropIdent::FileFormat => "FF",
            PropIdent::Game => "GM",
            PropIdent::Style => "ST",
            PropIdent::Size => "SZ",
            PropIdent::Annotator => "AN",
            PropIdent::BlackRank => "BR",
            PropIdent::BlackTeam => "BT",
            PropIdent::Copyright => "CP",
            PropIdent::Date => "DT",
            PropIdent::Event => "EV",
            PropIdent::GameName => "GN",
            PropIdent::Opening => "ON",
            PropIdent::Overtime => "OT",
            PropIdent::PlayerBlack => "PB",
            PropIdent::Place => "PC",
            PropIdent::PlayerWhite => "PW",
            PropIdent::Result => "RE",
            PropIdent::Round => "RO",
            PropIdent::Rules => "RU",
            PropIdent::Source => "SO",
            PropIdent::TimeLimit => "TM",
            PropIdent::User => "US",
            PropIdent::WhiteRank => "WR",
            PropIdent::WhiteTeam => "WT",
            PropIdent::Komi => "KM",
            PropIdent::BlackTimeLeft => "BL",
            PropIdent::WhiteTimeLeft => "WL",
            PropIdent::OtStonesBlack => "OB",
            PropIdent::OtStonesWhite => "OW",
            PropIdent::Unknown(name) => name,
        }
    }

    /// Value grammar, or `None` for unknown identifiers.
    pub fn kind(&self) -> Option<ValueKind> {
        use PropIdent::*;
        let kind = match self {
            Black | White | Ko | MoveNumber => ValueKind::Point,
            AddBlack | AddEmpty | AddWhite => ValueKind::PointList,
            Comment | GameComment => ValueKind::Text,
            FileFormat | Game | Style | Size | OtStonesBlack | OtStonesWhite => ValueKind::Number,
            TimeLimit | BlackTimeLeft | WhiteTimeLeft | Komi => ValueKind::Real,
            Charset | Annotator | BlackRank | BlackTeam | Copyright | Date | Event | GameName
            | Opening | Overtime | PlayerBlack | Place | PlayerWhite | Result | Round | Rules
            | Source | User | WhiteRank | WhiteTeam => ValueKind::SimpleText,
            Unknown(_) => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for PropIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successfully parsed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    Point(Point),
    PointList(Vec<Point>),
    Number(i64),
    Real(f64),
    SimpleText(String),
    Text(String),
}

impl PropValue {
    /// Parse `blocks` with the grammar of `kind`.
    ///
    /// Every kind except [`ValueKind::PointList`] requires exactly one block.
    pub fn parse(kind: ValueKind, blocks: &[String]) -> Option<PropValue> {
        if kind == ValueKind::PointList {
            let mut points = Vec::new();
            for block in blocks {
                parse_point_block(block, &mut points)?;
            }
            return Some(PropValue::PointList(points));
        }

        let [block] = blocks else {
            return None;
        };
        match kind {
            ValueKind::Point => Point::parse(block).map(PropValue::Point),
            ValueKind::Number => parse_number(block).map(PropValue::Number),
            ValueKind::Real => parse_real(block).map(PropValue::Real),
            ValueKind::SimpleText => Some(PropValue::SimpleText(
                block.replace(['\t', '\u{b}', '\n', '\r'], " "),
            )),
            ValueKind::Text => Some(PropValue::Text(block.replace(['\t', '\u{b}'], " "))),
            ValueKind::PointList => None,
        }
    }

    /// Unescaped text of each block this value is written as.
    pub fn blocks(&self) -> Vec<String> {
        match self {
            PropValue::Point(p) => vec![p.to_string()],
            PropValue::PointList(points) => points.iter().map(Point::to_string).collect(),
            PropValue::Number(n) => vec![n.to_string()],
            PropValue::Real(r) => vec![r.to_string()],
            PropValue::SimpleText(s) | PropValue::Text(s) => vec![s.clone()],
        }
    }

    pub fn as_point(&self) -> Option<Point> {
        match self {
            PropValue::Point(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            PropValue::PointList(points) => Some(points),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            PropValue::Real(r) => Some(*r),
            PropValue::Number(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::SimpleText(s) | PropValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A property as stored on a node.
#[derive(Clone, Debug, PartialEq)]
pub enum PropEntry {
    /// Raw blocks of an identifier with no known grammar
    NotParsed(Vec<String>),
    Parsed(PropValue),
    /// Raw blocks that did not match the identifier's grammar
    ParseFailed(Vec<String>),
}

impl PropEntry {
    /// Build the entry for `ident` from the blocks read after it.
    pub fn from_blocks(ident: &PropIdent, blocks: Vec<String>) -> PropEntry {
        match ident.kind() {
            None => PropEntry::NotParsed(blocks),
            Some(kind) => match PropValue::parse(kind, &blocks) {
                Some(value) => PropEntry::Parsed(value),
                None => PropEntry::ParseFailed(blocks),
            },
        }
    }

    pub fn value(&self) -> Option<&PropValue> {
        match self {
            PropEntry::Parsed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PropEntry::ParseFailed(_))
    }

    /// Bracketed form, e.g. `[dd][pp]`. No blocks render as `[]`.
    pub fn to_sgf(&self) -> String {
        let blocks = match self {
            PropEntry::Parsed(value) => value.blocks(),
            PropEntry::NotParsed(raw) | PropEntry::ParseFailed(raw) => raw.clone(),
        };
        if blocks.is_empty() {
            return "[]".to_string();
        }
        blocks
            .iter()
            .map(|b| format!("[{}]", escape(b)))
            .collect()
    }
}

/// Escape `]`, and keep a trailing backslash from escaping the closing bracket.
pub fn escape(s: &str) -> String {
    let mut out = s.replace(']', "\\]");
    if out.ends_with('\\') {
        out.push(' ');
    }
    out
}

/// Undo [`escape`] for a raw block: `\]` becomes `]`, everything else is kept.
pub fn unescape(s: &str) -> String {
    s.replace("\\]", "]")
}

/// Append the points of one list block. An empty block adds nothing.
fn parse_point_block(block: &str, out: &mut Vec<Point>) -> Option<()> {
    if block.is_empty() {
        return Some(());
    }
    match block.split_once(':') {
        None => out.push(Point::parse(block)?),
        Some((from, to)) => {
            let a = Point::parse(from)?;
            let b = Point::parse(to)?;
            if a.is_pass() || b.is_pass() {
                return None;
            }
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    out.push(Point::new(x, y));
                }
            }
        }
    }
    Some(())
}

fn split_sign(s: &str) -> &str {
    s.strip_prefix(['+', '-']).unwrap_or(s)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_number(s: &str) -> Option<i64> {
    if !all_digits(split_sign(s)) {
        return None;
    }
    s.parse().ok()
}

fn parse_real(s: &str) -> Option<f64> {
    let unsigned = split_sign(s);
    let valid = match unsigned.split_once('.') {
        None => all_digits(unsigned),
        Some((int, frac)) => all_digits(int) && all_digits(frac),
    };
    if !valid {
        return None;
    }
    s.parse().ok()
}
