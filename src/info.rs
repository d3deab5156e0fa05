//! Game information read from the root node.

use std::fmt;

use crate::sgf::property::{PropIdent, PropValue};
use crate::tree::GameTree;

/// Summary of the root's game-info properties. Absent or unparsable
/// values are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameInfo {
    pub black: Option<String>,
    pub black_rank: Option<String>,
    pub white: Option<String>,
    pub white_rank: Option<String>,
    pub result: Option<String>,
    pub komi: Option<f64>,
    pub date: Option<String>,
    pub event: Option<String>,
    pub game_name: Option<String>,
    pub size: Option<i64>,
}

impl GameInfo {
    pub fn from_tree(tree: &GameTree) -> Self {
        let Some(root) = tree.root() else {
            return Self::default();
        };
        let node = tree.node(root);
        let text = |ident: PropIdent| {
            node.get(&ident)
                .and_then(PropValue::as_text)
                .map(str::to_string)
        };
        Self {
            black: text(PropIdent::PlayerBlack),
            black_rank: text(PropIdent::BlackRank),
            white: text(PropIdent::PlayerWhite),
            white_rank: text(PropIdent::WhiteRank),
            result: text(PropIdent::Result),
            komi: node.get(&PropIdent::Komi).and_then(PropValue::as_real),
            date: text(PropIdent::Date).map(|d| normalize_date(&d)),
            event: text(PropIdent::Event),
            game_name: text(PropIdent::GameName),
            size: node.get(&PropIdent::Size).and_then(PropValue::as_number),
        }
    }
}

/// Rewrite the first `YYYY-MM-DD` style date in `s` as `YYYY/MM/DD`.
///
/// Separators may be `-`, `/` or `:`, each optionally preceded by a
/// backslash. Anything else is returned unchanged.
pub fn normalize_date(s: &str) -> String {
    let b = s.as_bytes();
    (0..b.len())
        .find_map(|start| match_date(&b[start..]))
        .unwrap_or_else(|| s.to_string())
}

fn match_date(b: &[u8]) -> Option<String> {
    let mut i = 0;
    let year = digits(b, &mut i, 4)?;
    separator(b, &mut i)?;
    let month = digits(b, &mut i, 2)?;
    separator(b, &mut i)?;
    let day = digits(b, &mut i, 2)?;
    Some(format!("{year}/{month}/{day}"))
}

fn digits<'a>(b: &'a [u8], i: &mut usize, n: usize) -> Option<&'a str> {
    let run = b.get(*i..*i + n)?;
    if !run.iter().all(u8::is_ascii_digit) {
        return None;
    }
    *i += n;
    std::str::from_utf8(run).ok()
}

fn separator(b: &[u8], i: &mut usize) -> Option<()> {
    if b.get(*i) == Some(&b'\\') {
        *i += 1;
    }
    match b.get(*i) {
        Some(b'-' | b'/' | b':') => {
            *i += 1;
            Some(())
        }
        _ => None,
    }
}

fn player(name: &Option<String>, rank: &Option<String>) -> String {
    let name = name.as_deref().unwrap_or("?");
    match rank {
        Some(rank) => format!("{name} ({rank})"),
        None => name.to_string(),
    }
}

impl fmt::Display for GameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.game_name {
            writeln!(f, "{name}")?;
        }
        if let Some(event) = &self.event {
            writeln!(f, "event: {event}")?;
        }
        writeln!(f, "black: {}", player(&self.black, &self.black_rank))?;
        writeln!(f, "white: {}", player(&self.white, &self.white_rank))?;
        if let Some(date) = &self.date {
            writeln!(f, "date: {date}")?;
        }
        if let Some(komi) = self.komi {
            writeln!(f, "komi: {komi}")?;
        }
        if let Some(size) = self.size {
            writeln!(f, "size: {size}")?;
        }
        if let Some(result) = &self.result {
            writeln!(f, "result: {result}")?;
        }
        Ok(())
    }
}
