//! Line-oriented command console driving a [`Player`].
//!
//! Each input line holds an optional numeric id, a command and its
//! arguments. Replies start with `=` on success or `?` on failure, followed
//! by the id if one was given, and end with a blank line.
//!
//! ## Commands
//!
//! - `play <point>` / `play pass` - Play the next color (points are two letters, `dd`)
//! - `pass` - Pass for the next color
//! - `add <black|white|empty> <point>` - Setup edit
//! - `turn` - Flip the color to play
//! - `back [n]` / `forward [n]` - Step along the main line
//! - `first` / `last` - Jump to the root or the end of the line
//! - `branch <i>` - Enter variation `i` of the current node
//! - `insert` - Splice an empty node below the current one
//! - `cut` - Delete the current node and its subtree
//! - `show` - Print the board and status
//! - `score` - Territory plus prisoners for both colors
//! - `sgf` - Print the record
//! - `new <size>` - Start an empty record
//! - `list_commands`, `known_command <cmd>`, `quit`

use std::io::{self, BufRead, Write};

use log::debug;

use crate::board::StoneType;
use crate::player::Player;
use crate::point::Point;

const KNOWN_COMMANDS: &[&str] = &[
    "add",
    "back",
    "branch",
    "cut",
    "first",
    "forward",
    "insert",
    "known_command",
    "last",
    "list_commands",
    "new",
    "pass",
    "play",
    "quit",
    "score",
    "sgf",
    "show",
    "turn",
];

pub struct Console {
    player: Player,
}

impl Console {
    pub fn new(player: Player) -> Self {
        Self { player }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Serve commands from `input` until it ends or `quit` is read.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional leading numeric id from the command.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        match line[..end].parse::<u32>() {
            Ok(id) => (Some(id), line[end..].trim()),
            Err(_) => (None, line),
        }
    }

    /// Run one command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        debug!("console command {command} {args:?}");
        match command {
            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(name) => {
                    let known = KNOWN_COMMANDS.contains(&name.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "play" => {
                let Some(vertex) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                if vertex.eq_ignore_ascii_case("pass") {
                    self.player.pass();
                    return (true, String::new());
                }
                let Some(point) = parse_point(vertex) else {
                    return (false, format!("invalid point {vertex}"));
                };
                match self.player.put_stone(point.x, point.y) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "pass" => {
                self.player.pass();
                (true, String::new())
            }

            "add" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                let Some(stone) = parse_color(color) else {
                    return (false, format!("invalid color {color}"));
                };
                let Some(point) = parse_point(vertex) else {
                    return (false, format!("invalid point {vertex}"));
                };
                if self.player.set_stone(point.x, point.y, stone) {
                    (true, String::new())
                } else {
                    (false, "nothing to change".to_string())
                }
            }

            "turn" => {
                self.player.change_stone();
                (true, self.player.next_stone().to_string())
            }

            "back" | "forward" => {
                let n = match args.first().map(|s| s.parse::<usize>()) {
                    None => 1,
                    Some(Ok(n)) => n,
                    Some(Err(_)) => return (false, "invalid count".to_string()),
                };
                let steps = if command == "back" {
                    self.player.back_n(n)
                } else {
                    self.player.forward_n(n)
                };
                (true, steps.to_string())
            }

            "first" => (true, self.player.back_to_head().to_string()),

            "last" => (true, self.player.forward_to_tail().to_string()),

            "branch" => match args.first().map(|s| s.parse::<usize>()) {
                Some(Ok(index)) if self.player.forward_to(index) => (true, String::new()),
                Some(Ok(index)) => (false, format!("no variation {index}")),
                _ => (false, "invalid variation".to_string()),
            },

            "insert" => {
                if self.player.insert_node() {
                    (true, String::new())
                } else {
                    (false, "cannot insert here".to_string())
                }
            }

            "cut" => {
                if self.player.cut() {
                    (true, String::new())
                } else {
                    (false, "cannot cut the root".to_string())
                }
            }

            "show" => (true, format!("\n{}", self.player)),

            "score" => (
                true,
                format!(
                    "black {} white {}",
                    self.player.score(StoneType::Black),
                    self.player.score(StoneType::White)
                ),
            ),

            "sgf" => (true, self.player.to_sgf()),

            "new" => {
                let Some(Ok(size)) = args.first().map(|s| s.parse::<usize>()) else {
                    return (false, "invalid size".to_string());
                };
                match Player::with_size(size) {
                    Ok(player) => {
                        self.player = player;
                        (true, String::new())
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

/// A two-letter point; `pass` or an empty string are not accepted here.
fn parse_point(s: &str) -> Option<Point> {
    if s.is_empty() {
        return None;
    }
    Point::parse(s)
}

fn parse_color(s: &str) -> Option<StoneType> {
    match s.to_lowercase().as_str() {
        "b" | "black" => Some(StoneType::Black),
        "w" | "white" => Some(StoneType::White),
        "e" | "empty" => Some(StoneType::Empty),
        _ => None,
    }
}
