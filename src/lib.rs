//! Kifu: Go game records and the rules needed to replay them.
//!
//! Records are read from and written to the bracketed tree notation used
//! by Go software (`(;SZ[19];B[pd];W[dp])`). A [`player::Player`] binds a
//! parsed record to a rule engine and keeps the board in step with the
//! node being viewed.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits and format defaults
//! - [`board`] - Stone colors, the board grid and scan tables
//! - [`point`] - Coordinates and their two-letter encoding
//! - [`scan`] - Flood fill over same-colored regions
//! - [`position`] - Rule engine: captures, ko, suicide, territory
//! - [`sgf`] - Record tokenizer, parser and property values
//! - [`tree`] - Game tree with variations
//! - [`mapper`] - Moves and setup edits as node properties
//! - [`player`] - Record navigation and editing
//! - [`info`] - Game information from the root node
//! - [`playout`] - Random legal games
//! - [`console`] - Text command loop
//!
//! ## Example
//!
//! ```
//! use kifu::board::StoneType;
//! use kifu::player::Player;
//!
//! let mut player = Player::from_sgf("(;GM[1]FF[4]SZ[9];B[ee])").unwrap();
//! player.forward_to_tail();
//! assert_eq!(player.stone(4, 4), Some(StoneType::Black));
//!
//! player.put_stone(2, 6).unwrap();
//! assert_eq!(player.to_sgf(), "(;GM[1]FF[4]SZ[9];B[ee];W[cg])");
//! ```

pub mod board;
pub mod console;
pub mod constants;
pub mod info;
pub mod mapper;
pub mod player;
pub mod playout;
pub mod point;
pub mod position;
pub mod scan;
pub mod sgf;
pub mod tree;
