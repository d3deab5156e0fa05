//! Reading and writing the bracketed game-record notation.
//!
//! - [`token`] - Tokenizer
//! - [`parser`] - Recursive-descent parser building a [`GameTree`](crate::tree::GameTree)
//! - [`property`] - Property identifiers, value grammars, escaping
//!
//! Writing lives on the tree itself, see [`GameTree::to_sgf`](crate::tree::GameTree::to_sgf).

pub mod parser;
pub mod property;
pub mod token;

pub use parser::{ParseError, ParseErrorKind, parse};
pub use property::{PropEntry, PropIdent, PropValue, ValueKind};
