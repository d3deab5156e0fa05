//! Recursive-descent parser producing a [`GameTree`].
//!
//! ```text
//! Collection   := GameTree*
//! GameTree     := '(' NodeSequence Collection ')'
//! NodeSequence := Node*
//! Node         := ';' (Identifier Value*)*
//! ```
//!
//! Nodes of a sequence are chained parent to child. Game trees nested after
//! a sequence hang below its last node, which is how variations attach.
//! Property values that fail their grammar do not stop the parse; only
//! structural problems do.

use std::fmt;

use log::debug;

use crate::sgf::property::{PropEntry, PropIdent};
use crate::sgf::token::{Token, TokenKind, Tokenizer};
use crate::tree::{GameNode, GameTree, NodeId};

/// What went wrong structurally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `[` without a matching unescaped `]`
    UnterminatedValue,
    /// A character that starts no token
    UnexpectedChar(char),
    /// `(` not followed by at least one node
    EmptyGameTree,
    /// A different token was required here
    Expected {
        expected: TokenKind,
        found: TokenKind,
    },
}

/// A fatal parse error with its byte position and a short excerpt of the
/// input that was not consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub excerpt: String,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnterminatedValue => write!(f, "unterminated property value"),
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {c:?}"),
            ParseErrorKind::EmptyGameTree => write!(f, "game tree without nodes"),
            ParseErrorKind::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error at {}: {} (rest: '{}')",
            self.position, self.kind, self.excerpt
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a whole document. Every game tree in the collection becomes a
/// child of the tree's super-root; the first one is selected as the root.
pub fn parse(text: &str) -> Result<GameTree, ParseError> {
    let mut parser = Parser::new(text);
    let mut tree = GameTree::new();
    let top = tree.super_root();
    parser.read_collection(&mut tree, top)?;
    parser.consume(TokenKind::Eof)?;
    tree.reset_indexes();
    debug!(
        "parsed {} bytes into {} game tree(s)",
        text.len(),
        tree.node(top).children().len()
    );
    Ok(tree)
}

struct Parser<'a> {
    tokens: Tokenizer<'a>,
    /// One token of pushback
    cache: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: Tokenizer::new(text),
            cache: None,
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        match self.cache.take() {
            Some(token) => Ok(token),
            None => self.tokens.next_token(),
        }
    }

    fn push_back(&mut self, token: Token) {
        debug_assert!(self.cache.is_none(), "pushback slot already used");
        self.cache = Some(token);
    }

    /// Take the next token if it has `kind`, otherwise leave it unread.
    fn read(&mut self, kind: TokenKind) -> Result<Option<Token>, ParseError> {
        let token = self.next_token()?;
        if token.kind() == kind {
            return Ok(Some(token));
        }
        if token != Token::Eof {
            self.push_back(token);
        }
        Ok(None)
    }

    /// Require the next token to have `kind`.
    fn consume(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let found = self.next_token()?.kind();
        if found != kind {
            return Err(self.tokens.error(ParseErrorKind::Expected {
                expected: kind,
                found,
            }));
        }
        Ok(())
    }

    /// Read game trees below `top` until no `(` follows.
    ///
    /// Open game trees are kept on an explicit stack, each entry holding the
    /// node its own game tree hangs below, so nesting depth is bounded by
    /// memory rather than by the call stack.
    fn read_collection(&mut self, tree: &mut GameTree, top: NodeId) -> Result<(), ParseError> {
        let mut open: Vec<NodeId> = Vec::new();
        let mut parent = top;
        loop {
            if self.read(TokenKind::LeftParen)?.is_some() {
                let last = self.read_sequence(tree, parent)?;
                open.push(parent);
                parent = last;
                continue;
            }
            let Some(outer) = open.pop() else {
                return Ok(());
            };
            self.consume(TokenKind::RightParen)?;
            parent = outer;
        }
    }

    /// Chain the nodes of one sequence below `parent`; returns the last one.
    fn read_sequence(&mut self, tree: &mut GameTree, parent: NodeId) -> Result<NodeId, ParseError> {
        let mut last = None;
        let mut node = parent;
        while let Some(child) = self.read_node(tree, node)? {
            last = Some(child);
            node = child;
        }
        last.ok_or_else(|| self.tokens.error(ParseErrorKind::EmptyGameTree))
    }

    fn read_node(
        &mut self,
        tree: &mut GameTree,
        parent: NodeId,
    ) -> Result<Option<NodeId>, ParseError> {
        if self.read(TokenKind::Semicolon)?.is_none() {
            return Ok(None);
        }

        let mut node = GameNode::new();
        while let Some(Token::Ident(name)) = self.read(TokenKind::Ident)? {
            let mut blocks = Vec::new();
            while let Some(Token::Block(block)) = self.read(TokenKind::Block)? {
                blocks.push(block);
            }
            let ident = PropIdent::from_name(&name);
            let entry = PropEntry::from_blocks(&ident, blocks);
            if entry.is_failed() {
                debug!("property {ident} kept unparsed at byte {}", self.tokens.position());
            }
            node.set_entry(ident, entry);
        }
        Ok(Some(tree.add_child(parent, node)))
    }
}
