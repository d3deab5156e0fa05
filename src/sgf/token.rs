//! Tokenizer for the bracketed tree notation.

use std::fmt;

use crate::constants::EXCERPT_LEN;
use crate::sgf::parser::{ParseError, ParseErrorKind};
use crate::sgf::property::unescape;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Eof,
    LeftParen,
    RightParen,
    Semicolon,
    /// A run of uppercase letters
    Ident(String),
    /// Contents of a `[...]` block with `\]` already unescaped
    Block(String),
}

/// Token kinds, used for lookahead matching and error messages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    LeftParen,
    RightParen,
    Semicolon,
    Ident,
    Block,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Eof => TokenKind::Eof,
            Token::LeftParen => TokenKind::LeftParen,
            Token::RightParen => TokenKind::RightParen,
            Token::Semicolon => TokenKind::Semicolon,
            Token::Ident(_) => TokenKind::Ident,
            Token::Block(_) => TokenKind::Block,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "end of input",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Semicolon => "';'",
            TokenKind::Ident => "property identifier",
            TokenKind::Block => "property value",
        };
        f.write_str(s)
    }
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    /// Where the most recently returned token began
    start: usize,
}

impl<'a> Tokenizer<'a> {
    /// Trailing whitespace is dropped up front.
    pub fn new(src: &'a str) -> Self {
        Self {
            src: src.trim_end(),
            pos: 0,
            start: 0,
        }
    }

    /// Byte offset of the next unread character.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Build an error at the start of the last token, quoting the input from there.
    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            position: self.start,
            excerpt: self.src[self.start..].chars().take(EXCERPT_LEN).collect(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        self.skip_whitespace();
        self.start = self.pos;
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return Ok(Token::Eof);
        };

        let token = match c {
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            ';' => Token::Semicolon,
            '[' => {
                let end = find_block_end(rest)
                    .ok_or_else(|| self.error(ParseErrorKind::UnterminatedValue))?;
                let block = unescape(&rest[1..end]);
                self.pos += end + 1;
                return Ok(Token::Block(block));
            }
            'A'..='Z' => {
                let len = rest
                    .find(|ch: char| !ch.is_ascii_uppercase())
                    .unwrap_or(rest.len());
                self.pos += len;
                return Ok(Token::Ident(rest[..len].to_string()));
            }
            other => return Err(self.error(ParseErrorKind::UnexpectedChar(other))),
        };
        self.pos += 1;
        Ok(token)
    }
}

/// Byte index of the `]` closing the block that starts at `s[0]`.
fn find_block_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut from = 1;
    loop {
        let p = from + s[from..].find(']')?;
        if bytes[p - 1] != b'\\' {
            return Some(p);
        }
        from = p + 1;
    }
}
