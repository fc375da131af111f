//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for the SQLite dialect that
//! produces a flat token list terminated by a single [`TokenKind::Eof`].

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::LexError;
pub use span::Span;
pub use token::{Keyword, MAX_OPERATOR_LEN, Operator, Token, TokenKind};
pub use tokenizer::Lexer;

/// Tokenizes `input` in one pass.
///
/// # Errors
///
/// Returns a [`LexError`] for unterminated literals, malformed numbers and
/// unknown symbols.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
