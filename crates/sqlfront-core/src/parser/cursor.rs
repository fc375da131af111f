//! Backtracking cursor over a token list.

use crate::lexer::{Span, Token, TokenKind};

/// A read position over an immutable token list, with a stack of marks.
///
/// The cursor only moves forward, except through [`TokenCursor::rollback`],
/// which returns exactly to the position of the matching [`TokenCursor::mark`].
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
    marks: Vec<usize>,
}

impl TokenCursor {
    /// Creates a cursor. A trailing EOF token is appended if missing.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::new(TokenKind::Eof, "", Span::at(end)));
        }
        Self {
            tokens,
            pos: 0,
            marks: Vec::new(),
        }
    }

    /// Returns the current token. At the end this is the EOF token.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the token `n` positions ahead of the current one.
    #[must_use]
    pub fn peek(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// Returns the token before the current one, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// Consumes the current token and returns it. Never moves past EOF.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos;
        if !self.tokens[index].is_eof() {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Returns true once the cursor sits on EOF.
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// Current position, for diagnostics and tests.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Pushes the current position onto the mark stack.
    pub fn mark(&mut self) {
        self.marks.push(self.pos);
    }

    /// Pops the latest mark, keeping the current position.
    pub fn commit(&mut self) {
        self.marks.pop();
    }

    /// Pops the latest mark and returns to its position.
    pub fn rollback(&mut self) {
        if let Some(pos) = self.marks.pop() {
            self.pos = pos;
        }
    }

    /// Number of outstanding marks.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.marks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn cursor(sql: &str) -> TokenCursor {
        TokenCursor::new(tokenize(sql).unwrap())
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let mut c = cursor("a b");
        assert_eq!(c.advance().text, "a");
        assert_eq!(c.advance().text, "b");
        assert!(c.advance().is_eof());
        assert!(c.advance().is_eof());
        assert!(c.at_end());
    }

    #[test]
    fn test_peek_clamps_to_eof() {
        let c = cursor("a");
        assert_eq!(c.peek(0).text, "a");
        assert!(c.peek(1).is_eof());
        assert!(c.peek(50).is_eof());
    }

    #[test]
    fn test_rollback_restores_marked_position() {
        let mut c = cursor("a b c d");
        c.advance();
        c.mark();
        c.advance();
        c.advance();
        assert_eq!(c.current().text, "d");
        c.rollback();
        assert_eq!(c.current().text, "b");
        assert_eq!(c.depth(), 0);
    }

    #[test]
    fn test_nested_marks() {
        let mut c = cursor("a b c d");
        c.mark();
        c.advance();
        c.mark();
        c.advance();
        c.commit();
        assert_eq!(c.current().text, "c");
        c.rollback();
        assert_eq!(c.current().text, "a");
    }

    #[test]
    fn test_commit_keeps_position() {
        let mut c = cursor("a b");
        c.mark();
        c.advance();
        c.commit();
        assert_eq!(c.current().text, "b");
        assert_eq!(c.previous().map(|t| t.text.as_str()), Some("a"));
    }

    #[test]
    fn test_missing_eof_is_appended() {
        let c = TokenCursor::new(Vec::new());
        assert!(c.current().is_eof());
    }
}
