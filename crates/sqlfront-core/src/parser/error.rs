//! Parser error types.

use crate::lexer::{LexError, Span, TokenKind};

/// A parse error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at position {span}")]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// What the parser would have accepted here.
    pub expected: Vec<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: Vec::new(),
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        Self::unexpected_any(vec![expected.into()], found, span)
    }

    /// Creates an "unexpected token" error accepting any of `expected`.
    #[must_use]
    pub fn unexpected_any(expected: Vec<String>, found: TokenKind, span: Span) -> Self {
        let wanted = describe_expected(&expected);
        let message = if found == TokenKind::Eof {
            format!("Unexpected end of input: expected {wanted}")
        } else {
            format!("Unexpected token: expected {wanted}, found {}", found.describe())
        };
        Self {
            message,
            span,
            expected,
            found: Some(found),
        }
    }

    /// Combines the failures of two alternatives.
    ///
    /// The error that got further wins. At the same position the expected
    /// sets are unioned.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        if other.span.start > self.span.start {
            return other;
        }
        if other.span.start < self.span.start || self.found != other.found {
            return self;
        }
        let Some(found) = self.found else {
            return self;
        };
        let mut expected = self.expected;
        for item in other.expected {
            if !expected.contains(&item) {
                expected.push(item);
            }
        }
        Self::unexpected_any(expected, found, self.span)
    }

    /// Byte offset where the error was detected.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start
    }
}

/// Renders `["a", "b", "c"]` as `a, b or c`.
fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => String::from("nothing"),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

/// Any error produced while turning text into a statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SqlError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl SqlError {
    /// Byte offset of the offending input.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::Lex(err) => err.offset(),
            Self::Parse(err) => err.offset(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    #[test]
    fn test_unexpected_message() {
        let err = ParseError::unexpected(
            "FROM",
            TokenKind::Keyword(Keyword::Where),
            Span::new(9, 14),
        );
        assert_eq!(
            err.to_string(),
            "Unexpected token: expected FROM, found WHERE at position 9..14"
        );
        assert_eq!(err.expected, vec![String::from("FROM")]);
        assert_eq!(err.offset(), 9);
    }

    #[test]
    fn test_unexpected_eof_message() {
        let err = ParseError::unexpected("expression", TokenKind::Eof, Span::at(7));
        assert!(err.message.starts_with("Unexpected end of input"));
    }

    #[test]
    fn test_unexpected_any_lists_every_entry() {
        let err = ParseError::unexpected_any(
            vec![String::from("TABLE"), String::from("VIEW"), String::from("INDEX")],
            TokenKind::Identifier(String::from("x")),
            Span::new(7, 8),
        );
        assert_eq!(err.expected.len(), 3);
        assert!(err.message.contains("expected TABLE, VIEW or INDEX"));
    }

    #[test]
    fn test_merge_unions_at_same_position() {
        let select = ParseError::unexpected("SELECT", TokenKind::Eof, Span::at(1));
        let identifier = ParseError::unexpected("identifier", TokenKind::Eof, Span::at(1));
        let merged = select.clone().merge(identifier.clone()).merge(select.clone());
        assert_eq!(
            merged.expected,
            vec![String::from("SELECT"), String::from("identifier")]
        );

        let further = ParseError::unexpected("')'", TokenKind::Eof, Span::at(4));
        assert_eq!(select.merge(further.clone()), further);
    }

    #[test]
    fn test_sql_error_offset() {
        let lex: SqlError = LexError::UnterminatedString { offset: 4 }.into();
        assert_eq!(lex.offset(), 4);
    }
}
