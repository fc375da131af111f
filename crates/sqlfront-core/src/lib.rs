//! # sqlfront-core
//!
//! A SQL front-end for the SQLite dialect.
//!
//! This crate provides:
//! - A single-pass lexer producing positioned tokens
//! - A hand-written backtracking recursive descent parser with Pratt
//!   expression parsing
//! - A typed AST with a canonical unparser
//!
//! ## Parsing and unparsing
//!
//! ```rust
//! use sqlfront_core::{parse_statement, unparse};
//!
//! let statement = parse_statement("select id, name from users where id = ?1").unwrap();
//! assert_eq!(
//!     unparse(&statement),
//!     "SELECT [id], [name] FROM [users] WHERE [id] = ?1"
//! );
//! ```
//!
//! Identifiers are always bracket-quoted and text literals always
//! single-quoted, so the output re-parses to the same tree:
//!
//! ```rust
//! use sqlfront_core::{parse_statement, unparse};
//!
//! let sql = "CREATE TABLE \"order\" (\"select\" TEXT DEFAULT 'it''s')";
//! let statement = parse_statement(sql).unwrap();
//! assert_eq!(parse_statement(&unparse(&statement)).unwrap(), statement);
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{ColumnDef, CreateTableStatement, Expr, Statement};
pub use lexer::{LexError, Lexer, Token, TokenKind, tokenize};
pub use parser::{ParseError, Parser, SqlError};

/// Parses exactly one statement.
///
/// # Errors
///
/// Returns [`SqlError::Lex`] or [`SqlError::Parse`] with the offending offset.
pub fn parse_statement(sql: &str) -> Result<Statement, SqlError> {
    Ok(Parser::new(sql)?.parse_statement()?)
}

/// Parses a `;`-separated script.
///
/// # Errors
///
/// Returns the first lex or parse error.
pub fn parse_statements(sql: &str) -> Result<Vec<Statement>, SqlError> {
    Ok(Parser::new(sql)?.parse_statements()?)
}

/// Parses a single column definition such as `age INTEGER NOT NULL DEFAULT 0`.
///
/// # Errors
///
/// Returns an error if the text is not exactly one column definition.
pub fn parse_column_def(sql: &str) -> Result<ColumnDef, SqlError> {
    let mut parser = Parser::new(sql)?;
    let column = parser.parse_column_def()?;
    parser.expect_end()?;
    Ok(column)
}

/// Parses a standalone expression.
///
/// # Errors
///
/// Returns an error if the text is not exactly one expression.
pub fn parse_expression(sql: &str) -> Result<Expr, SqlError> {
    let mut parser = Parser::new(sql)?;
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Renders a statement as canonical SQL text.
#[must_use]
pub fn unparse(statement: &Statement) -> String {
    statement.to_string()
}
