//! Tests for lexer and parser diagnostics: offsets, expected sets and
//! the tokens found.

mod common;
use common::*;

use sqlfront_core::lexer::{Keyword, LexError, TokenKind};
use sqlfront_core::{SqlError, parse_statements};

fn parse_error(sql: &str) -> sqlfront_core::ParseError {
    match parse_err(sql) {
        SqlError::Parse(e) => e,
        SqlError::Lex(e) => panic!("Expected parse error for {sql}, got lex error {e:?}"),
    }
}

fn lex_error(sql: &str) -> LexError {
    match parse_err(sql) {
        SqlError::Lex(e) => e,
        SqlError::Parse(e) => panic!("Expected lex error for {sql}, got parse error {e:?}"),
    }
}

#[test]
fn missing_from_table() {
    let e = parse_error("SELECT * FROM");
    assert_eq!(e.expected, vec![String::from("identifier")]);
    assert_eq!(e.found, Some(TokenKind::Eof));
    assert_eq!(e.offset(), 13);
    assert!(e.message.starts_with("Unexpected end of input"));
}

#[test]
fn unexpected_keyword_reports_found_token() {
    let e = parse_error("SELECT a FROM t WHERE");
    assert_eq!(e.expected, vec![String::from("expression")]);

    let e = parse_error("INSERT users VALUES (1)");
    assert_eq!(e.expected, vec![String::from("INTO")]);
    assert_eq!(e.offset(), 7);
    assert!(matches!(e.found, Some(TokenKind::Identifier(ref name)) if name == "users"));
}

#[test]
fn unknown_statement() {
    let e = parse_error("PRAGMA foreign_keys = ON");
    assert_eq!(e.offset(), 0);
    assert!(e.message.contains("SELECT"));
}

#[test]
fn alternatives_are_listed_one_per_entry() {
    let e = parse_error("INSERT OR x INTO t VALUES (1)");
    assert_eq!(e.offset(), 10);
    assert_eq!(
        e.expected,
        ["ROLLBACK", "ABORT", "FAIL", "IGNORE", "REPLACE"]
            .map(String::from)
            .to_vec()
    );
    assert!(e.message.contains("expected ROLLBACK, ABORT, FAIL, IGNORE or REPLACE"));

    let e = parse_error("PRAGMA foreign_keys = ON");
    assert_eq!(e.expected.len(), 7);
    assert!(e.expected.iter().all(|item| !item.contains(',')));
}

#[test]
fn subquery_and_nested_join_failures_are_merged() {
    let e = parse_error("SELECT * FROM (");
    assert_eq!(e.offset(), 15);
    assert!(e.expected.contains(&String::from("SELECT")));
    assert!(e.expected.contains(&String::from("identifier")));
}

#[test]
fn reserved_word_is_not_a_name() {
    let e = parse_error("CREATE TABLE select (a)");
    assert_eq!(e.found, Some(TokenKind::Keyword(Keyword::Select)));
}

#[test]
fn unbalanced_parentheses() {
    let e = parse_error("SELECT (1 + 2");
    assert_eq!(e.expected, vec![String::from("')'")]);
    let e = parse_error("SELECT count(a");
    assert_eq!(e.offset(), 14);
}

#[test]
fn trailing_tokens() {
    let e = parse_error("SELECT 1 FROM t t2 t3");
    assert_eq!(e.expected, vec![String::from("end of input")]);
    assert_eq!(e.offset(), 19);
}

#[test]
fn lexer_errors_surface_with_offsets() {
    assert_eq!(
        lex_error("SELECT 'abc"),
        LexError::UnterminatedString { offset: 7 }
    );
    assert_eq!(
        lex_error("SELECT \"abc"),
        LexError::UnterminatedIdentifier { offset: 7 }
    );
    assert!(matches!(
        lex_error("SELECT 12abc"),
        LexError::MalformedNumber { offset: 7, .. }
    ));
    assert!(matches!(
        lex_error("SELECT a ! b"),
        LexError::UnknownSymbol { offset: 9, .. }
    ));
    assert_eq!(parse_err("SELECT 'abc").offset(), 7);
}

#[test]
fn script_errors_stop_at_first_failure() {
    let err = parse_statements("SELECT 1; SELEC 2; SELECT 3").unwrap_err();
    assert_eq!(err.offset(), 10);
    let ok = parse_statements("-- leading comment\nSELECT 1; /* two */ SELECT 2").unwrap();
    assert_eq!(ok.len(), 2);
}
