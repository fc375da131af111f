#![allow(dead_code)]

use sqlfront_core::ast::{
    CreateTableStatement, DeleteStatement, InsertStatement, SelectStatement, SimpleSelect,
    Statement, UpdateStatement,
};
use sqlfront_core::{SqlError, parse_statement};

pub fn parse(sql: &str) -> Statement {
    parse_statement(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> SqlError {
    parse_statement(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_simple(sql: &str) -> SimpleSelect {
    match parse_select(sql).body {
        sqlfront_core::ast::SelectCore::Select(s) => s,
        other => panic!("Expected simple SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

pub fn parse_create_table(sql: &str) -> CreateTableStatement {
    match parse(sql) {
        Statement::CreateTable(t) => t,
        other => panic!("Expected CREATE TABLE, got {other:?}"),
    }
}

/// Verifies that rendering is structurally lossless:
/// parse(unparse(parse(sql))) == parse(sql), and the rendering is a fixed point.
pub fn round_trip(sql: &str) {
    let ast1 = parse(sql);
    let rendered1 = ast1.to_string();
    let ast2 = parse(&rendered1);
    assert_eq!(
        ast1, ast2,
        "Round-trip changed the tree.\n  Input:    {sql}\n  Rendered: {rendered1}"
    );
    let rendered2 = ast2.to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

/// Asserts the canonical rendering of `sql`.
pub fn renders_as(sql: &str, expected: &str) {
    assert_eq!(parse(sql).to_string(), expected, "Input: {sql}");
    round_trip(sql);
}
