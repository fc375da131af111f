//! Tests for SELECT: result columns, FROM items, joins, compound
//! queries, ordering and limits.

mod common;
use common::*;

use sqlfront_core::ast::{
    CompoundOperator, Expr, IndexHint, JoinConstraint, JoinOperator, QualifiedName,
    ResultColumn, SelectCore, TableRef,
};

#[test]
fn select_star_with_alias_and_where() {
    let s = parse_simple("select * from users u where u.id = 1");
    assert_eq!(s.columns, vec![ResultColumn::Star]);
    assert_eq!(s.from, Some(TableRef::table("users").alias("u")));
    renders_as(
        "select * from users u where u.id = 1",
        "SELECT * FROM [users] AS [u] WHERE [u].[id] = 1",
    );
}

#[test]
fn select_without_from() {
    let s = parse_simple("SELECT 1 + 1");
    assert!(s.from.is_none());
    renders_as("SELECT 1 + 1", "SELECT 1 + 1");
}

#[test]
fn select_table_star_and_string_alias() {
    let s = parse_simple("SELECT t.*, 1 AS 'one' FROM t");
    assert_eq!(s.columns[0], ResultColumn::TableStar(String::from("t")));
    assert_eq!(
        s.columns[1],
        ResultColumn::with_alias(Expr::number("1"), "one")
    );
    renders_as(
        "SELECT t.*, 1 AS 'one' FROM t",
        "SELECT [t].*, 1 AS [one] FROM [t]",
    );
}

#[test]
fn select_distinct() {
    let s = parse_simple("SELECT DISTINCT a FROM t");
    assert!(s.distinct);
    let s = parse_simple("SELECT ALL a FROM t");
    assert!(!s.distinct);
    round_trip("SELECT DISTINCT a FROM t");
}

#[test]
fn select_keyword_named_columns() {
    renders_as(
        "SELECT key, first, action FROM t",
        "SELECT [key], [first], [action] FROM [t]",
    );
}

#[test]
fn select_quoted_identifiers() {
    renders_as(
        "SELECT \"select\", `from`, [where] FROM \"order\"",
        "SELECT [select], [from], [where] FROM [order]",
    );
}

#[test]
fn from_schema_qualified_table() {
    let s = parse_simple("SELECT * FROM main.users");
    assert!(matches!(
        &s.from,
        Some(TableRef::Table { name, alias: None, .. })
            if *name == QualifiedName::qualified("main", "users")
    ));
    renders_as("SELECT * FROM main.users", "SELECT * FROM [main].[users]");
}

#[test]
fn from_with_index_hints() {
    let s = parse_simple("SELECT * FROM t INDEXED BY idx_t");
    assert!(matches!(
        &s.from,
        Some(TableRef::Table { hint: Some(IndexHint::IndexedBy(i)), .. }) if i == "idx_t"
    ));
    renders_as(
        "SELECT * FROM t AS x NOT INDEXED",
        "SELECT * FROM [t] AS [x] NOT INDEXED",
    );
}

#[test]
fn join_chain() {
    let sql = "SELECT a.x, b.y FROM a LEFT OUTER JOIN b ON a.id = b.a_id INNER JOIN c USING (id)";
    let s = parse_simple(sql);
    let Some(TableRef::Join(outer)) = &s.from else {
        panic!("expected join");
    };
    assert_eq!(outer.operator, JoinOperator::Inner);
    assert_eq!(
        outer.constraint,
        Some(JoinConstraint::Using(vec![String::from("id")]))
    );
    let TableRef::Join(inner) = &outer.left else {
        panic!("expected left-nested join");
    };
    assert_eq!(inner.operator, JoinOperator::Left);
    renders_as(
        sql,
        "SELECT [a].[x], [b].[y] FROM [a] LEFT JOIN [b] ON [a].[id] = [b].[a_id] JOIN [c] USING ([id])",
    );
}

#[test]
fn comma_and_cross_joins() {
    renders_as("SELECT * FROM a, b", "SELECT * FROM [a], [b]");
    renders_as(
        "SELECT * FROM a CROSS JOIN b NATURAL LEFT JOIN c",
        "SELECT * FROM [a] CROSS JOIN [b] NATURAL LEFT JOIN [c]",
    );
}

#[test]
fn from_subquery_nested_group_and_function() {
    let s = parse_simple("SELECT * FROM (SELECT id FROM users) AS sub");
    assert!(matches!(s.from, Some(TableRef::Subquery { alias: Some(_), .. })));
    round_trip("SELECT * FROM (SELECT id FROM users) AS sub");

    let s = parse_simple("SELECT * FROM (a JOIN b ON a.id = b.id) JOIN c");
    let Some(TableRef::Join(join)) = s.from else {
        panic!("expected join");
    };
    assert!(matches!(join.left, TableRef::Nested(_)));
    round_trip("SELECT * FROM (a JOIN b ON a.id = b.id) JOIN c");

    let s = parse_simple("SELECT * FROM main.json_each(x.doc) j");
    assert!(matches!(
        s.from,
        Some(TableRef::Function { ref name, .. }) if name.schema.as_deref() == Some("main")
    ));
    renders_as(
        "SELECT * FROM main.json_each(x.doc) j",
        "SELECT * FROM [main].json_each([x].[doc]) AS [j]",
    );
}

#[test]
fn group_by_having_order_limit() {
    let sql = "SELECT dept, count(*) AS n FROM emp GROUP BY dept HAVING count(*) > 1 \
               ORDER BY n DESC NULLS LAST, dept LIMIT 10 OFFSET 5";
    let s = parse_select(sql);
    assert_eq!(s.order_by.len(), 2);
    assert_eq!(s.offset, Some(Expr::number("5")));
    renders_as(
        sql,
        "SELECT [dept], count(*) AS [n] FROM [emp] GROUP BY [dept] HAVING count(*) > 1 \
         ORDER BY [n] DESC NULLS LAST, [dept] LIMIT 10 OFFSET 5",
    );
}

#[test]
fn limit_with_comma_offset() {
    renders_as(
        "SELECT a FROM t LIMIT 5, 10",
        "SELECT [a] FROM [t] LIMIT 10 OFFSET 5",
    );
}

#[test]
fn compound_selects() {
    let s = parse_select("SELECT a FROM t UNION SELECT b FROM u INTERSECT SELECT c FROM v");
    assert_eq!(
        s.compounds.iter().map(|(op, _)| *op).collect::<Vec<_>>(),
        vec![CompoundOperator::Union, CompoundOperator::Intersect]
    );
    renders_as(
        "SELECT a FROM t UNION ALL SELECT b FROM u EXCEPT SELECT c FROM v ORDER BY 1",
        "SELECT [a] FROM [t] UNION ALL SELECT [b] FROM [u] EXCEPT SELECT [c] FROM [v] ORDER BY 1",
    );
}

#[test]
fn values_statement() {
    let s = parse_select("VALUES (1, 'a'), (2, 'b')");
    assert!(matches!(s.body, SelectCore::Values(ref rows) if rows.len() == 2));
    renders_as("VALUES (1, 'a'), (2, 'b')", "VALUES (1, 'a'), (2, 'b')");
}

#[test]
fn with_clause() {
    let sql = "WITH RECURSIVE t(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM t WHERE n < 5), \
               u AS (SELECT 2) SELECT n FROM t";
    let s = parse_select(sql);
    let with = s.with.as_ref().unwrap();
    assert!(with.recursive);
    assert_eq!(with.ctes.len(), 2);
    renders_as(
        sql,
        "WITH RECURSIVE [t]([n]) AS (SELECT 1 UNION ALL SELECT [n] + 1 FROM [t] WHERE [n] < 5), \
         [u] AS (SELECT 2) SELECT [n] FROM [t]",
    );
}
