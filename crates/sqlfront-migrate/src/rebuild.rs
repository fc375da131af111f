//! The table rebuild: copy into a temporary table, drop, recreate, copy back.

use sqlfront_core::ast::{
    DeleteStatement, DropStatement, Expr, InsertSource, InsertStatement, ObjectKind,
    QualifiedName, ResultColumn, SelectCore, SelectStatement, SimpleSelect, Statement, TableRef,
};

use crate::fold::TableFold;

/// Prefix of the scratch table that holds rows during a rebuild.
pub const REBUILD_PREFIX: &str = "__sqlfront_rebuild_";

/// Name of the scratch table for `table`, in the same schema.
#[must_use]
pub fn scratch_name(table: &QualifiedName) -> QualifiedName {
    QualifiedName {
        schema: table.schema.clone(),
        name: format!("{REBUILD_PREFIX}{}", table.name),
    }
}

/// `INSERT INTO target (targets) SELECT sources FROM source`.
///
/// With nothing to copy, a no-op `DELETE FROM target` keeps the statement
/// count fixed.
fn copy_rows(target: &QualifiedName, source: &QualifiedName, pairs: &[(&str, &str)]) -> Statement {
    if pairs.is_empty() {
        return Statement::Delete(DeleteStatement {
            table: target.clone(),
            alias: None,
            where_clause: None,
        });
    }
    let select = SelectStatement::from_core(SelectCore::Select(SimpleSelect {
        distinct: false,
        columns: pairs
            .iter()
            .map(|(_, from)| ResultColumn::new(Expr::column(*from)))
            .collect(),
        from: Some(TableRef::Table {
            name: source.clone(),
            alias: None,
            hint: None,
        }),
        where_clause: None,
        group_by: Vec::new(),
        having: None,
    }));
    Statement::Insert(InsertStatement {
        or_action: None,
        table: target.clone(),
        alias: None,
        columns: pairs.iter().map(|(to, _)| (*to).to_string()).collect(),
        source: InsertSource::Select(Box::new(select)),
        upsert: None,
    })
}

fn drop_table(name: &QualifiedName) -> Statement {
    Statement::Drop(DropStatement {
        kind: ObjectKind::Table,
        if_exists: false,
        name: name.clone(),
    })
}

/// The six statements that replace the table with the folded definition.
#[must_use]
pub fn rebuild_statements(fold: &TableFold) -> Vec<Statement> {
    let table = fold.name();
    let scratch = scratch_name(table);
    let carried: Vec<(&str, &str)> = fold.carried_columns().collect();
    let copy_back: Vec<(&str, &str)> = fold.insertable_columns().map(|c| (c, c)).collect();

    vec![
        Statement::CreateTable(fold.to_table(scratch.clone())),
        copy_rows(&scratch, table, &carried),
        drop_table(table),
        Statement::CreateTable(fold.to_table(table.clone())),
        copy_rows(table, &scratch, &copy_back),
        drop_table(&scratch),
    ]
}
