//! Patching views, indexes and triggers that depend on a rebuilt table.
//!
//! Each dependent is re-parsed and its column references are resolved
//! against the scopes they appear in. A reference belongs to the rebuilt
//! table when it is qualified by the table's name or alias, by `NEW`/`OLD`
//! inside a trigger on the table, or unqualified while the table is in the
//! enclosing FROM clause. Renamed columns are rewritten in place; a dropped
//! column removes the smallest clause that contains it.

use std::collections::BTreeSet;

use sqlfront_core::ast::{
    Assignment, ColumnRef, DropStatement, Expr, InTarget, InsertSource, InsertStatement,
    JoinConstraint, ObjectKind, QualifiedName, ResultColumn, SelectCore, SelectStatement,
    Statement, TableRef, TriggerEvent, UpdateStatement, UpsertAction, UpsertClause,
};
use sqlfront_core::parse_statement;
use tracing::{debug, warn};

use crate::catalog::SchemaObject;
use crate::error::MigrationError;

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn remove_positions<T>(items: &mut Vec<T>, removed: &BTreeSet<usize>) {
    if removed.is_empty() {
        return;
    }
    let mut index = 0;
    items.retain(|_| {
        let keep = !removed.contains(&index);
        index += 1;
        keep
    });
}

fn remove_source_positions(source: &mut InsertSource, removed: &BTreeSet<usize>) {
    match source {
        InsertSource::Values(rows) => {
            for row in rows {
                remove_positions(row, removed);
            }
        }
        InsertSource::Select(query) => {
            for core in query.cores_mut() {
                match core {
                    SelectCore::Select(simple) => remove_positions(&mut simple.columns, removed),
                    SelectCore::Values(rows) => {
                        for row in rows {
                            remove_positions(row, removed);
                        }
                    }
                }
            }
        }
        InsertSource::DefaultValues => {}
    }
}

/// What happened to the original table's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    renames: Vec<(String, String)>,
    dropped: Vec<String>,
}

impl ColumnMap {
    /// Creates a map where every column keeps its name.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `old` is now called `new`.
    #[must_use]
    pub fn rename(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.renames.push((old.into(), new.into()));
        self
    }

    /// Records that `column` no longer exists.
    #[must_use]
    pub fn drop_column(mut self, column: impl Into<String>) -> Self {
        self.dropped.push(column.into());
        self
    }

    /// New name of `column`, if it was renamed.
    #[must_use]
    pub fn renamed(&self, column: &str) -> Option<&str> {
        self.renames
            .iter()
            .find(|(old, _)| same(old, column))
            .map(|(_, new)| new.as_str())
    }

    /// Returns true if `column` was dropped.
    #[must_use]
    pub fn is_dropped(&self, column: &str) -> bool {
        self.dropped.iter().any(|c| same(c, column))
    }

    /// Returns true if no column was renamed or dropped.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.renames.is_empty() && self.dropped.is_empty()
    }
}

/// A name visible in a FROM clause.
struct Binding {
    name: String,
    is_target: bool,
}

/// Which column references resolve to the rebuilt table.
#[derive(Debug, Clone, Default)]
struct Scope {
    qualifiers: Vec<String>,
    unqualified: bool,
}

impl Scope {
    fn target(table: &str) -> Self {
        Self {
            qualifiers: vec![table.to_string()],
            unqualified: true,
        }
    }

    fn trigger() -> Self {
        Self {
            qualifiers: vec!["new".into(), "old".into()],
            unqualified: false,
        }
    }

    fn resolves(&self, column: &ColumnRef) -> bool {
        match &column.table {
            Some(table) => self.qualifiers.iter().any(|q| same(q, table)),
            None => self.unqualified,
        }
    }

    /// Scope inside a FROM clause with `bindings`; inner names shadow outer ones.
    fn enter(&self, bindings: &[Binding]) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        let mut qualifiers: Vec<String> = self
            .qualifiers
            .iter()
            .filter(|q| !bindings.iter().any(|b| same(&b.name, q)))
            .cloned()
            .collect();
        qualifiers.extend(
            bindings
                .iter()
                .filter(|b| b.is_target)
                .map(|b| b.name.clone()),
        );
        Self {
            qualifiers,
            unqualified: bindings.iter().any(|b| b.is_target),
        }
    }
}

struct Refresh {
    kind: ObjectKind,
    name: QualifiedName,
    create: Option<Statement>,
}

/// Rewrites dependent definitions after a table rebuild.
#[derive(Debug, Clone, Copy)]
pub struct DependentPatcher<'a> {
    table: &'a str,
    map: &'a ColumnMap,
}

impl<'a> DependentPatcher<'a> {
    /// Creates a patcher for dependents of `table`.
    #[must_use]
    pub const fn new(table: &'a str, map: &'a ColumnMap) -> Self {
        Self { table, map }
    }

    /// Returns the statements that refresh `object`: a `DROP ... IF EXISTS`
    /// followed by the patched `CREATE` if the object survives.
    ///
    /// Objects that turn out not to reference the table yield nothing.
    pub fn patch(&self, object: &SchemaObject) -> Result<Vec<String>, MigrationError> {
        let statement =
            parse_statement(&object.sql).map_err(|source| MigrationError::UnparseableDefinition {
                name: object.name.clone(),
                source,
            })?;
        let Some(refresh) = self.refresh(statement) else {
            return Ok(Vec::new());
        };

        let drop = Statement::Drop(DropStatement {
            kind: refresh.kind,
            if_exists: true,
            name: refresh.name,
        });
        let mut statements = vec![drop.to_string()];
        match refresh.create {
            Some(create) => {
                debug!(kind = refresh.kind.as_str(), name = %object.name, "Recreating dependent");
                statements.push(create.to_string());
            }
            None => warn!(
                kind = refresh.kind.as_str(),
                name = %object.name,
                "Dependent no longer applies to the rebuilt table and will be dropped"
            ),
        }
        Ok(statements)
    }

    fn refresh(&self, statement: Statement) -> Option<Refresh> {
        match statement {
            Statement::CreateIndex(mut index) => {
                if !same(&index.table, self.table) {
                    return None;
                }
                let name = index.name.clone();
                let scope = Scope::target(self.table);
                let survives = index
                    .columns
                    .iter_mut()
                    .all(|c| self.patch_expr(&mut c.expr, &scope));
                if survives {
                    self.patch_conjuncts(&mut index.where_clause, &scope);
                }
                Some(Refresh {
                    kind: ObjectKind::Index,
                    name,
                    create: survives.then(|| Statement::CreateIndex(index)),
                })
            }
            Statement::CreateView(mut view) => {
                if !self.select_mentions(&view.query) {
                    return None;
                }
                let name = view.name.clone();
                let survives = match self.patch_select(&mut view.query, &Scope::default()) {
                    None => false,
                    Some(_) if view.columns.is_empty() => true,
                    Some(removed) => {
                        remove_positions(&mut view.columns, &removed);
                        !view.columns.is_empty()
                    }
                };
                Some(Refresh {
                    kind: ObjectKind::View,
                    name,
                    create: survives.then(|| Statement::CreateView(view)),
                })
            }
            Statement::CreateTrigger(mut trigger) => {
                let on_table = same(&trigger.table, self.table);
                if !on_table && !trigger.body.iter().any(|s| self.statement_mentions(s)) {
                    return None;
                }
                let name = trigger.name.clone();
                let scope = if on_table {
                    Scope::trigger()
                } else {
                    Scope::default()
                };

                let mut survives = true;
                if on_table {
                    if let TriggerEvent::Update(columns) = &mut trigger.event {
                        if !columns.is_empty() {
                            self.patch_column_list(columns);
                            survives = !columns.is_empty();
                        }
                    }
                }
                self.patch_conjuncts(&mut trigger.when, &scope);
                trigger
                    .body
                    .retain_mut(|statement| self.patch_statement(statement, &scope));
                survives &= !trigger.body.is_empty();

                Some(Refresh {
                    kind: ObjectKind::Trigger,
                    name,
                    create: survives.then(|| Statement::CreateTrigger(trigger)),
                })
            }
            _ => None,
        }
    }

    fn binding(&self, table: &QualifiedName, alias: Option<&String>) -> Binding {
        Binding {
            name: alias.unwrap_or(&table.name).clone(),
            is_target: same(&table.name, self.table),
        }
    }

    /// Renames and removes entries of a list of the table's column names.
    /// Returns the removed positions.
    fn patch_column_list(&self, columns: &mut Vec<String>) -> BTreeSet<usize> {
        let removed: BTreeSet<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.map.is_dropped(c))
            .map(|(i, _)| i)
            .collect();
        remove_positions(columns, &removed);
        for column in columns.iter_mut() {
            if let Some(new) = self.map.renamed(column) {
                *column = new.to_string();
            }
        }
        removed
    }

    /// Renames references in `expr`. Returns false if it still references a
    /// dropped column, in which case the caller removes the enclosing clause.
    fn patch_expr(&self, expr: &mut Expr, scope: &Scope) -> bool {
        let mut intact = true;
        expr.walk_mut(&mut |e| match e {
            Expr::Column(column) => {
                if !scope.resolves(column) {
                    return;
                }
                if self.map.is_dropped(&column.name) {
                    intact = false;
                } else if let Some(new) = self.map.renamed(&column.name) {
                    column.name = new.to_string();
                }
            }
            Expr::Exists(query)
            | Expr::Subquery(query)
            | Expr::In {
                target: InTarget::Subquery(query),
                ..
            } => {
                intact &= self.patch_select(query, scope).is_some();
            }
            _ => {}
        });
        intact
    }

    /// Drops the top-level AND terms of `clause` that reference dropped columns.
    fn patch_conjuncts(&self, clause: &mut Option<Expr>, scope: &Scope) {
        if let Some(expr) = clause.take() {
            let terms = expr
                .into_conjuncts()
                .into_iter()
                .filter_map(|mut term| self.patch_expr(&mut term, scope).then_some(term))
                .collect();
            *clause = Expr::from_conjuncts(terms);
        }
    }

    fn patch_assignments(&self, assignments: &mut Vec<Assignment>, scope: &Scope, targets: bool) {
        assignments.retain_mut(|assignment| {
            if targets {
                if self.map.is_dropped(&assignment.column) {
                    return false;
                }
                if let Some(new) = self.map.renamed(&assignment.column) {
                    assignment.column = new.to_string();
                }
            }
            self.patch_expr(&mut assignment.value, scope)
        });
    }

    /// Patches a query. Returns the positions of removed result columns, or
    /// `None` when the query has nothing left to return.
    fn patch_select(&self, select: &mut SelectStatement, outer: &Scope) -> Option<BTreeSet<usize>> {
        if let Some(with) = &mut select.with {
            for cte in &mut with.ctes {
                let removed = self.patch_select(&mut cte.query, &Scope::default())?;
                remove_positions(&mut cte.columns, &removed);
            }
        }

        let mut removed = BTreeSet::new();
        let mut order_scope = None;
        for core in select.cores_mut() {
            match core {
                SelectCore::Select(simple) => {
                    let scope = self.patch_from(&mut simple.from, outer, Vec::new())?;
                    for (i, column) in simple.columns.iter_mut().enumerate() {
                        if let ResultColumn::Expr { expr, .. } = column {
                            if !self.patch_expr(expr, &scope) {
                                removed.insert(i);
                            }
                        }
                    }
                    self.patch_conjuncts(&mut simple.where_clause, &scope);
                    simple.group_by.retain_mut(|e| self.patch_expr(e, &scope));
                    self.patch_conjuncts(&mut simple.having, &scope);
                    order_scope.get_or_insert(scope);
                }
                SelectCore::Values(rows) => {
                    for row in rows {
                        for (i, value) in row.iter_mut().enumerate() {
                            if !self.patch_expr(value, outer) {
                                removed.insert(i);
                            }
                        }
                    }
                }
            }
        }

        for core in select.cores_mut() {
            let emptied = match core {
                SelectCore::Select(simple) => {
                    remove_positions(&mut simple.columns, &removed);
                    simple.columns.is_empty()
                }
                SelectCore::Values(rows) => {
                    for row in rows.iter_mut() {
                        remove_positions(row, &removed);
                    }
                    rows.iter().any(Vec::is_empty)
                }
            };
            if emptied {
                return None;
            }
        }

        let order_scope = order_scope.unwrap_or_else(|| outer.clone());
        select
            .order_by
            .retain_mut(|term| self.patch_expr(&mut term.expr, &order_scope));
        let limit_intact = select
            .limit
            .as_mut()
            .map_or(true, |limit| self.patch_expr(limit, outer));
        let offset_intact = select
            .offset
            .as_mut()
            .map_or(true, |offset| self.patch_expr(offset, outer));
        if !(limit_intact && offset_intact) {
            select.limit = None;
            select.offset = None;
        }
        Some(removed)
    }

    /// Patches a FROM clause and returns the scope it opens.
    fn patch_from(
        &self,
        from: &mut Option<TableRef>,
        outer: &Scope,
        mut bindings: Vec<Binding>,
    ) -> Option<Scope> {
        if let Some(table_ref) = from.as_ref() {
            self.collect_bindings(table_ref, &mut bindings);
        }
        let scope = outer.enter(&bindings);
        if let Some(table_ref) = from.as_mut() {
            self.patch_table_ref(table_ref, outer, &scope)?;
        }
        Some(scope)
    }

    fn collect_bindings(&self, table_ref: &TableRef, out: &mut Vec<Binding>) {
        match table_ref {
            TableRef::Table { name, alias, .. } => out.push(self.binding(name, alias.as_ref())),
            TableRef::Function { name, alias, .. } => out.push(Binding {
                name: alias.as_ref().unwrap_or(&name.name).clone(),
                is_target: false,
            }),
            TableRef::Subquery { alias, .. } => {
                if let Some(alias) = alias {
                    out.push(Binding {
                        name: alias.clone(),
                        is_target: false,
                    });
                }
            }
            TableRef::Nested(inner) => self.collect_bindings(inner, out),
            TableRef::Join(join) => {
                self.collect_bindings(&join.left, out);
                self.collect_bindings(&join.right, out);
            }
        }
    }

    fn patch_table_ref(&self, table_ref: &mut TableRef, outer: &Scope, scope: &Scope) -> Option<()> {
        match table_ref {
            TableRef::Table { .. } => {}
            TableRef::Function { args, .. } => {
                for arg in args {
                    self.patch_expr(arg, outer);
                }
            }
            TableRef::Subquery { query, .. } => {
                self.patch_select(query, &Scope::default())?;
            }
            TableRef::Nested(inner) => self.patch_table_ref(inner, outer, scope)?,
            TableRef::Join(join) => {
                self.patch_table_ref(&mut join.left, outer, scope)?;
                self.patch_table_ref(&mut join.right, outer, scope)?;
                join.constraint = match join.constraint.take() {
                    Some(JoinConstraint::On(expr)) => {
                        let mut clause = Some(expr);
                        self.patch_conjuncts(&mut clause, scope);
                        clause.map(JoinConstraint::On)
                    }
                    Some(JoinConstraint::Using(mut columns)) => {
                        if scope.unqualified {
                            self.patch_column_list(&mut columns);
                        }
                        (!columns.is_empty()).then_some(JoinConstraint::Using(columns))
                    }
                    None => None,
                };
            }
        }
        Some(())
    }

    /// Patches one trigger body statement. Returns false if it must go.
    fn patch_statement(&self, statement: &mut Statement, scope: &Scope) -> bool {
        match statement {
            Statement::Select(select) => self.patch_select(select, scope).is_some(),
            Statement::Insert(insert) => self.patch_insert(insert, scope),
            Statement::Update(update) => self.patch_update(update, scope),
            Statement::Delete(delete) => {
                let scope = scope.enter(&[self.binding(&delete.table, delete.alias.as_ref())]);
                self.patch_conjuncts(&mut delete.where_clause, &scope);
                true
            }
            _ => true,
        }
    }

    fn patch_insert(&self, insert: &mut InsertStatement, scope: &Scope) -> bool {
        let targets = same(&insert.table.name, self.table);
        let had_columns = !insert.columns.is_empty();
        if targets {
            let removed = self.patch_column_list(&mut insert.columns);
            remove_source_positions(&mut insert.source, &removed);
        }

        let mut failed = BTreeSet::new();
        match &mut insert.source {
            InsertSource::Values(rows) => {
                for row in rows {
                    for (i, value) in row.iter_mut().enumerate() {
                        if self.patch_expr(value, scope) {
                            continue;
                        }
                        // Without a column list the row must keep its arity.
                        if had_columns {
                            failed.insert(i);
                        } else {
                            *value = Expr::null();
                        }
                    }
                }
            }
            InsertSource::Select(query) => match self.patch_select(query, scope) {
                None => return false,
                Some(gone) => {
                    if had_columns {
                        remove_positions(&mut insert.columns, &gone);
                    }
                }
            },
            InsertSource::DefaultValues => {}
        }
        if !failed.is_empty() {
            remove_positions(&mut insert.columns, &failed);
            remove_source_positions(&mut insert.source, &failed);
        }

        let upsert_scope = scope.enter(&[
            self.binding(&insert.table, insert.alias.as_ref()),
            Binding {
                name: "excluded".into(),
                is_target: targets,
            },
        ]);
        let keep_upsert = match &mut insert.upsert {
            Some(upsert) => self.patch_upsert(upsert, &upsert_scope, targets),
            None => true,
        };
        if !keep_upsert {
            insert.upsert = None;
        }

        !(had_columns && insert.columns.is_empty())
    }

    fn patch_upsert(&self, upsert: &mut UpsertClause, scope: &Scope, targets: bool) -> bool {
        let keep = upsert
            .target
            .iter_mut()
            .all(|c| self.patch_expr(&mut c.expr, scope));
        self.patch_conjuncts(&mut upsert.target_where, scope);
        let emptied = match &mut upsert.action {
            UpsertAction::Update {
                assignments,
                where_clause,
            } => {
                self.patch_assignments(assignments, scope, targets);
                self.patch_conjuncts(where_clause, scope);
                assignments.is_empty()
            }
            UpsertAction::Nothing => false,
        };
        if emptied {
            upsert.action = UpsertAction::Nothing;
        }
        keep
    }

    fn patch_update(&self, update: &mut UpdateStatement, scope: &Scope) -> bool {
        let targets = same(&update.table.name, self.table);
        let binding = self.binding(&update.table, update.alias.as_ref());
        let Some(scope) = self.patch_from(&mut update.from, scope, vec![binding]) else {
            return false;
        };
        self.patch_assignments(&mut update.assignments, &scope, targets);
        self.patch_conjuncts(&mut update.where_clause, &scope);
        !update.assignments.is_empty()
    }

    fn expr_mentions(&self, expr: &Expr) -> bool {
        let mut hit = false;
        expr.walk(&mut |e| match e {
            Expr::Exists(query)
            | Expr::Subquery(query)
            | Expr::In {
                target: InTarget::Subquery(query),
                ..
            } => hit |= self.select_mentions(query),
            Expr::In {
                target: InTarget::Table(name),
                ..
            } => hit |= same(&name.name, self.table),
            _ => {}
        });
        hit
    }

    fn table_ref_mentions(&self, table_ref: &TableRef) -> bool {
        match table_ref {
            TableRef::Table { name, .. } => same(&name.name, self.table),
            TableRef::Function { args, .. } => args.iter().any(|e| self.expr_mentions(e)),
            TableRef::Subquery { query, .. } => self.select_mentions(query),
            TableRef::Nested(inner) => self.table_ref_mentions(inner),
            TableRef::Join(join) => {
                self.table_ref_mentions(&join.left)
                    || self.table_ref_mentions(&join.right)
                    || matches!(&join.constraint, Some(JoinConstraint::On(e)) if self.expr_mentions(e))
            }
        }
    }

    fn select_mentions(&self, select: &SelectStatement) -> bool {
        let in_ctes = select
            .with
            .as_ref()
            .is_some_and(|with| with.ctes.iter().any(|cte| self.select_mentions(&cte.query)));
        in_ctes
            || select.cores().any(|core| match core {
                SelectCore::Select(simple) => {
                    simple
                        .from
                        .as_ref()
                        .is_some_and(|from| self.table_ref_mentions(from))
                        || simple.columns.iter().any(|c| {
                            matches!(c, ResultColumn::Expr { expr, .. } if self.expr_mentions(expr))
                        })
                        || simple
                            .where_clause
                            .as_ref()
                            .is_some_and(|e| self.expr_mentions(e))
                        || simple.group_by.iter().any(|e| self.expr_mentions(e))
                        || simple.having.as_ref().is_some_and(|e| self.expr_mentions(e))
                }
                SelectCore::Values(rows) => rows.iter().flatten().any(|e| self.expr_mentions(e)),
            })
    }

    fn statement_mentions(&self, statement: &Statement) -> bool {
        match statement {
            Statement::Select(select) => self.select_mentions(select),
            Statement::Insert(insert) => {
                same(&insert.table.name, self.table)
                    || match &insert.source {
                        InsertSource::Values(rows) => {
                            rows.iter().flatten().any(|e| self.expr_mentions(e))
                        }
                        InsertSource::Select(query) => self.select_mentions(query),
                        InsertSource::DefaultValues => false,
                    }
            }
            Statement::Update(update) => {
                same(&update.table.name, self.table)
                    || update
                        .from
                        .as_ref()
                        .is_some_and(|from| self.table_ref_mentions(from))
                    || update
                        .assignments
                        .iter()
                        .any(|a| self.expr_mentions(&a.value))
                    || update
                        .where_clause
                        .as_ref()
                        .is_some_and(|e| self.expr_mentions(e))
            }
            Statement::Delete(delete) => {
                same(&delete.table.name, self.table)
                    || delete
                        .where_clause
                        .as_ref()
                        .is_some_and(|e| self.expr_mentions(e))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(map: &ColumnMap, kind: ObjectKind, name: &str, table: &str, sql: &str) -> Vec<String> {
        DependentPatcher::new("users", map)
            .patch(&SchemaObject::new(kind, name, table, sql))
            .unwrap()
    }

    #[test]
    fn test_view_columns_are_renamed() {
        let map = ColumnMap::new().rename("name", "full_name");
        let out = patch(
            &map,
            ObjectKind::View,
            "names",
            "names",
            "CREATE VIEW names AS SELECT u.name, id FROM users u WHERE name <> ''",
        );
        assert_eq!(
            out,
            vec![
                "DROP VIEW IF EXISTS [names]",
                "CREATE VIEW [names] AS SELECT [u].[full_name], [id] FROM [users] AS [u] \
                 WHERE [full_name] != ''",
            ]
        );
    }

    #[test]
    fn test_subquery_scopes_are_respected() {
        let map = ColumnMap::new().rename("name", "full_name");
        let out = patch(
            &map,
            ObjectKind::View,
            "v",
            "v",
            "CREATE VIEW v AS SELECT name FROM users \
             WHERE id IN (SELECT user_id FROM posts WHERE posts.name = 'a' OR name = 'b')",
        );
        assert_eq!(
            out[1],
            "CREATE VIEW [v] AS SELECT [full_name] FROM [users] \
             WHERE [id] IN (SELECT [user_id] FROM [posts] WHERE [posts].[name] = 'a' OR [name] = 'b')"
        );
    }

    #[test]
    fn test_trigger_when_and_insert_pairs_lose_dropped_column() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::Trigger,
            "audit",
            "users",
            "CREATE TRIGGER audit AFTER UPDATE ON users \
             WHEN new.age > 0 AND new.name IS NOT NULL BEGIN \
             INSERT INTO log (id, age, name) VALUES (new.id, new.age, new.name); END",
        );
        assert_eq!(
            out,
            vec![
                "DROP TRIGGER IF EXISTS [audit]",
                "CREATE TRIGGER [audit] AFTER UPDATE ON [users] WHEN [new].[name] IS NOT NULL \
                 BEGIN INSERT INTO [log] ([id], [name]) VALUES ([new].[id], [new].[name]); END",
            ]
        );
    }

    #[test]
    fn test_cross_table_trigger_assignments() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::Trigger,
            "reset",
            "posts",
            "CREATE TRIGGER reset AFTER DELETE ON posts BEGIN \
             UPDATE users SET age = 0, name = 'x' WHERE id = old.user_id AND age > 1; END",
        );
        assert_eq!(
            out[1],
            "CREATE TRIGGER [reset] AFTER DELETE ON [posts] BEGIN \
             UPDATE [users] SET [name] = 'x' WHERE [id] = [old].[user_id]; END"
        );
    }

    #[test]
    fn test_emptied_update_of_drops_trigger() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::Trigger,
            "t",
            "users",
            "CREATE TRIGGER t AFTER UPDATE OF age ON users BEGIN SELECT 1; END",
        );
        assert_eq!(out, vec!["DROP TRIGGER IF EXISTS [t]"]);
    }

    #[test]
    fn test_emptied_body_drops_trigger() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::Trigger,
            "t",
            "users",
            "CREATE TRIGGER t AFTER INSERT ON users BEGIN UPDATE stats SET total = total + new.age; END",
        );
        assert_eq!(out, vec!["DROP TRIGGER IF EXISTS [t]"]);
    }

    #[test]
    fn test_index_losing_column_is_dropped() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::Index,
            "idx",
            "users",
            "CREATE INDEX idx ON users (age, name)",
        );
        assert_eq!(out, vec!["DROP INDEX IF EXISTS [idx]"]);

        let out = patch(
            &map,
            ObjectKind::Index,
            "idx_name",
            "users",
            "CREATE INDEX idx_name ON users (name) WHERE age > 18 AND name IS NOT NULL",
        );
        assert_eq!(
            out[1],
            "CREATE INDEX [idx_name] ON [users] ([name]) WHERE [name] IS NOT NULL"
        );
    }

    #[test]
    fn test_view_column_list_follows_result_columns() {
        let map = ColumnMap::new().drop_column("age");
        let out = patch(
            &map,
            ObjectKind::View,
            "v",
            "v",
            "CREATE VIEW v (a, b) AS SELECT id, age FROM users",
        );
        assert_eq!(out[1], "CREATE VIEW [v] ([a]) AS SELECT [id] FROM [users]");

        let out = patch(
            &map,
            ObjectKind::View,
            "ages",
            "ages",
            "CREATE VIEW ages AS SELECT age FROM users",
        );
        assert_eq!(out, vec!["DROP VIEW IF EXISTS [ages]"]);
    }

    #[test]
    fn test_unrelated_objects_are_skipped() {
        let map = ColumnMap::new().drop_column("age");
        assert!(patch(&map, ObjectKind::Index, "i", "posts", "CREATE INDEX i ON posts (age)").is_empty());
        assert!(patch(
            &map,
            ObjectKind::View,
            "v",
            "v",
            "CREATE VIEW v AS SELECT age FROM users_archive"
        )
        .is_empty());
    }

    #[test]
    fn test_unparseable_definition() {
        let err = DependentPatcher::new("users", &ColumnMap::new())
            .patch(&SchemaObject::new(
                ObjectKind::View,
                "broken",
                "broken",
                "CREATE VIEW broken AS SELEC 1",
            ))
            .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::UnparseableDefinition { ref name, .. } if name == "broken"
        ));
    }

    #[test]
    fn test_column_map_lookups() {
        let map = ColumnMap::new().rename("A", "b").drop_column("C");
        assert_eq!(map.renamed("a"), Some("b"));
        assert!(map.is_dropped("c"));
        assert!(!map.is_identity());
        assert!(ColumnMap::new().is_identity());
    }
}
