//! Canonical SQL rendering for every AST node.
//!
//! Identifiers are always bracket-quoted, text literals single-quoted, and
//! operands parenthesised only where precedence requires it, so a tree
//! produced by the parser renders to text that parses back to the same tree.

use core::fmt;

use super::ddl::{
    AlterTableAction, AlterTableStatement, CreateIndexStatement, CreateTableBody,
    CreateTableStatement, CreateTriggerStatement, CreateViewStatement, DropStatement,
    TriggerEvent,
};
use super::expression::{
    precedence, ColumnRef, Expr, FunctionArgs, FunctionCall, InTarget, Literal, QualifiedName,
    UnaryOp,
};
use super::statement::{
    Assignment, CommonTableExpr, DeleteStatement, IndexHint, InsertSource, InsertStatement,
    JoinConstraint, JoinOperator, OrderingTerm, ResultColumn, SelectCore, SelectStatement,
    SimpleSelect, Statement, TableRef, UpdateStatement, UpsertAction, UpsertClause, WithClause,
};
use super::types::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, DataType, ForeignKeyAction,
    ForeignKeyClause, IndexedColumn, TableConstraint, TableConstraintKind,
};

/// Renders an identifier as `[name]`, or `"name"` when it contains `]`.
#[derive(Debug, Clone, Copy)]
pub struct Ident<'a>(pub &'a str);

impl fmt::Display for Ident<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.contains(']') {
            write!(f, "\"{}\"", self.0.replace('"', "\"\""))
        } else {
            write!(f, "[{}]", self.0)
        }
    }
}

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn ident_list(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", Ident(name))?;
    }
    Ok(())
}

fn opt_alias(f: &mut fmt::Formatter<'_>, alias: Option<&String>) -> fmt::Result {
    match alias {
        Some(alias) => write!(f, " AS {}", Ident(alias)),
        None => Ok(()),
    }
}

/// Writes `expr`, parenthesised when it binds looser than `min`.
fn operand(f: &mut fmt::Formatter<'_>, expr: &Expr, min: u8) -> fmt::Result {
    if expr.precedence() < min {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Writes the right-hand operand of a left-associative operator at `level`.
///
/// A prefix operator on the right swallows everything the parser lets it,
/// so it never needs parentheses there.
fn right_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, level: u8) -> fmt::Result {
    if matches!(expr, Expr::Unary { .. }) {
        write!(f, "{expr}")
    } else {
        operand(f, expr, level + 1)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", Ident(schema))?;
        }
        write!(f, "{}", Ident(&self.name))
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", Ident(schema))?;
        }
        if let Some(table) = &self.table {
            write!(f, "{}.", Ident(table))?;
        }
        write!(f, "{}", Ident(&self.name))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(text) => f.write_str(text),
            Self::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Blob(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
            Self::Null => f.write_str("NULL"),
            Self::CurrentTime => f.write_str("CURRENT_TIME"),
            Self::CurrentDate => f.write_str("CURRENT_DATE"),
            Self::CurrentTimestamp => f.write_str("CURRENT_TIMESTAMP"),
        }
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        match &self.args {
            FunctionArgs::Star => f.write_str("*")?,
            FunctionArgs::List(args) => comma_list(f, args)?,
        }
        f.write_str(")")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Column(column) => write!(f, "{column}"),
            Self::Parameter(p) => f.write_str(p),
            Self::Unary { op, operand: inner } => match op {
                UnaryOp::Not => {
                    f.write_str("NOT ")?;
                    right_operand(f, inner, precedence::NOT - 1)
                }
                _ => {
                    f.write_str(op.as_str())?;
                    // "- -x" rather than "--x", which would start a comment.
                    if *op == UnaryOp::Neg
                        && matches!(
                            inner.as_ref(),
                            Self::Unary {
                                op: UnaryOp::Neg,
                                ..
                            }
                        )
                    {
                        f.write_str(" ")?;
                    }
                    operand(f, inner, precedence::UNARY)
                }
            },
            Self::Binary { left, op, right } => {
                let level = op.precedence();
                operand(f, left, level)?;
                write!(f, " {} ", op.as_str())?;
                right_operand(f, right, level)
            }
            Self::Like {
                expr,
                op,
                negated,
                pattern,
                escape,
            } => {
                operand(f, expr, precedence::EQUALITY)?;
                f.write_str(if *negated { " NOT " } else { " " })?;
                write!(f, "{} ", op.as_str())?;
                right_operand(f, pattern, precedence::EQUALITY)?;
                if let Some(escape) = escape {
                    f.write_str(" ESCAPE ")?;
                    right_operand(f, escape, precedence::EQUALITY)?;
                }
                Ok(())
            }
            Self::Between {
                expr,
                negated,
                low,
                high,
            } => {
                operand(f, expr, precedence::EQUALITY)?;
                f.write_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " })?;
                right_operand(f, low, precedence::EQUALITY)?;
                f.write_str(" AND ")?;
                right_operand(f, high, precedence::EQUALITY)
            }
            Self::In {
                expr,
                negated,
                target,
            } => {
                operand(f, expr, precedence::EQUALITY)?;
                f.write_str(if *negated { " NOT IN " } else { " IN " })?;
                match target {
                    InTarget::List(list) => {
                        f.write_str("(")?;
                        comma_list(f, list)?;
                        f.write_str(")")
                    }
                    InTarget::Subquery(query) => write!(f, "({query})"),
                    InTarget::Table(name) => write!(f, "{name}"),
                }
            }
            Self::IsNull { expr, negated } => {
                operand(f, expr, precedence::EQUALITY)?;
                f.write_str(if *negated { " NOTNULL" } else { " ISNULL" })
            }
            Self::Case {
                operand: case_operand,
                when_clauses,
                else_clause,
            } => {
                f.write_str("CASE")?;
                if let Some(case_operand) = case_operand {
                    write!(f, " {case_operand}")?;
                }
                for (when, then) in when_clauses {
                    write!(f, " WHEN {when} THEN {then}")?;
                }
                if let Some(else_clause) = else_clause {
                    write!(f, " ELSE {else_clause}")?;
                }
                f.write_str(" END")
            }
            Self::Cast { expr, data_type } => write!(f, "CAST({expr} AS {data_type})"),
            Self::Collate { expr, collation } => {
                operand(f, expr, precedence::COLLATE)?;
                write!(f, " COLLATE {}", Ident(collation))
            }
            Self::Exists(query) => write!(f, "EXISTS ({query})"),
            Self::Subquery(query) => write!(f, "({query})"),
            Self::Paren(inner) => write!(f, "({inner})"),
            Self::Function(call) => write!(f, "{call}"),
            Self::Raise { action, message } => {
                write!(f, "RAISE({}", action.as_str())?;
                if let Some(message) = message {
                    write!(f, ", {}", Literal::Text(message.clone()))?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match (&self.size, &self.scale) {
            (Some(size), Some(scale)) => write!(f, "({size}, {scale})"),
            (Some(size), None) => write!(f, "({size})"),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for OrderingTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(nulls) = self.nulls {
            write!(f, " {}", nulls.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for IndexedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { name, alias, hint } => {
                write!(f, "{name}")?;
                opt_alias(f, alias.as_ref())?;
                match hint {
                    Some(IndexHint::IndexedBy(index)) => write!(f, " INDEXED BY {}", Ident(index)),
                    Some(IndexHint::NotIndexed) => f.write_str(" NOT INDEXED"),
                    None => Ok(()),
                }
            }
            Self::Function { name, args, alias } => {
                if let Some(schema) = &name.schema {
                    write!(f, "{}.", Ident(schema))?;
                }
                write!(f, "{}(", name.name)?;
                comma_list(f, args)?;
                f.write_str(")")?;
                opt_alias(f, alias.as_ref())
            }
            Self::Subquery { query, alias } => {
                write!(f, "({query})")?;
                opt_alias(f, alias.as_ref())
            }
            Self::Nested(inner) => write!(f, "({inner})"),
            Self::Join(join) => {
                write!(f, "{}", join.left)?;
                if join.operator == JoinOperator::Comma {
                    f.write_str(",")?;
                }
                f.write_str(" ")?;
                if join.natural {
                    f.write_str("NATURAL ")?;
                }
                if join.operator != JoinOperator::Comma {
                    write!(f, "{} ", join.operator.as_str())?;
                }
                write!(f, "{}", join.right)?;
                match &join.constraint {
                    Some(JoinConstraint::On(expr)) => write!(f, " ON {expr}"),
                    Some(JoinConstraint::Using(columns)) => {
                        f.write_str(" USING (")?;
                        ident_list(f, columns)?;
                        f.write_str(")")
                    }
                    None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for ResultColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Star => f.write_str("*"),
            Self::TableStar(table) => write!(f, "{}.*", Ident(table)),
            Self::Expr { expr, alias } => {
                write!(f, "{expr}")?;
                opt_alias(f, alias.as_ref())
            }
        }
    }
}

fn values_rows(f: &mut fmt::Formatter<'_>, rows: &[Vec<Expr>]) -> fmt::Result {
    f.write_str("VALUES ")?;
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        f.write_str("(")?;
        comma_list(f, row)?;
        f.write_str(")")?;
    }
    Ok(())
}

impl fmt::Display for SimpleSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        comma_list(f, &self.columns)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            comma_list(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Values(rows) => values_rows(f, rows),
        }
    }
}

impl fmt::Display for CommonTableExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Ident(&self.name))?;
        if !self.columns.is_empty() {
            f.write_str("(")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS ({})", self.query)
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        comma_list(f, &self.ctes)
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write!(f, "{}", self.body)?;
        for (op, core) in &self.compounds {
            write!(f, " {} {core}", op.as_str())?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", Ident(&self.column), self.value)
    }
}

impl fmt::Display for UpsertClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ON CONFLICT")?;
        if !self.target.is_empty() {
            f.write_str(" (")?;
            comma_list(f, &self.target)?;
            f.write_str(")")?;
            if let Some(where_clause) = &self.target_where {
                write!(f, " WHERE {where_clause}")?;
            }
        }
        match &self.action {
            UpsertAction::Nothing => f.write_str(" DO NOTHING"),
            UpsertAction::Update {
                assignments,
                where_clause,
            } => {
                f.write_str(" DO UPDATE SET ")?;
                comma_list(f, assignments)?;
                if let Some(where_clause) = where_clause {
                    write!(f, " WHERE {where_clause}")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("INSERT ")?;
        if let Some(action) = self.or_action {
            write!(f, "OR {} ", action.as_str())?;
        }
        write!(f, "INTO {}", self.table)?;
        opt_alias(f, self.alias.as_ref())?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match &self.source {
            InsertSource::Values(rows) => {
                f.write_str(" ")?;
                values_rows(f, rows)?;
            }
            InsertSource::Select(query) => write!(f, " {query}")?,
            InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES")?,
        }
        if let Some(upsert) = &self.upsert {
            write!(f, " {upsert}")?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UPDATE ")?;
        if let Some(action) = self.or_action {
            write!(f, "OR {} ", action.as_str())?;
        }
        write!(f, "{}", self.table)?;
        opt_alias(f, self.alias.as_ref())?;
        f.write_str(" SET ")?;
        comma_list(f, &self.assignments)?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DELETE FROM {}", self.table)?;
        opt_alias(f, self.alias.as_ref())?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ForeignKeyClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REFERENCES {}", Ident(&self.table))?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        for action in &self.actions {
            match action {
                ForeignKeyAction::OnDelete(action) => write!(f, " ON DELETE {}", action.as_str())?,
                ForeignKeyAction::OnUpdate(action) => write!(f, " ON UPDATE {}", action.as_str())?,
                ForeignKeyAction::Match(name) => write!(f, " MATCH {}", Ident(name))?,
            }
        }
        if let Some(deferrable) = &self.deferrable {
            f.write_str(if deferrable.negated {
                " NOT DEFERRABLE"
            } else {
                " DEFERRABLE"
            })?;
            if let Some(initially) = deferrable.initially {
                write!(f, " {}", initially.as_str())?;
            }
        }
        Ok(())
    }
}

fn on_conflict(
    f: &mut fmt::Formatter<'_>,
    conflict: Option<super::types::ConflictResolution>,
) -> fmt::Result {
    match conflict {
        Some(resolution) => write!(f, " ON CONFLICT {}", resolution.as_str()),
        None => Ok(()),
    }
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", Ident(name))?;
        }
        match &self.kind {
            ColumnConstraintKind::PrimaryKey {
                direction,
                conflict,
                autoincrement,
            } => {
                f.write_str("PRIMARY KEY")?;
                if let Some(direction) = direction {
                    write!(f, " {}", direction.as_str())?;
                }
                on_conflict(f, *conflict)?;
                if *autoincrement {
                    f.write_str(" AUTOINCREMENT")?;
                }
                Ok(())
            }
            ColumnConstraintKind::NotNull { conflict } => {
                f.write_str("NOT NULL")?;
                on_conflict(f, *conflict)
            }
            ColumnConstraintKind::Null => f.write_str("NULL"),
            ColumnConstraintKind::Unique { conflict } => {
                f.write_str("UNIQUE")?;
                on_conflict(f, *conflict)
            }
            ColumnConstraintKind::Check(expr) => write!(f, "CHECK ({expr})"),
            ColumnConstraintKind::Default(expr) => match expr {
                Expr::Literal(_) | Expr::Paren(_) => write!(f, "DEFAULT {expr}"),
                Expr::Unary {
                    op: UnaryOp::Neg | UnaryOp::Plus,
                    operand,
                } if matches!(operand.as_ref(), Expr::Literal(Literal::Number(_))) => {
                    write!(f, "DEFAULT {expr}")
                }
                _ => write!(f, "DEFAULT ({expr})"),
            },
            ColumnConstraintKind::Collate(name) => write!(f, "COLLATE {}", Ident(name)),
            ColumnConstraintKind::References(clause) => write!(f, "{clause}"),
            ColumnConstraintKind::Generated { expr, storage } => {
                write!(f, "GENERATED ALWAYS AS ({expr})")?;
                if let Some(storage) = storage {
                    write!(f, " {}", storage.as_str())?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Ident(&self.name))?;
        if let Some(data_type) = &self.data_type {
            write!(f, " {data_type}")?;
        }
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TableConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "CONSTRAINT {} ", Ident(name))?;
        }
        match &self.kind {
            TableConstraintKind::PrimaryKey { columns, conflict } => {
                f.write_str("PRIMARY KEY (")?;
                comma_list(f, columns)?;
                f.write_str(")")?;
                on_conflict(f, *conflict)
            }
            TableConstraintKind::Unique { columns, conflict } => {
                f.write_str("UNIQUE (")?;
                comma_list(f, columns)?;
                f.write_str(")")?;
                on_conflict(f, *conflict)
            }
            TableConstraintKind::Check(expr) => write!(f, "CHECK ({expr})"),
            TableConstraintKind::ForeignKey { columns, clause } => {
                f.write_str("FOREIGN KEY (")?;
                ident_list(f, columns)?;
                write!(f, ") {clause}")
            }
        }
    }
}

impl fmt::Display for CreateTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMP ")?;
        }
        f.write_str("TABLE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        match &self.body {
            CreateTableBody::Columns {
                columns,
                constraints,
                options,
            } => {
                f.write_str(" (")?;
                comma_list(f, columns)?;
                for constraint in constraints {
                    write!(f, ", {constraint}")?;
                }
                f.write_str(")")?;
                match (options.without_rowid, options.strict) {
                    (true, true) => f.write_str(" WITHOUT ROWID, STRICT"),
                    (true, false) => f.write_str(" WITHOUT ROWID"),
                    (false, true) => f.write_str(" STRICT"),
                    (false, false) => Ok(()),
                }
            }
            CreateTableBody::AsSelect(query) => write!(f, " AS {query}"),
        }
    }
}

impl fmt::Display for CreateViewStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMP ")?;
        }
        f.write_str("VIEW ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write!(f, " AS {}", self.query)
    }
}

impl fmt::Display for CreateIndexStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.unique {
            f.write_str("UNIQUE ")?;
        }
        f.write_str("INDEX ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} ON {} (", self.name, Ident(&self.table))?;
        comma_list(f, &self.columns)?;
        f.write_str(")")?;
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateTriggerStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMP ")?;
        }
        f.write_str("TRIGGER ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(timing) = self.timing {
            write!(f, " {}", timing.as_str())?;
        }
        match &self.event {
            TriggerEvent::Delete => f.write_str(" DELETE")?,
            TriggerEvent::Insert => f.write_str(" INSERT")?,
            TriggerEvent::Update(columns) => {
                f.write_str(" UPDATE")?;
                if !columns.is_empty() {
                    f.write_str(" OF ")?;
                    ident_list(f, columns)?;
                }
            }
        }
        write!(f, " ON {}", Ident(&self.table))?;
        if self.for_each_row {
            f.write_str(" FOR EACH ROW")?;
        }
        if let Some(when) = &self.when {
            write!(f, " WHEN {when}")?;
        }
        f.write_str(" BEGIN ")?;
        for statement in &self.body {
            write!(f, "{statement}; ")?;
        }
        f.write_str("END")
    }
}

impl fmt::Display for DropStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP {} ", self.kind.as_str())?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for AlterTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ALTER TABLE {} ", self.name)?;
        match &self.action {
            AlterTableAction::RenameTo(name) => write!(f, "RENAME TO {}", Ident(name)),
            AlterTableAction::RenameColumn { old, new } => {
                write!(f, "RENAME COLUMN {} TO {}", Ident(old), Ident(new))
            }
            AlterTableAction::AddColumn(column) => write!(f, "ADD COLUMN {column}"),
            AlterTableAction::DropColumn(name) => write!(f, "DROP COLUMN {}", Ident(name)),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => write!(f, "{s}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::CreateTable(s) => write!(f, "{s}"),
            Self::CreateView(s) => write!(f, "{s}"),
            Self::CreateIndex(s) => write!(f, "{s}"),
            Self::CreateTrigger(s) => write!(f, "{s}"),
            Self::Drop(s) => write!(f, "{s}"),
            Self::AlterTable(s) => write!(f, "{s}"),
        }
    }
}
