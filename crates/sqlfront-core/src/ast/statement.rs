//! Query and DML statement AST types.

use super::ddl::{
    AlterTableStatement, CreateIndexStatement, CreateTableStatement, CreateTriggerStatement,
    CreateViewStatement, DropStatement,
};
use super::expression::{Expr, QualifiedName};
use super::types::{ConflictResolution, IndexedColumn};

/// Order direction for ORDER BY and indexed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingTerm {
    /// The expression to order by.
    pub expr: Expr,
    /// Explicit direction, if written.
    pub direction: Option<OrderDirection>,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
}

/// Join operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOperator {
    /// `a, b`
    Comma,
    /// `JOIN` / `INNER JOIN`.
    Inner,
    /// `LEFT [OUTER] JOIN`.
    Left,
    /// `RIGHT [OUTER] JOIN`.
    Right,
    /// `FULL [OUTER] JOIN`.
    Full,
    /// `CROSS JOIN`.
    Cross,
}

impl JoinOperator {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Inner => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// `ON expr` or `USING (cols)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinConstraint {
    On(Expr),
    Using(Vec<String>),
}

/// A JOIN between two table references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClause {
    pub left: TableRef,
    pub natural: bool,
    pub operator: JoinOperator,
    pub right: TableRef,
    pub constraint: Option<JoinConstraint>,
}

/// `INDEXED BY name` / `NOT INDEXED` hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexHint {
    IndexedBy(String),
    NotIndexed,
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRef {
    /// A named table.
    Table {
        name: QualifiedName,
        alias: Option<String>,
        hint: Option<IndexHint>,
    },
    /// A table-valued function call.
    Function {
        name: QualifiedName,
        args: Vec<Expr>,
        alias: Option<String>,
    },
    /// A subquery.
    Subquery {
        query: Box<SelectStatement>,
        alias: Option<String>,
    },
    /// A parenthesised join group.
    Nested(Box<TableRef>),
    /// A join.
    Join(Box<JoinClause>),
}

impl TableRef {
    /// Creates a simple table reference.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self::Table {
            name: QualifiedName::new(name),
            alias: None,
            hint: None,
        }
    }

    /// Adds an alias to this table reference.
    #[must_use]
    pub fn alias(self, alias: impl Into<String>) -> Self {
        match self {
            Self::Table { name, hint, .. } => Self::Table {
                name,
                alias: Some(alias.into()),
                hint,
            },
            Self::Function { name, args, .. } => Self::Function {
                name,
                args,
                alias: Some(alias.into()),
            },
            Self::Subquery { query, .. } => Self::Subquery {
                query,
                alias: Some(alias.into()),
            },
            other => other,
        }
    }

    /// Creates a join with another table.
    #[must_use]
    pub fn join(self, operator: JoinOperator, right: Self, constraint: Option<JoinConstraint>) -> Self {
        Self::Join(Box::new(JoinClause {
            left: self,
            natural: false,
            operator,
            right,
            constraint,
        }))
    }
}

/// A common table expression in a `WITH` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpr {
    pub name: String,
    pub columns: Vec<String>,
    pub query: Box<SelectStatement>,
}

/// `WITH [RECURSIVE] cte, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpr>,
}

/// A column in the SELECT list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultColumn {
    /// `*`
    Star,
    /// `table.*`
    TableStar(String),
    /// An expression with an optional alias.
    Expr { expr: Expr, alias: Option<String> },
}

impl ResultColumn {
    /// Creates a result column without alias.
    #[must_use]
    pub const fn new(expr: Expr) -> Self {
        Self::Expr { expr, alias: None }
    }

    /// Creates a result column with alias.
    #[must_use]
    pub fn with_alias(expr: Expr, alias: impl Into<String>) -> Self {
        Self::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// A simple `SELECT` core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSelect {
    /// Whether DISTINCT is specified.
    pub distinct: bool,
    /// The columns to select.
    pub columns: Vec<ResultColumn>,
    /// The FROM clause.
    pub from: Option<TableRef>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
}

/// One arm of a (possibly compound) select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectCore {
    Select(SimpleSelect),
    Values(Vec<Vec<Expr>>),
}

/// Compound select operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOperator {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl CompoundOperator {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    /// Optional `WITH` clause.
    pub with: Option<WithClause>,
    /// The first select core.
    pub body: SelectCore,
    /// Further `UNION`/`INTERSECT`/`EXCEPT` arms.
    pub compounds: Vec<(CompoundOperator, SelectCore)>,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderingTerm>,
    /// LIMIT expression.
    pub limit: Option<Expr>,
    /// OFFSET expression.
    pub offset: Option<Expr>,
}

impl SelectStatement {
    /// Wraps a single core into a statement without ordering or limits.
    #[must_use]
    pub const fn from_core(body: SelectCore) -> Self {
        Self {
            with: None,
            body,
            compounds: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Iterates over every core, the first one included.
    pub fn cores(&self) -> impl Iterator<Item = &SelectCore> {
        core::iter::once(&self.body).chain(self.compounds.iter().map(|(_, core)| core))
    }

    /// Mutable counterpart of [`SelectStatement::cores`].
    pub fn cores_mut(&mut self) -> impl Iterator<Item = &mut SelectCore> {
        core::iter::once(&mut self.body).chain(self.compounds.iter_mut().map(|(_, core)| core))
    }
}

/// `UPDATE` assignment `column = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

/// Action of an upsert clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsertAction {
    /// `DO NOTHING`
    Nothing,
    /// `DO UPDATE SET ... [WHERE ...]`
    Update {
        assignments: Vec<Assignment>,
        where_clause: Option<Expr>,
    },
}

/// `ON CONFLICT [(target) [WHERE ...]] DO ...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertClause {
    pub target: Vec<IndexedColumn>,
    pub target_where: Option<Expr>,
    pub action: UpsertAction,
}

/// Source of rows for INSERT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertSource {
    /// VALUES clause.
    Values(Vec<Vec<Expr>>),
    /// SELECT statement.
    Select(Box<SelectStatement>),
    /// DEFAULT VALUES.
    DefaultValues,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    /// `INSERT OR <action>`; `REPLACE INTO` parses as `OR REPLACE`.
    pub or_action: Option<ConflictResolution>,
    /// Target table.
    pub table: QualifiedName,
    pub alias: Option<String>,
    /// Column names (optional).
    pub columns: Vec<String>,
    /// Values to insert.
    pub source: InsertSource,
    /// Upsert clause.
    pub upsert: Option<UpsertClause>,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatement {
    pub or_action: Option<ConflictResolution>,
    /// Target table.
    pub table: QualifiedName,
    /// Table alias.
    pub alias: Option<String>,
    /// SET assignments.
    pub assignments: Vec<Assignment>,
    /// FROM clause.
    pub from: Option<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteStatement {
    /// Target table.
    pub table: QualifiedName,
    /// Table alias.
    pub alias: Option<String>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    CreateTable(CreateTableStatement),
    CreateView(CreateViewStatement),
    CreateIndex(CreateIndexStatement),
    CreateTrigger(CreateTriggerStatement),
    Drop(DropStatement),
    AlterTable(AlterTableStatement),
}
