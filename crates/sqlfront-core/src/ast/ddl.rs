//! Schema definition statements: CREATE, DROP and ALTER.

use super::expression::{Expr, QualifiedName};
use super::statement::{SelectStatement, Statement};
use super::types::{ColumnDef, IndexedColumn, TableConstraint};

/// Table options following the column list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableOptions {
    pub without_rowid: bool,
    pub strict: bool,
}

/// Body of a CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateTableBody {
    Columns {
        columns: Vec<ColumnDef>,
        constraints: Vec<TableConstraint>,
        options: TableOptions,
    },
    AsSelect(Box<SelectStatement>),
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub temporary: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub body: CreateTableBody,
}

impl CreateTableStatement {
    /// Creates a statement with a column list body.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            temporary: false,
            if_not_exists: false,
            name: QualifiedName::new(name),
            body: CreateTableBody::Columns {
                columns,
                constraints: Vec::new(),
                options: TableOptions::default(),
            },
        }
    }

    /// Column definitions; empty for `CREATE TABLE ... AS SELECT`.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        match &self.body {
            CreateTableBody::Columns { columns, .. } => columns,
            CreateTableBody::AsSelect(_) => &[],
        }
    }

    /// Table-level constraints; empty for `CREATE TABLE ... AS SELECT`.
    #[must_use]
    pub fn constraints(&self) -> &[TableConstraint] {
        match &self.body {
            CreateTableBody::Columns { constraints, .. } => constraints,
            CreateTableBody::AsSelect(_) => &[],
        }
    }

    /// Looks a column up by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// A CREATE VIEW statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateViewStatement {
    pub temporary: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub columns: Vec<String>,
    pub query: Box<SelectStatement>,
}

/// A CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIndexStatement {
    pub unique: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub table: String,
    pub columns: Vec<IndexedColumn>,
    pub where_clause: Option<Expr>,
}

/// When a trigger fires relative to its event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

/// The event a trigger listens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Delete,
    Insert,
    /// `UPDATE [OF col, ...]`; an empty list means any column.
    Update(Vec<String>),
}

/// A CREATE TRIGGER statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTriggerStatement {
    pub temporary: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub timing: Option<TriggerTiming>,
    pub event: TriggerEvent,
    pub table: String,
    pub for_each_row: bool,
    pub when: Option<Expr>,
    /// Body statements; only INSERT, UPDATE, DELETE and SELECT are allowed.
    pub body: Vec<Statement>,
}

/// Kind of schema object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Table,
    View,
    Index,
    Trigger,
}

impl ObjectKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "TABLE",
            Self::View => "VIEW",
            Self::Index => "INDEX",
            Self::Trigger => "TRIGGER",
        }
    }

    /// Parses the lowercase `type` column of `sqlite_master`.
    #[must_use]
    pub fn from_catalog(kind: &str) -> Option<Self> {
        match kind {
            "table" => Some(Self::Table),
            "view" => Some(Self::View),
            "index" => Some(Self::Index),
            "trigger" => Some(Self::Trigger),
            _ => None,
        }
    }
}

/// `DROP <kind> [IF EXISTS] name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropStatement {
    pub kind: ObjectKind,
    pub if_exists: bool,
    pub name: QualifiedName,
}

/// The action of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    RenameTo(String),
    RenameColumn { old: String, new: String },
    AddColumn(ColumnDef),
    DropColumn(String),
}

/// An ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTableStatement {
    pub name: QualifiedName,
    pub action: AlterTableAction,
}
