//! Column definitions, data types and constraints.

use super::expression::Expr;
use super::statement::OrderDirection;

/// A declared column type such as `VARCHAR(255)` or `UNSIGNED BIG INT`.
///
/// SQLite accepts any sequence of words as a type name, so the name is kept
/// as written; `size` and `scale` hold the optional signed-number arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    pub name: String,
    pub size: Option<String>,
    pub scale: Option<String>,
}

impl DataType {
    /// Creates a type without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: None,
            scale: None,
        }
    }

    /// Creates a type with a size argument, e.g. `VARCHAR(255)`.
    #[must_use]
    pub fn sized(name: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size: Some(size.into()),
            scale: None,
        }
    }
}

/// Conflict resolution algorithm (`ON CONFLICT ...`, `INSERT OR ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictResolution {
    Rollback,
    Abort,
    Fail,
    Ignore,
    Replace,
}

impl ConflictResolution {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rollback => "ROLLBACK",
            Self::Abort => "ABORT",
            Self::Fail => "FAIL",
            Self::Ignore => "IGNORE",
            Self::Replace => "REPLACE",
        }
    }
}

/// Foreign key `ON DELETE` / `ON UPDATE` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    SetNull,
    SetDefault,
    Cascade,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// One trailing item of a `REFERENCES` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignKeyAction {
    OnDelete(ReferentialAction),
    OnUpdate(ReferentialAction),
    Match(String),
}

/// `INITIALLY DEFERRED` / `INITIALLY IMMEDIATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialCheck {
    Deferred,
    Immediate,
}

impl InitialCheck {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Deferred => "INITIALLY DEFERRED",
            Self::Immediate => "INITIALLY IMMEDIATE",
        }
    }
}

/// `[NOT] DEFERRABLE [INITIALLY ...]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deferrable {
    pub negated: bool,
    pub initially: Option<InitialCheck>,
}

/// `REFERENCES table [(cols)] [actions] [deferrable]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyClause {
    pub table: String,
    pub columns: Vec<String>,
    pub actions: Vec<ForeignKeyAction>,
    pub deferrable: Option<Deferrable>,
}

/// Storage of a generated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedStorage {
    Stored,
    Virtual,
}

impl GeneratedStorage {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stored => "STORED",
            Self::Virtual => "VIRTUAL",
        }
    }
}

/// The body of a column constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnConstraintKind {
    PrimaryKey {
        direction: Option<OrderDirection>,
        conflict: Option<ConflictResolution>,
        autoincrement: bool,
    },
    NotNull {
        conflict: Option<ConflictResolution>,
    },
    /// Explicit `NULL`.
    Null,
    Unique {
        conflict: Option<ConflictResolution>,
    },
    Check(Expr),
    Default(Expr),
    Collate(String),
    References(ForeignKeyClause),
    Generated {
        expr: Expr,
        storage: Option<GeneratedStorage>,
    },
}

/// A column constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConstraint {
    pub name: Option<String>,
    pub kind: ColumnConstraintKind,
}

impl ColumnConstraint {
    /// Creates an unnamed constraint.
    #[must_use]
    pub const fn new(kind: ColumnConstraintKind) -> Self {
        Self { name: None, kind }
    }
}

/// A column of an index, a table-level key or an upsert target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedColumn {
    /// Usually a bare column; indexes may use arbitrary expressions.
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
}

impl IndexedColumn {
    /// Creates an indexed column naming `name`.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            expr: Expr::column(name),
            direction: None,
        }
    }

    /// Returns the column name if this entry is a bare (possibly collated) column.
    #[must_use]
    pub fn column_name(&self) -> Option<&str> {
        let mut expr = &self.expr;
        while let Expr::Collate { expr: inner, .. } = expr {
            expr = inner;
        }
        match expr {
            Expr::Column(column) => Some(&column.name),
            _ => None,
        }
    }
}

/// The body of a table constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraintKind {
    PrimaryKey {
        columns: Vec<IndexedColumn>,
        conflict: Option<ConflictResolution>,
    },
    Unique {
        columns: Vec<IndexedColumn>,
        conflict: Option<ConflictResolution>,
    },
    Check(Expr),
    ForeignKey {
        columns: Vec<String>,
        clause: ForeignKeyClause,
    },
}

/// A table constraint with its optional `CONSTRAINT name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: TableConstraintKind,
}

impl TableConstraint {
    /// Creates an unnamed constraint.
    #[must_use]
    pub const fn new(kind: TableConstraintKind) -> Self {
        Self { name: None, kind }
    }
}

/// A column definition for CREATE TABLE.
///
/// Definitions are values: the `with_*` helpers consume the definition and
/// return a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Declared type; SQLite allows columns without one.
    pub data_type: Option<DataType>,
    /// Constraints in declaration order.
    pub constraints: Vec<ColumnConstraint>,
}

impl ColumnDef {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: Option<DataType>) -> Self {
        Self {
            name: name.into(),
            data_type,
            constraints: Vec::new(),
        }
    }

    fn find(&self, pred: impl Fn(&ColumnConstraintKind) -> bool) -> Option<&ColumnConstraintKind> {
        self.constraints
            .iter()
            .map(|c| &c.kind)
            .find(|kind| pred(kind))
    }

    /// Returns true if the column carries an inline PRIMARY KEY.
    #[must_use]
    pub fn is_primary_key(&self) -> bool {
        self.find(|k| matches!(k, ColumnConstraintKind::PrimaryKey { .. }))
            .is_some()
    }

    /// Returns true if the column is declared NOT NULL.
    #[must_use]
    pub fn is_not_null(&self) -> bool {
        self.find(|k| matches!(k, ColumnConstraintKind::NotNull { .. }))
            .is_some()
    }

    /// Returns true if the column is declared UNIQUE.
    #[must_use]
    pub fn is_unique(&self) -> bool {
        self.find(|k| matches!(k, ColumnConstraintKind::Unique { .. }))
            .is_some()
    }

    /// Returns true if the column is AUTOINCREMENT.
    #[must_use]
    pub fn is_autoincrement(&self) -> bool {
        self.find(|k| {
            matches!(
                k,
                ColumnConstraintKind::PrimaryKey {
                    autoincrement: true,
                    ..
                }
            )
        })
        .is_some()
    }

    /// Returns the DEFAULT expression.
    #[must_use]
    pub fn default_value(&self) -> Option<&Expr> {
        match self.find(|k| matches!(k, ColumnConstraintKind::Default(_))) {
            Some(ColumnConstraintKind::Default(expr)) => Some(expr),
            _ => None,
        }
    }

    /// Returns the first CHECK expression.
    #[must_use]
    pub fn check(&self) -> Option<&Expr> {
        match self.find(|k| matches!(k, ColumnConstraintKind::Check(_))) {
            Some(ColumnConstraintKind::Check(expr)) => Some(expr),
            _ => None,
        }
    }

    /// Returns the declared collation.
    #[must_use]
    pub fn collation(&self) -> Option<&str> {
        match self.find(|k| matches!(k, ColumnConstraintKind::Collate(_))) {
            Some(ColumnConstraintKind::Collate(name)) => Some(name),
            _ => None,
        }
    }

    /// Returns the definition under a new name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the definition with a new declared type.
    #[must_use]
    pub fn with_data_type(mut self, data_type: Option<DataType>) -> Self {
        self.data_type = data_type;
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn with_constraint(mut self, kind: ColumnConstraintKind) -> Self {
        self.constraints.push(ColumnConstraint::new(kind));
        self
    }

    /// Removes every constraint matching `pred`.
    #[must_use]
    pub fn without_constraints(mut self, pred: impl Fn(&ColumnConstraintKind) -> bool) -> Self {
        self.constraints.retain(|c| !pred(&c.kind));
        self
    }

    /// Sets or clears NOT NULL. An explicit `NULL` constraint is dropped either way.
    #[must_use]
    pub fn with_not_null(self, not_null: bool) -> Self {
        let column = self.without_constraints(|k| {
            matches!(
                k,
                ColumnConstraintKind::NotNull { .. } | ColumnConstraintKind::Null
            )
        });
        if not_null {
            column.with_constraint(ColumnConstraintKind::NotNull { conflict: None })
        } else {
            column
        }
    }

    /// Sets or clears UNIQUE.
    #[must_use]
    pub fn with_unique(self, unique: bool) -> Self {
        let column =
            self.without_constraints(|k| matches!(k, ColumnConstraintKind::Unique { .. }));
        if unique {
            column.with_constraint(ColumnConstraintKind::Unique { conflict: None })
        } else {
            column
        }
    }

    /// Replaces or clears the DEFAULT.
    #[must_use]
    pub fn with_default(self, default: Option<Expr>) -> Self {
        let column = self.without_constraints(|k| matches!(k, ColumnConstraintKind::Default(_)));
        match default {
            Some(expr) => column.with_constraint(ColumnConstraintKind::Default(expr)),
            None => column,
        }
    }

    /// Replaces or clears every CHECK.
    #[must_use]
    pub fn with_check(self, check: Option<Expr>) -> Self {
        let column = self.without_constraints(|k| matches!(k, ColumnConstraintKind::Check(_)));
        match check {
            Some(expr) => column.with_constraint(ColumnConstraintKind::Check(expr)),
            None => column,
        }
    }

    /// Marks the column as the sole PRIMARY KEY.
    #[must_use]
    pub fn with_primary_key(self) -> Self {
        self.without_primary_key()
            .with_constraint(ColumnConstraintKind::PrimaryKey {
                direction: None,
                conflict: None,
                autoincrement: false,
            })
    }

    /// Removes any inline PRIMARY KEY.
    #[must_use]
    pub fn without_primary_key(self) -> Self {
        self.without_constraints(|k| matches!(k, ColumnConstraintKind::PrimaryKey { .. }))
    }
}
