//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Nodes compare structurally and render back to canonical SQL through
//! [`core::fmt::Display`].

mod ddl;
mod display;
mod expression;
mod statement;
mod types;

pub use ddl::{
    AlterTableAction, AlterTableStatement, CreateIndexStatement, CreateTableBody,
    CreateTableStatement, CreateTriggerStatement, CreateViewStatement, DropStatement, ObjectKind,
    TableOptions, TriggerEvent, TriggerTiming,
};
pub use display::Ident;
pub use expression::{
    precedence, BinaryOp, ColumnRef, Expr, FunctionArgs, FunctionCall, InTarget, LikeOp, Literal,
    QualifiedName, RaiseAction, UnaryOp,
};
pub use statement::{
    Assignment, CommonTableExpr, CompoundOperator, DeleteStatement, IndexHint, InsertSource,
    InsertStatement, JoinClause, JoinConstraint, JoinOperator, NullOrdering, OrderDirection,
    OrderingTerm, ResultColumn, SelectCore, SelectStatement, SimpleSelect, Statement, TableRef,
    UpdateStatement, UpsertAction, UpsertClause, WithClause,
};
pub use types::{
    ColumnConstraint, ColumnConstraintKind, ColumnDef, ConflictResolution, DataType, Deferrable,
    ForeignKeyAction, ForeignKeyClause, GeneratedStorage, IndexedColumn, InitialCheck,
    ReferentialAction, TableConstraint, TableConstraintKind,
};
