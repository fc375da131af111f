//! Error types for planning and applying table alterations.

use sqlfront_core::SqlError;

/// A step that cannot be applied to the table as it stands.
///
/// Raised by the `Plan` builders before any statement is emitted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    /// The step names a column the table does not have.
    #[error("Table '{table}' has no column '{column}'")]
    NoSuchColumn {
        /// Table being altered.
        table: String,
        /// The missing column.
        column: String,
    },

    /// Adding or renaming onto a name that is already taken.
    #[error("Table '{table}' already has a column '{column}'")]
    ColumnExists {
        /// Table being altered.
        table: String,
        /// The clashing column name.
        column: String,
    },

    /// A table must keep at least one column.
    #[error("Cannot drop '{column}': it is the last column of '{table}'")]
    LastColumn {
        /// Table being altered.
        table: String,
        /// The column that would have been dropped.
        column: String,
    },

    /// The same column listed twice in a primary key.
    #[error("Column '{0}' appears more than once in the primary key")]
    DuplicatePrimaryKeyColumn(String),

    /// A column declares PRIMARY KEY while the table already has one.
    #[error("Column '{column}' declares a primary key but '{table}' already has one")]
    PrimaryKeyConflict {
        /// Table being altered.
        table: String,
        /// The column carrying the second key.
        column: String,
    },

    /// The table definition has no column list to alter.
    #[error("Table '{0}' has no column list (CREATE TABLE ... AS SELECT)")]
    UnknownTable(String),

    /// A column definition, type, default or check failed to parse.
    #[error("Invalid definition '{text}': {source}")]
    InvalidDefinition {
        /// The text as given.
        text: String,
        /// Why it was rejected.
        #[source]
        source: SqlError,
    },
}

/// Errors raised while building or executing a plan against a catalog.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The table changed since the plan was started.
    #[error("Definition of '{0}' changed since the plan was created")]
    StaleDefinition(String),

    /// The catalog has no such table.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The catalog could not be read.
    #[error("Failed to read schema for '{table}': {message}")]
    SchemaRead {
        /// Table whose definition was requested.
        table: String,
        /// Error reported by the reader.
        message: String,
    },

    /// A stored definition could not be parsed.
    #[error("Failed to parse stored definition of '{name}': {source}")]
    UnparseableDefinition {
        /// Catalog object name.
        name: String,
        /// The parse failure.
        #[source]
        source: SqlError,
    },

    /// A step was rejected while folding.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A statement failed during execution.
    #[error("Statement {step} failed: {message}\n  {sql}")]
    Execution {
        /// Index of the failing statement in the plan output.
        step: usize,
        /// The failing statement.
        sql: String,
        /// Error reported by the executor.
        message: String,
    },
}

/// Result type for building and executing plans.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Errors raised by the SQLite host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Planning or execution error.
    #[error(transparent)]
    Migration(#[from] MigrationError),

    /// The rebuilt schema left dangling foreign keys; nothing was committed.
    #[error("Foreign key check failed: {count} violation(s), first in '{table}'")]
    ForeignKeyViolation {
        /// Table holding the first violating row.
        table: String,
        /// Number of violating rows.
        count: usize,
    },
}
