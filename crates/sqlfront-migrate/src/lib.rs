//! Table alterations for SQLite by rebuild.
//!
//! SQLite's `ALTER TABLE` cannot drop a constraint, change a column type or
//! move the primary key. `sqlfront-migrate` does it the long way:
//!
//! - **Plan** - collects add/drop/modify/primary-key steps for one table,
//!   validating each against the definition folded so far
//! - **Rebuild** - copies the rows aside, recreates the table and copies
//!   them back
//! - **Dependents** - re-parses every index, view and trigger that mentions
//!   the table and rewrites it for renamed or dropped columns
//! - **Executor** - runs the statements in one transaction
//!
//! # Example
//!
//! ```rust
//! use sqlfront_migrate::prelude::*;
//!
//! let catalog = CatalogSnapshot::from_script(
//!     "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INT);
//!      CREATE VIEW names AS SELECT name FROM users;",
//! )
//! .unwrap();
//!
//! let mut plan = Plan::load(&catalog, "users").unwrap();
//! plan.drop_column("age")
//!     .unwrap()
//!     .modify_column("name", ColumnChanges::new().rename("full_name"))
//!     .unwrap();
//!
//! let statements = plan.build(&catalog).unwrap();
//! assert_eq!(statements.len(), 8);
//! assert_eq!(
//!     statements[7],
//!     "CREATE VIEW [names] AS SELECT [full_name] FROM [users]"
//! );
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Pretty-print a script in canonical form
//! sqlfront format schema.sql
//!
//! # Show the statements a plan would run
//! sqlfront plan --table users --steps steps.json
//!
//! # Apply a plan
//! sqlfront --database sqlite:app.db alter --table users --steps steps.json
//! ```

pub mod catalog;
pub mod dependents;
pub mod error;
pub mod executor;
pub mod fold;
pub mod operations;
pub mod plan;
pub mod rebuild;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{CatalogSnapshot, SchemaObject, SchemaReader};
    pub use crate::dependents::{ColumnMap, DependentPatcher};
    pub use crate::error::{HostError, MigrationError, PlanError, Result};
    pub use crate::executor::{SqliteHost, StatementExecutor};
    pub use crate::fold::TableFold;
    pub use crate::operations::{AlterationStep, ColumnChanges, StepSpec};
    pub use crate::plan::Plan;
    pub use crate::rebuild::{rebuild_statements, scratch_name, REBUILD_PREFIX};
}
