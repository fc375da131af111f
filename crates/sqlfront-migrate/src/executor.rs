//! Statement execution.
//!
//! A plan hands its statements to a [`StatementExecutor`] as one batch.
//! [`SqliteHost`] runs the batch inside a single transaction on a SQLite pool,
//! with foreign key enforcement suspended for the rebuild and a
//! `foreign_key_check` before commit.

use std::future::Future;

use sqlfront_core::ast::ObjectKind;
use sqlx::sqlite::{SqliteConnection, SqlitePool};
use sqlx::{Connection, Row};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogSnapshot, SchemaObject};
use crate::error::{HostError, MigrationError};
use crate::plan::Plan;

const CATALOG_SQL: &str = "SELECT type, name, tbl_name, sql FROM sqlite_master \
     WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' ORDER BY rowid";

/// Runs the statements produced by a plan.
///
/// Implementations must apply the batch atomically: either every statement
/// takes effect or none does.
pub trait StatementExecutor {
    /// Error reported by the executor; plan failures convert into it.
    type Error: From<MigrationError>;

    /// Executes `statements` in order as one unit.
    fn execute_batch(
        &mut self,
        statements: &[String],
    ) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Executes alteration plans against a SQLite database.
pub struct SqliteHost {
    pool: SqlitePool,
    dry_run: bool,
}

impl SqliteHost {
    /// Creates a host on `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            dry_run: false,
        }
    }

    /// In dry-run mode statements are printed instead of executed.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Reads `sqlite_master` into a snapshot.
    pub async fn snapshot(&self) -> Result<CatalogSnapshot, HostError> {
        let rows: Vec<(String, String, String, String)> =
            sqlx::query_as(CATALOG_SQL).fetch_all(&self.pool).await?;

        let mut objects = Vec::with_capacity(rows.len());
        for (kind, name, table, sql) in rows {
            match ObjectKind::from_catalog(&kind) {
                Some(kind) => objects.push(SchemaObject::new(kind, name, table, sql)),
                None => warn!(kind = %kind, name = %name, "Skipping unknown catalog entry"),
            }
        }
        debug!(objects = objects.len(), "Read schema catalog");
        Ok(CatalogSnapshot::from_objects(objects))
    }

    /// Starts a plan for `table` from the live catalog.
    pub async fn plan(&self, table: &str) -> Result<Plan, HostError> {
        let snapshot = self.snapshot().await?;
        Ok(Plan::load(&snapshot, table)?)
    }

    /// Builds `plan` against a fresh read of the catalog and applies it.
    pub async fn alter(&mut self, plan: Plan) -> Result<(), HostError> {
        let current = self.snapshot().await?;
        let table = plan.table().to_string();
        plan.execute(&current, self).await?;
        if !self.dry_run {
            info!(table = %table, "Table altered successfully");
        }
        Ok(())
    }
}

async fn run_batch(conn: &mut SqliteConnection, statements: &[String]) -> Result<(), HostError> {
    let mut tx = conn.begin().await?;

    for (step, sql) in statements.iter().enumerate() {
        debug!(step, sql = %sql, "Executing SQL");
        if let Err(err) = sqlx::query(sql).execute(&mut *tx).await {
            tx.rollback().await?;
            return Err(MigrationError::Execution {
                step,
                sql: sql.clone(),
                message: err.to_string(),
            }
            .into());
        }
    }

    let violations = sqlx::query("PRAGMA foreign_key_check")
        .fetch_all(&mut *tx)
        .await?;
    if let Some(first) = violations.first() {
        let table: String = first.try_get(0)?;
        let count = violations.len();
        tx.rollback().await?;
        return Err(HostError::ForeignKeyViolation { table, count });
    }

    tx.commit().await?;
    Ok(())
}

impl StatementExecutor for SqliteHost {
    type Error = HostError;

    async fn execute_batch(&mut self, statements: &[String]) -> Result<(), HostError> {
        if self.dry_run {
            for sql in statements {
                println!("{sql};");
            }
            return Ok(());
        }

        let mut conn = self.pool.acquire().await?;

        // PRAGMA foreign_keys is a no-op inside a transaction.
        let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&mut *conn)
            .await?;
        if enabled != 0 {
            sqlx::query("PRAGMA foreign_keys = OFF")
                .execute(&mut *conn)
                .await?;
        }

        let outcome = run_batch(&mut conn, statements).await;
        if enabled == 0 {
            return outcome;
        }

        let restored = sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&mut *conn)
            .await
            .map(|_| ())
            .map_err(HostError::from);
        settle(outcome, restored)
    }
}

/// Combines the batch result with re-enabling foreign keys.
///
/// A failed batch keeps its own error; a failed restore after it is logged.
fn settle(
    outcome: Result<(), HostError>,
    restored: Result<(), HostError>,
) -> Result<(), HostError> {
    match (outcome, restored) {
        (Err(err), Err(restore)) => {
            warn!(error = %restore, "Failed to restore foreign key enforcement");
            Err(err)
        }
        (Ok(()), restored) => restored,
        (outcome, Ok(())) => outcome,
    }
}
