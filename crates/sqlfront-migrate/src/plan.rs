//! Alteration plans.
//!
//! A [`Plan`] collects the steps for one table, checking each against the
//! definition folded so far, and turns them into the statement list that
//! rebuilds the table and refreshes its dependents.

use sqlfront_core::ast::{ColumnDef, CreateTableStatement, Statement};
use sqlfront_core::parse_statement;
use tracing::{debug, info};

use crate::catalog::SchemaReader;
use crate::dependents::DependentPatcher;
use crate::error::{MigrationError, PlanError, Result};
use crate::executor::StatementExecutor;
use crate::fold::TableFold;
use crate::operations::{AlterationStep, ColumnChanges};
use crate::rebuild::rebuild_statements;

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Parses stored creation text, which must be a `CREATE TABLE`.
fn parse_table(table: &str, sql: &str) -> Result<CreateTableStatement> {
    match parse_statement(sql) {
        Ok(Statement::CreateTable(definition)) => Ok(definition),
        Ok(_) => Err(MigrationError::TableNotFound(table.to_string())),
        Err(source) => Err(MigrationError::UnparseableDefinition {
            name: table.to_string(),
            source,
        }),
    }
}

fn read_table<R: SchemaReader>(reader: &R, table: &str) -> Result<CreateTableStatement> {
    let sql = reader
        .table_sql(table)
        .map_err(|e| MigrationError::SchemaRead {
            table: table.to_string(),
            message: e.to_string(),
        })?
        .ok_or_else(|| MigrationError::TableNotFound(table.to_string()))?;
    parse_table(table, &sql)
}

/// The ordered, deduplicated steps for one table.
#[derive(Debug, Clone)]
pub struct Plan {
    table: String,
    snapshot: CreateTableStatement,
    steps: Vec<AlterationStep>,
    working: TableFold,
}

impl Plan {
    /// Starts an empty plan against the table's current definition.
    pub fn new(
        table: impl Into<String>,
        current: CreateTableStatement,
    ) -> std::result::Result<Self, PlanError> {
        let working = TableFold::new(&current)?;
        Ok(Self {
            table: table.into(),
            snapshot: current,
            steps: Vec::new(),
            working,
        })
    }

    /// Starts an empty plan from the definition `reader` reports for `table`.
    pub fn load<R: SchemaReader>(reader: &R, table: &str) -> Result<Self> {
        let current = read_table(reader, table)?;
        Ok(Self::new(table, current)?)
    }

    /// The table being altered.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The steps, after redundancy elimination.
    #[must_use]
    pub fn steps(&self) -> &[AlterationStep] {
        &self.steps
    }

    /// Returns true if the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The definition the table will have once the plan runs.
    #[must_use]
    pub fn target(&self) -> CreateTableStatement {
        self.working.to_table(self.snapshot.name.clone())
    }

    /// Appends a column.
    pub fn add_column(&mut self, column: ColumnDef) -> std::result::Result<&mut Self, PlanError> {
        self.push(AlterationStep::AddColumn(column))
    }

    /// Drops a column.
    pub fn drop_column(&mut self, column: &str) -> std::result::Result<&mut Self, PlanError> {
        self.push(AlterationStep::DropColumn(column.to_string()))
    }

    /// Changes a column; unspecified attributes are kept.
    pub fn modify_column(
        &mut self,
        column: &str,
        changes: ColumnChanges,
    ) -> std::result::Result<&mut Self, PlanError> {
        self.push(AlterationStep::ModifyColumn {
            old_name: column.to_string(),
            changes,
        })
    }

    /// Replaces the primary key; an empty list removes it.
    pub fn set_primary_key<I, S>(&mut self, columns: I) -> std::result::Result<&mut Self, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(AlterationStep::SetPrimaryKey(
            columns.into_iter().map(Into::into).collect(),
        ))
    }

    /// Validates `step` against the working definition and records it.
    ///
    /// A rejected step leaves the plan unchanged.
    pub fn push(&mut self, step: AlterationStep) -> std::result::Result<&mut Self, PlanError> {
        if let AlterationStep::ModifyColumn { changes, .. } = &step {
            if changes.is_empty() {
                return Ok(self);
            }
        }
        self.working.clone().apply(&step)?;

        let mut steps = self.steps.clone();
        self.merge(&mut steps, step);
        self.working = TableFold::replay(&self.snapshot, &steps)?;
        self.steps = steps;
        Ok(self)
    }

    /// Adds `step` to `steps`, cancelling it against earlier steps where the
    /// pair has no net effect.
    fn merge(&self, steps: &mut Vec<AlterationStep>, step: AlterationStep) {
        let untouched_after = |steps: &[AlterationStep], i: usize, column: &str| {
            !steps[i + 1..].iter().any(|s| s.mentions(column))
        };

        match &step {
            AlterationStep::DropColumn(column) => {
                let added = steps.iter().position(
                    |s| matches!(s, AlterationStep::AddColumn(def) if same(&def.name, column)),
                );
                if let Some(i) = added {
                    if untouched_after(steps.as_slice(), i, column) {
                        debug!(table = %self.table, column = %column, "Added column dropped again");
                        steps.remove(i);
                        return;
                    }
                }
            }
            AlterationStep::AddColumn(def) => {
                let dropped = steps.iter().position(
                    |s| matches!(s, AlterationStep::DropColumn(name) if same(name, &def.name)),
                );
                if let Some(i) = dropped {
                    let unchanged = self.snapshot.column(&def.name) == Some(def);
                    let untouched_before = !steps[..i].iter().any(|s| s.mentions(&def.name));
                    if unchanged
                        && untouched_before
                        && untouched_after(steps.as_slice(), i, &def.name)
                    {
                        debug!(table = %self.table, column = %def.name, "Dropped column restored");
                        steps.remove(i);
                        return;
                    }
                }
            }
            AlterationStep::ModifyColumn { old_name, changes } => {
                let added = steps.iter().position(
                    |s| matches!(s, AlterationStep::AddColumn(def) if same(&def.name, old_name)),
                );
                if let Some(i) = added {
                    if untouched_after(steps.as_slice(), i, old_name) {
                        if let AlterationStep::AddColumn(def) = &mut steps[i] {
                            *def = changes.apply(def.clone());
                        }
                        return;
                    }
                }
            }
            AlterationStep::SetPrimaryKey(_) => {}
        }
        steps.push(step);
    }

    /// Produces the statements that carry out the plan.
    ///
    /// The table's definition is re-read first; if it no longer matches the
    /// one the plan was started from, the build fails with
    /// [`MigrationError::StaleDefinition`]. An empty plan yields no statements.
    pub fn build<R: SchemaReader>(&self, reader: &R) -> Result<Vec<String>> {
        let current = read_table(reader, &self.table)?;
        if current != self.snapshot {
            return Err(MigrationError::StaleDefinition(self.table.clone()));
        }
        if self.steps.is_empty() {
            return Ok(Vec::new());
        }

        let fold = TableFold::replay(&current, &self.steps)?;
        let mut statements: Vec<String> = rebuild_statements(&fold)
            .iter()
            .map(ToString::to_string)
            .collect();

        let map = fold.column_map(&current);
        let patcher = DependentPatcher::new(&self.table, &map);
        let dependents = reader
            .dependents(&self.table)
            .map_err(|e| MigrationError::SchemaRead {
                table: self.table.clone(),
                message: e.to_string(),
            })?;
        for object in &dependents {
            statements.extend(patcher.patch(object)?);
        }

        debug!(
            table = %self.table,
            steps = self.steps.len(),
            statements = statements.len(),
            "Built alteration plan"
        );
        Ok(statements)
    }

    /// Builds the plan and hands the statements to `executor` as one batch.
    pub async fn execute<R, E>(
        self,
        reader: &R,
        executor: &mut E,
    ) -> std::result::Result<(), E::Error>
    where
        R: SchemaReader,
        E: StatementExecutor,
    {
        let statements = self.build(reader)?;
        if statements.is_empty() {
            info!(table = %self.table, "Nothing to alter");
            return Ok(());
        }
        for step in &self.steps {
            info!(table = %self.table, step = %step.describe(), "Altering table");
        }
        executor.execute_batch(&statements).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSnapshot;
    use sqlfront_core::ast::Expr;
    use sqlfront_core::parse_column_def;

    const SCHEMA: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, age INT);
        CREATE INDEX idx_age ON users (age);
        CREATE VIEW adults AS SELECT name FROM users WHERE age >= 18;";

    fn snapshot() -> CatalogSnapshot {
        CatalogSnapshot::from_script(SCHEMA).unwrap()
    }

    fn column(sql: &str) -> ColumnDef {
        parse_column_def(sql).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        batches: Vec<Vec<String>>,
    }

    impl StatementExecutor for Recorder {
        type Error = MigrationError;

        async fn execute_batch(&mut self, statements: &[String]) -> Result<()> {
            self.batches.push(statements.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_empty_plan_builds_nothing() {
        let plan = Plan::load(&snapshot(), "users").unwrap();
        assert!(plan.is_empty());
        assert!(plan.build(&snapshot()).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_table() {
        assert!(matches!(
            Plan::load(&snapshot(), "nope"),
            Err(MigrationError::TableNotFound(ref t)) if t == "nope"
        ));
    }

    #[test]
    fn test_add_then_drop_cancels() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.add_column(column("email TEXT")).unwrap();
        plan.drop_column("EMAIL").unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_drop_then_add_equivalent_cancels() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.drop_column("age").unwrap();
        plan.add_column(column("age INT")).unwrap();
        assert!(plan.is_empty());

        plan.drop_column("age").unwrap();
        plan.add_column(column("age BIGINT")).unwrap();
        assert_eq!(plan.steps().len(), 2);
    }

    #[test]
    fn test_modify_after_add_folds_into_add() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.add_column(column("email TEXT"))
            .unwrap()
            .modify_column(
                "email",
                ColumnChanges::new().set_not_null(true).set_default(Expr::string("")),
            )
            .unwrap();
        assert_eq!(
            plan.steps(),
            &[AlterationStep::AddColumn(column("email TEXT NOT NULL DEFAULT ''"))]
        );
    }

    #[test]
    fn test_rejected_step_leaves_plan_unchanged() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.drop_column("age").unwrap();
        let before = plan.steps().to_vec();

        assert!(matches!(
            plan.modify_column("age", ColumnChanges::new().set_unique(true)),
            Err(PlanError::NoSuchColumn { .. })
        ));
        assert!(matches!(
            plan.modify_column("name", ColumnChanges::new().rename("ID")),
            Err(PlanError::ColumnExists { .. })
        ));
        assert!(matches!(
            plan.set_primary_key(["name", "name"]),
            Err(PlanError::DuplicatePrimaryKeyColumn(_))
        ));
        assert_eq!(plan.steps(), before.as_slice());
    }

    #[test]
    fn test_empty_changes_are_ignored() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.modify_column("name", ColumnChanges::new()).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_build_rebuilds_and_patches_dependents() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.modify_column("age", ColumnChanges::new().rename("years"))
            .unwrap();
        let statements = plan.build(&snapshot()).unwrap();

        assert_eq!(statements.len(), 10);
        assert_eq!(
            statements[3],
            "CREATE TABLE [users] ([id] INTEGER PRIMARY KEY, [name] TEXT NOT NULL, [years] INT)"
        );
        assert_eq!(
            &statements[6..],
            &[
                "DROP INDEX IF EXISTS [idx_age]",
                "CREATE INDEX [idx_age] ON [users] ([years])",
                "DROP VIEW IF EXISTS [adults]",
                "CREATE VIEW [adults] AS SELECT [name] FROM [users] WHERE [years] >= 18",
            ]
        );
        assert_eq!(plan.target().to_string(), statements[3]);
    }

    #[test]
    fn test_readded_column_keeps_data_and_dependents() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.drop_column("age")
            .unwrap()
            .add_column(column("age BIGINT"))
            .unwrap();
        let statements = plan.build(&snapshot()).unwrap();

        assert_eq!(
            statements[1],
            "INSERT INTO [__sqlfront_rebuild_users] ([id], [name], [age]) \
             SELECT [id], [name], [age] FROM [users]"
        );
        assert!(statements
            .iter()
            .any(|s| s == "CREATE INDEX [idx_age] ON [users] ([age])"));
        assert!(statements.iter().any(
            |s| s == "CREATE VIEW [adults] AS SELECT [name] FROM [users] WHERE [age] >= 18"
        ));
    }

    #[test]
    fn test_build_detects_stale_definition() {
        let plan = {
            let mut plan = Plan::load(&snapshot(), "users").unwrap();
            plan.drop_column("age").unwrap();
            plan
        };
        let mut changed = snapshot();
        changed.insert(
            crate::catalog::SchemaObject::from_statement(
                &parse_statement("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)").unwrap(),
            )
            .unwrap(),
        );
        assert!(matches!(
            plan.build(&changed),
            Err(MigrationError::StaleDefinition(ref t)) if t == "users"
        ));
    }

    #[test]
    fn test_execute_hands_one_batch_to_executor() {
        let mut plan = Plan::load(&snapshot(), "users").unwrap();
        plan.drop_column("age").unwrap();

        let mut recorder = Recorder::default();
        tokio_test::block_on(plan.execute(&snapshot(), &mut recorder)).unwrap();

        assert_eq!(recorder.batches.len(), 1);
        let batch = &recorder.batches[0];
        assert_eq!(batch.len(), 9);
        assert_eq!(batch[6], "DROP INDEX IF EXISTS [idx_age]");
        assert_eq!(batch[7], "DROP VIEW IF EXISTS [adults]");
        assert_eq!(batch[8], "CREATE VIEW [adults] AS SELECT [name] FROM [users]");
    }
}
