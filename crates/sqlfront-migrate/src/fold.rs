//! Folding steps into a target table definition.

use sqlfront_core::ast::{
    ColumnConstraintKind, ColumnDef, CreateTableBody, CreateTableStatement, Expr, IndexedColumn,
    QualifiedName, TableConstraint, TableConstraintKind, TableOptions,
};

use crate::dependents::ColumnMap;
use crate::error::PlanError;
use crate::operations::AlterationStep;

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn mentions_column(expr: &Expr, name: &str) -> bool {
    expr.any_column(|c| same(&c.name, name))
}

fn rename_column(expr: &mut Expr, old: &str, new: &str) {
    expr.walk_mut(&mut |e| {
        if let Expr::Column(column) = e {
            if same(&column.name, old) {
                column.name = new.to_string();
            }
        }
    });
}

/// A table definition with steps applied, plus the lineage of each column.
///
/// `origins[i]` is the name `columns[i]` had in the original table, or `None`
/// for columns added by the plan. An added column that reuses the name of an
/// original column no other column descends from takes that column's data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableFold {
    name: QualifiedName,
    temporary: bool,
    columns: Vec<ColumnDef>,
    constraints: Vec<TableConstraint>,
    options: TableOptions,
    origins: Vec<Option<String>>,
    original: Vec<String>,
}

impl TableFold {
    /// Starts a fold from the table's current definition.
    pub fn new(table: &CreateTableStatement) -> Result<Self, PlanError> {
        let CreateTableBody::Columns {
            columns,
            constraints,
            options,
        } = &table.body
        else {
            return Err(PlanError::UnknownTable(table.name.name.clone()));
        };
        Ok(Self {
            name: table.name.clone(),
            temporary: table.temporary,
            columns: columns.clone(),
            constraints: constraints.clone(),
            options: *options,
            origins: columns.iter().map(|c| Some(c.name.clone())).collect(),
            original: columns.iter().map(|c| c.name.clone()).collect(),
        })
    }

    /// Folds `steps` into `table` from scratch.
    pub fn replay(table: &CreateTableStatement, steps: &[AlterationStep]) -> Result<Self, PlanError> {
        let mut fold = Self::new(table)?;
        for step in steps {
            fold.apply(step)?;
        }
        Ok(fold)
    }

    /// The table name.
    #[must_use]
    pub const fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Current column definitions.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| same(&c.name, column))
    }

    fn require(&self, column: &str) -> Result<usize, PlanError> {
        self.position(column).ok_or_else(|| PlanError::NoSuchColumn {
            table: self.name.name.clone(),
            column: column.to_string(),
        })
    }

    /// Returns true if any column or table constraint declares a primary key.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(ColumnDef::is_primary_key)
            || self
                .constraints
                .iter()
                .any(|c| matches!(c.kind, TableConstraintKind::PrimaryKey { .. }))
    }

    /// Applies one step, validating it against the current state.
    ///
    /// On error the fold is left unchanged.
    pub fn apply(&mut self, step: &AlterationStep) -> Result<(), PlanError> {
        match step {
            AlterationStep::AddColumn(def) => self.add_column(def),
            AlterationStep::DropColumn(name) => self.drop_column(name),
            AlterationStep::ModifyColumn { old_name, changes } => {
                let index = self.require(old_name)?;
                let current_name = self.columns[index].name.clone();
                if let Some(new_name) = &changes.name {
                    if self.position(new_name).is_some_and(|existing| existing != index) {
                        return Err(PlanError::ColumnExists {
                            table: self.name.name.clone(),
                            column: new_name.clone(),
                        });
                    }
                }
                self.columns[index] = changes.apply(self.columns[index].clone());
                if let Some(new_name) = &changes.name {
                    if *new_name != current_name {
                        self.rename_references(&current_name, new_name);
                    }
                }
                Ok(())
            }
            AlterationStep::SetPrimaryKey(columns) => self.set_primary_key(columns),
        }
    }

    fn add_column(&mut self, def: &ColumnDef) -> Result<(), PlanError> {
        if self.position(&def.name).is_some() {
            return Err(PlanError::ColumnExists {
                table: self.name.name.clone(),
                column: def.name.clone(),
            });
        }
        if def.is_primary_key() && self.has_primary_key() {
            return Err(PlanError::PrimaryKeyConflict {
                table: self.name.name.clone(),
                column: def.name.clone(),
            });
        }
        let origin = self
            .original
            .iter()
            .find(|name| {
                same(name, &def.name)
                    && !self
                        .origins
                        .iter()
                        .flatten()
                        .any(|origin| same(origin, name))
            })
            .cloned();
        self.columns.push(def.clone());
        self.origins.push(origin);
        Ok(())
    }

    fn drop_column(&mut self, name: &str) -> Result<(), PlanError> {
        let index = self.require(name)?;
        if self.columns.len() == 1 {
            return Err(PlanError::LastColumn {
                table: self.name.name.clone(),
                column: name.to_string(),
            });
        }
        self.columns.remove(index);
        self.origins.remove(index);

        self.constraints.retain_mut(|constraint| match &mut constraint.kind {
            TableConstraintKind::PrimaryKey { columns, .. }
            | TableConstraintKind::Unique { columns, .. } => {
                columns.retain(|c| !mentions_column(&c.expr, name));
                !columns.is_empty()
            }
            TableConstraintKind::Check(expr) => !mentions_column(expr, name),
            TableConstraintKind::ForeignKey { columns, .. } => {
                !columns.iter().any(|c| same(c, name))
            }
        });
        for column in &mut self.columns {
            column.constraints.retain(|c| match &c.kind {
                ColumnConstraintKind::Check(expr) => !mentions_column(expr, name),
                _ => true,
            });
        }
        Ok(())
    }

    fn set_primary_key(&mut self, names: &[String]) -> Result<(), PlanError> {
        let mut indexes = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if names[..i].iter().any(|n| same(n, name)) {
                return Err(PlanError::DuplicatePrimaryKeyColumn(name.clone()));
            }
            indexes.push(self.require(name)?);
        }

        for column in &mut self.columns {
            if column.is_primary_key() {
                *column = column.clone().without_primary_key();
            }
        }
        self.constraints
            .retain(|c| !matches!(c.kind, TableConstraintKind::PrimaryKey { .. }));

        match indexes.as_slice() {
            [] => {}
            [index] => self.columns[*index] = self.columns[*index].clone().with_primary_key(),
            _ => {
                let columns = indexes
                    .iter()
                    .map(|&i| IndexedColumn::column(self.columns[i].name.clone()))
                    .collect();
                self.constraints.insert(
                    0,
                    TableConstraint::new(TableConstraintKind::PrimaryKey {
                        columns,
                        conflict: None,
                    }),
                );
            }
        }
        Ok(())
    }

    fn rename_references(&mut self, old: &str, new: &str) {
        for constraint in &mut self.constraints {
            match &mut constraint.kind {
                TableConstraintKind::PrimaryKey { columns, .. }
                | TableConstraintKind::Unique { columns, .. } => {
                    for column in columns {
                        rename_column(&mut column.expr, old, new);
                    }
                }
                TableConstraintKind::Check(expr) => rename_column(expr, old, new),
                TableConstraintKind::ForeignKey { columns, .. } => {
                    for column in columns.iter_mut().filter(|c| same(c, old)) {
                        *column = new.to_string();
                    }
                }
            }
        }
        for column in &mut self.columns {
            for constraint in &mut column.constraints {
                match &mut constraint.kind {
                    ColumnConstraintKind::Check(expr)
                    | ColumnConstraintKind::Generated { expr, .. } => {
                        rename_column(expr, old, new);
                    }
                    _ => {}
                }
            }
        }
    }

    /// Pairs of `(target, source)` column names whose data carries over,
    /// generated columns excluded.
    pub fn carried_columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(&self.origins)
            .filter(|(column, _)| !is_generated(column))
            .filter_map(|(column, origin)| Some((column.name.as_str(), origin.as_deref()?)))
    }

    /// Names of the columns that can be inserted into, in order.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| !is_generated(c))
            .map(|c| c.name.as_str())
    }

    /// How the original table's columns map onto the folded one.
    #[must_use]
    pub fn column_map(&self, original: &CreateTableStatement) -> ColumnMap {
        let mut map = ColumnMap::new();
        for column in original.columns() {
            let target = self
                .columns
                .iter()
                .zip(&self.origins)
                .find(|(_, origin)| origin.as_deref().is_some_and(|o| same(o, &column.name)));
            map = match target {
                Some((target, _)) if target.name != column.name => {
                    map.rename(column.name.clone(), target.name.clone())
                }
                Some(_) => map,
                None => map.drop_column(column.name.clone()),
            };
        }
        map
    }

    /// Renders the folded definition under `name`.
    #[must_use]
    pub fn to_table(&self, name: QualifiedName) -> CreateTableStatement {
        CreateTableStatement {
            temporary: self.temporary,
            if_not_exists: false,
            name,
            body: CreateTableBody::Columns {
                columns: self.columns.clone(),
                constraints: self.constraints.clone(),
                options: self.options,
            },
        }
    }
}

fn is_generated(column: &ColumnDef) -> bool {
    column
        .constraints
        .iter()
        .any(|c| matches!(c.kind, ColumnConstraintKind::Generated { .. }))
}
