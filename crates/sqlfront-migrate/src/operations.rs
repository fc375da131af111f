//! Alteration steps.
//!
//! A step is one change to one table: add, drop or modify a column, or
//! replace the primary key. Steps are value objects; [`StepSpec`] is their
//! JSON form for step files.

use serde::{Deserialize, Serialize};
use sqlfront_core::ast::{ColumnDef, DataType, Expr};
use sqlfront_core::{parse_column_def, parse_expression};

use crate::error::PlanError;

/// Changes to apply to a column in a `ModifyColumn` step.
///
/// Only the attributes set here change; the rest of the definition is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnChanges {
    /// New column name.
    pub name: Option<String>,
    /// New declared type; `Some(None)` removes the type.
    pub data_type: Option<Option<DataType>>,
    /// New nullability.
    pub not_null: Option<bool>,
    /// New unique constraint.
    pub unique: Option<bool>,
    /// New default; `Some(None)` removes it.
    pub default: Option<Option<Expr>>,
    /// New check; `Some(None)` removes every check.
    pub check: Option<Option<Expr>>,
}

impl ColumnChanges {
    /// Creates empty column changes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the column.
    #[must_use]
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new type.
    #[must_use]
    pub fn set_type(mut self, data_type: Option<DataType>) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Sets nullability.
    #[must_use]
    pub fn set_not_null(mut self, not_null: bool) -> Self {
        self.not_null = Some(not_null);
        self
    }

    /// Sets unique constraint.
    #[must_use]
    pub fn set_unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Sets default value.
    #[must_use]
    pub fn set_default(mut self, default: Expr) -> Self {
        self.default = Some(Some(default));
        self
    }

    /// Removes the default value.
    #[must_use]
    pub fn drop_default(mut self) -> Self {
        self.default = Some(None);
        self
    }

    /// Sets the check expression.
    #[must_use]
    pub fn set_check(mut self, check: Expr) -> Self {
        self.check = Some(Some(check));
        self
    }

    /// Removes every check on the column.
    #[must_use]
    pub fn drop_check(mut self) -> Self {
        self.check = Some(None);
        self
    }

    /// Returns true if no changes are specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.data_type.is_none()
            && self.not_null.is_none()
            && self.unique.is_none()
            && self.default.is_none()
            && self.check.is_none()
    }

    /// Applies the changes to `column`, returning the new definition.
    #[must_use]
    pub fn apply(&self, column: ColumnDef) -> ColumnDef {
        let mut column = column;
        if let Some(name) = &self.name {
            column = column.with_name(name.clone());
        }
        if let Some(data_type) = &self.data_type {
            column = column.with_data_type(data_type.clone());
        }
        if let Some(not_null) = self.not_null {
            column = column.with_not_null(not_null);
        }
        if let Some(unique) = self.unique {
            column = column.with_unique(unique);
        }
        if let Some(default) = &self.default {
            column = column.with_default(default.clone());
        }
        if let Some(check) = &self.check {
            column = column.with_check(check.clone());
        }
        column
    }
}

/// One alteration of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterationStep {
    /// Append a column.
    AddColumn(ColumnDef),
    /// Remove a column and everything that only exists for it.
    DropColumn(String),
    /// Replace a column's definition, keeping its data.
    ModifyColumn {
        /// Name of the column before the change.
        old_name: String,
        /// What changes.
        changes: ColumnChanges,
    },
    /// Replace the primary key; an empty list removes it.
    SetPrimaryKey(Vec<String>),
}

impl AlterationStep {
    /// Returns true if the step names `column` in any role.
    #[must_use]
    pub fn mentions(&self, column: &str) -> bool {
        match self {
            Self::AddColumn(def) => def.name.eq_ignore_ascii_case(column),
            Self::DropColumn(name) => name.eq_ignore_ascii_case(column),
            Self::ModifyColumn { old_name, changes } => {
                old_name.eq_ignore_ascii_case(column)
                    || changes
                        .name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(column))
            }
            Self::SetPrimaryKey(columns) => columns.iter().any(|c| c.eq_ignore_ascii_case(column)),
        }
    }

    /// Returns a short human-readable description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::AddColumn(def) => format!("Add column {def}"),
            Self::DropColumn(name) => format!("Drop column {name}"),
            Self::ModifyColumn { old_name, changes } => match &changes.name {
                Some(new) if new != old_name => format!("Modify column {old_name} (as {new})"),
                _ => format!("Modify column {old_name}"),
            },
            Self::SetPrimaryKey(columns) if columns.is_empty() => "Remove primary key".into(),
            Self::SetPrimaryKey(columns) => format!("Set primary key ({})", columns.join(", ")),
        }
    }
}

/// A step as written in a step file.
///
/// ```json
/// [
///   {"op": "add_column", "definition": "d FLOAT"},
///   {"op": "modify_column", "column": "name", "rename": "full_name", "not_null": true},
///   {"op": "drop_column", "column": "legacy"},
///   {"op": "set_primary_key", "columns": ["id"]}
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StepSpec {
    AddColumn {
        /// Column definition text, e.g. `d FLOAT NOT NULL DEFAULT 0`.
        definition: String,
    },
    DropColumn {
        column: String,
    },
    ModifyColumn {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rename: Option<String>,
        /// Type text; an empty string removes the type.
        #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
        data_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        not_null: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unique: Option<bool>,
        /// Default text as it would follow `DEFAULT`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
        #[serde(default)]
        drop_default: bool,
        /// Check expression text, without the surrounding parentheses.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        check: Option<String>,
        #[serde(default)]
        drop_check: bool,
    },
    SetPrimaryKey {
        columns: Vec<String>,
    },
}

impl StepSpec {
    /// Parses the embedded SQL fragments into a step.
    pub fn into_step(self) -> Result<AlterationStep, PlanError> {
        Ok(match self {
            Self::AddColumn { definition } => {
                AlterationStep::AddColumn(parse_column_def(&definition).map_err(|source| {
                    PlanError::InvalidDefinition {
                        text: definition.clone(),
                        source,
                    }
                })?)
            }
            Self::DropColumn { column } => AlterationStep::DropColumn(column),
            Self::ModifyColumn {
                column,
                rename,
                data_type,
                not_null,
                unique,
                default,
                drop_default,
                check,
                drop_check,
            } => {
                let mut changes = ColumnChanges::new();
                changes.name = rename;
                changes.not_null = not_null;
                changes.unique = unique;
                if let Some(text) = data_type {
                    changes = changes.set_type(parse_type(&text)?);
                }
                if let Some(text) = default {
                    changes = changes.set_default(parse_default(&text)?);
                } else if drop_default {
                    changes = changes.drop_default();
                }
                if let Some(text) = check {
                    let expr = parse_expression(&text)
                        .map_err(|source| PlanError::InvalidDefinition { text, source })?;
                    changes = changes.set_check(expr);
                } else if drop_check {
                    changes = changes.drop_check();
                }
                AlterationStep::ModifyColumn {
                    old_name: column,
                    changes,
                }
            }
            Self::SetPrimaryKey { columns } => AlterationStep::SetPrimaryKey(columns),
        })
    }
}

// Types and defaults go through the column-definition grammar so that they
// accept exactly what a CREATE TABLE would.
fn parse_type(text: &str) -> Result<Option<DataType>, PlanError> {
    parse_column_def(&format!("x {text}"))
        .map(|def| def.data_type)
        .map_err(|source| PlanError::InvalidDefinition {
            text: text.to_string(),
            source,
        })
}

fn parse_default(text: &str) -> Result<Expr, PlanError> {
    let def = parse_column_def(&format!("x DEFAULT {text}")).map_err(|source| {
        PlanError::InvalidDefinition {
            text: text.to_string(),
            source,
        }
    })?;
    Ok(def.default_value().cloned().unwrap_or_else(Expr::null))
}
