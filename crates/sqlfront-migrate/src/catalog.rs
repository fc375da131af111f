//! Read access to the schema catalog.
//!
//! The planner never talks to a database directly. It asks a [`SchemaReader`]
//! for the creation text of the table and of every object that may depend on
//! it, and re-parses that text itself.

use std::convert::Infallible;

use sqlfront_core::ast::{ObjectKind, Statement};
use sqlfront_core::{parse_statements, SqlError};

/// One row of the catalog: a table, view, index or trigger with its SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaObject {
    /// Object type.
    pub kind: ObjectKind,
    /// Object name.
    pub name: String,
    /// Table the object belongs to; the object's own name for tables and views.
    pub table: String,
    /// Creation text as stored.
    pub sql: String,
}

impl SchemaObject {
    /// Creates a catalog entry.
    #[must_use]
    pub fn new(
        kind: ObjectKind,
        name: impl Into<String>,
        table: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            table: table.into(),
            sql: sql.into(),
        }
    }

    /// Builds an entry from a parsed CREATE statement, rendering it canonically.
    #[must_use]
    pub fn from_statement(statement: &Statement) -> Option<Self> {
        let (kind, name, table) = match statement {
            Statement::CreateTable(s) => (ObjectKind::Table, &s.name.name, &s.name.name),
            Statement::CreateView(s) => (ObjectKind::View, &s.name.name, &s.name.name),
            Statement::CreateIndex(s) => (ObjectKind::Index, &s.name.name, &s.table),
            Statement::CreateTrigger(s) => (ObjectKind::Trigger, &s.name.name, &s.table),
            _ => return None,
        };
        Some(Self::new(kind, name, table, statement.to_string()))
    }
}

/// Source of table and dependent definitions.
pub trait SchemaReader {
    /// Error reported by the underlying catalog.
    type Error: std::fmt::Display;

    /// Returns the creation text of `table`, or `None` if it does not exist.
    fn table_sql(&self, table: &str) -> Result<Option<String>, Self::Error>;

    /// Returns every view, index and trigger that may reference `table`.
    ///
    /// Over-reporting is fine: the planner re-parses each candidate and skips
    /// the ones that turn out not to reference the table.
    fn dependents(&self, table: &str) -> Result<Vec<SchemaObject>, Self::Error>;
}

/// An in-memory copy of a catalog.
///
/// The SQLite host produces one from `sqlite_master`; tests and offline
/// tools can build one from a script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSnapshot {
    objects: Vec<SchemaObject>,
}

impl CatalogSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a snapshot holding `objects`, in catalog order.
    #[must_use]
    pub const fn from_objects(objects: Vec<SchemaObject>) -> Self {
        Self { objects }
    }

    /// Parses a schema script; every CREATE statement becomes one entry.
    pub fn from_script(sql: &str) -> Result<Self, SqlError> {
        let objects = parse_statements(sql)?
            .iter()
            .filter_map(SchemaObject::from_statement)
            .collect();
        Ok(Self { objects })
    }

    /// Adds an entry, replacing any object of the same kind and name.
    pub fn insert(&mut self, object: SchemaObject) {
        self.objects
            .retain(|o| !(o.kind == object.kind && o.name.eq_ignore_ascii_case(&object.name)));
        self.objects.push(object);
    }

    /// Returns all entries.
    #[must_use]
    pub fn objects(&self) -> &[SchemaObject] {
        &self.objects
    }

    /// Looks an entry up by kind and name, case-insensitively.
    #[must_use]
    pub fn get(&self, kind: ObjectKind, name: &str) -> Option<&SchemaObject> {
        self.objects
            .iter()
            .find(|o| o.kind == kind && o.name.eq_ignore_ascii_case(name))
    }
}

impl SchemaReader for CatalogSnapshot {
    type Error = Infallible;

    fn table_sql(&self, table: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.get(ObjectKind::Table, table).map(|o| o.sql.clone()))
    }

    fn dependents(&self, table: &str) -> Result<Vec<SchemaObject>, Self::Error> {
        let needle = table.to_ascii_lowercase();
        Ok(self
            .objects
            .iter()
            .filter(|o| o.kind != ObjectKind::Table)
            .filter(|o| {
                o.table.eq_ignore_ascii_case(table) || o.sql.to_ascii_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);
        CREATE TABLE posts (id INTEGER PRIMARY KEY, user_id INTEGER);
        CREATE INDEX idx_name ON users (name);
        CREATE VIEW names AS SELECT name FROM users;
        CREATE TRIGGER cleanup AFTER DELETE ON posts BEGIN DELETE FROM users WHERE id = old.user_id; END;
        CREATE INDEX idx_user ON posts (user_id);";

    #[test]
    fn test_snapshot_from_script() {
        let snapshot = CatalogSnapshot::from_script(SCHEMA).unwrap();
        assert_eq!(snapshot.objects().len(), 6);
        assert_eq!(
            snapshot.table_sql("USERS").unwrap().as_deref(),
            Some("CREATE TABLE [users] ([id] INTEGER PRIMARY KEY, [name] TEXT)")
        );
        assert_eq!(snapshot.table_sql("missing").unwrap(), None);
        assert_eq!(
            snapshot.get(ObjectKind::Index, "idx_user").unwrap().table,
            "posts"
        );
    }

    #[test]
    fn test_dependents_include_cross_table_triggers() {
        let snapshot = CatalogSnapshot::from_script(SCHEMA).unwrap();
        let names: Vec<_> = snapshot
            .dependents("users")
            .unwrap()
            .into_iter()
            .map(|o| o.name)
            .collect();
        assert_eq!(names, vec!["idx_name", "names", "cleanup"]);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut snapshot = CatalogSnapshot::new();
        snapshot.insert(SchemaObject::new(ObjectKind::View, "v", "v", "CREATE VIEW v AS SELECT 1"));
        snapshot.insert(SchemaObject::new(ObjectKind::View, "V", "V", "CREATE VIEW V AS SELECT 2"));
        assert_eq!(snapshot.objects().len(), 1);
        assert!(snapshot.objects()[0].sql.ends_with('2'));
    }
}
