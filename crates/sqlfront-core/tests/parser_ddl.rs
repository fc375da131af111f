//! Tests for CREATE TABLE/VIEW/INDEX/TRIGGER, DROP and ALTER TABLE.

mod common;
use common::*;

use sqlfront_core::ast::{
    AlterTableAction, ColumnConstraintKind, CreateTableBody, DataType, Expr, ObjectKind,
    Statement, TableConstraintKind, TriggerEvent, TriggerTiming,
};
use sqlfront_core::parse_column_def;

#[test]
fn create_table_columns_and_constraints() {
    let sql = "CREATE TABLE IF NOT EXISTS users (\
               id INTEGER PRIMARY KEY AUTOINCREMENT, \
               email VARCHAR(255) NOT NULL UNIQUE, \
               age INT CHECK (age >= 0) DEFAULT 0, \
               team_id INTEGER REFERENCES teams (id) ON DELETE CASCADE, \
               CONSTRAINT uq UNIQUE (email, team_id))";
    let t = parse_create_table(sql);
    assert!(t.if_not_exists);
    assert_eq!(t.columns().len(), 4);
    assert!(t.column("ID").unwrap().is_primary_key());
    let email = t.column("email").unwrap();
    assert_eq!(email.data_type, Some(DataType::sized("VARCHAR", "255")));
    assert!(email.is_not_null() && email.is_unique());
    assert_eq!(t.column("age").unwrap().default_value(), Some(&Expr::number("0")));
    assert!(matches!(
        t.constraints()[0].kind,
        TableConstraintKind::Unique { ref columns, .. } if columns.len() == 2
    ));
    renders_as(
        sql,
        "CREATE TABLE IF NOT EXISTS [users] (\
         [id] INTEGER PRIMARY KEY AUTOINCREMENT, \
         [email] VARCHAR(255) NOT NULL UNIQUE, \
         [age] INT CHECK ([age] >= 0) DEFAULT 0, \
         [team_id] INTEGER REFERENCES [teams] ([id]) ON DELETE CASCADE, \
         CONSTRAINT [uq] UNIQUE ([email], [team_id]))",
    );
}

#[test]
fn create_table_table_level_keys_and_options() {
    let sql = "CREATE TEMPORARY TABLE pairs (a INT, b INT, PRIMARY KEY (a, b DESC), \
               FOREIGN KEY (b) REFERENCES other (x) DEFERRABLE INITIALLY DEFERRED) WITHOUT ROWID";
    let t = parse_create_table(sql);
    assert!(t.temporary);
    assert!(matches!(
        t.constraints()[1].kind,
        TableConstraintKind::ForeignKey { ref columns, .. } if columns == &["b"]
    ));
    let CreateTableBody::Columns { options, .. } = &t.body else {
        panic!("expected column body");
    };
    assert!(options.without_rowid && !options.strict);
    renders_as(
        sql,
        "CREATE TEMP TABLE [pairs] ([a] INT, [b] INT, PRIMARY KEY ([a], [b] DESC), \
         FOREIGN KEY ([b]) REFERENCES [other] ([x]) DEFERRABLE INITIALLY DEFERRED) WITHOUT ROWID",
    );
}

#[test]
fn create_table_as_select() {
    let t = parse_create_table("CREATE TABLE copy AS SELECT * FROM src");
    assert!(matches!(t.body, CreateTableBody::AsSelect(_)));
    assert!(t.columns().is_empty());
    renders_as(
        "CREATE TABLE copy AS SELECT * FROM src",
        "CREATE TABLE [copy] AS SELECT * FROM [src]",
    );
}

#[test]
fn column_definitions() {
    let c = parse_column_def("d FLOAT").unwrap();
    assert_eq!(c.name, "d");
    assert_eq!(c.data_type, Some(DataType::new("FLOAT")));

    let c = parse_column_def("created TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP COLLATE nocase").unwrap();
    assert!(c.is_not_null());
    assert_eq!(c.collation(), Some("nocase"));

    let c = parse_column_def("flag DEFAULT FALSE").unwrap();
    assert_eq!(c.data_type, None);
    assert_eq!(c.default_value(), Some(&Expr::number("0")));

    let c = parse_column_def("total REAL AS (price * qty) VIRTUAL").unwrap();
    assert!(matches!(
        c.constraints[0].kind,
        ColumnConstraintKind::Generated { .. }
    ));
    assert_eq!(
        c.to_string(),
        "[total] REAL GENERATED ALWAYS AS ([price] * [qty]) VIRTUAL"
    );

    assert!(parse_column_def("d FLOAT,").is_err());
}

#[test]
fn create_view() {
    let sql = "CREATE VIEW IF NOT EXISTS active (id, name) AS SELECT id, name FROM users WHERE active";
    let Statement::CreateView(v) = parse(sql) else {
        panic!("expected CREATE VIEW");
    };
    assert_eq!(v.columns, vec!["id", "name"]);
    renders_as(
        sql,
        "CREATE VIEW IF NOT EXISTS [active] ([id], [name]) AS SELECT [id], [name] FROM [users] WHERE [active]",
    );
}

#[test]
fn create_index() {
    let sql = "CREATE UNIQUE INDEX idx_email ON users (lower(email), team_id DESC) WHERE deleted IS NULL";
    let Statement::CreateIndex(i) = parse(sql) else {
        panic!("expected CREATE INDEX");
    };
    assert!(i.unique);
    assert_eq!(i.table, "users");
    assert_eq!(i.columns[0].column_name(), None);
    assert_eq!(i.columns[1].column_name(), Some("team_id"));
    renders_as(
        sql,
        "CREATE UNIQUE INDEX [idx_email] ON [users] (lower([email]), [team_id] DESC) WHERE [deleted] IS NULL",
    );
}

#[test]
fn create_trigger() {
    let sql = "CREATE TRIGGER audit AFTER UPDATE OF name ON users FOR EACH ROW \
               WHEN old.name <> new.name BEGIN \
               INSERT INTO log (id, what) VALUES (new.id, 'renamed'); \
               UPDATE stats SET renames = renames + 1; \
               END";
    let Statement::CreateTrigger(t) = parse(sql) else {
        panic!("expected CREATE TRIGGER");
    };
    assert_eq!(t.timing, Some(TriggerTiming::After));
    assert_eq!(t.event, TriggerEvent::Update(vec![String::from("name")]));
    assert_eq!(t.body.len(), 2);
    renders_as(
        sql,
        "CREATE TRIGGER [audit] AFTER UPDATE OF [name] ON [users] FOR EACH ROW \
         WHEN [old].[name] != [new].[name] BEGIN \
         INSERT INTO [log] ([id], [what]) VALUES ([new].[id], 'renamed'); \
         UPDATE [stats] SET [renames] = [renames] + 1; \
         END",
    );
}

#[test]
fn trigger_with_raise() {
    round_trip(
        "CREATE TRIGGER guard BEFORE DELETE ON users \
         BEGIN SELECT RAISE(ABORT, 'cannot delete') WHERE old.locked; END",
    );
    round_trip("CREATE TEMP TRIGGER v_ins INSTEAD OF INSERT ON v BEGIN INSERT INTO t VALUES (new.a); END");
}

#[test]
fn drop_statements() {
    for (sql, kind) in [
        ("DROP TABLE t", ObjectKind::Table),
        ("DROP VIEW IF EXISTS v", ObjectKind::View),
        ("DROP INDEX main.i", ObjectKind::Index),
        ("DROP TRIGGER trg", ObjectKind::Trigger),
    ] {
        let Statement::Drop(d) = parse(sql) else {
            panic!("expected DROP");
        };
        assert_eq!(d.kind, kind);
        round_trip(sql);
    }
    renders_as("drop view if exists v", "DROP VIEW IF EXISTS [v]");
}

#[test]
fn alter_table_actions() {
    let cases = [
        ("ALTER TABLE t RENAME TO u", "ALTER TABLE [t] RENAME TO [u]"),
        ("ALTER TABLE t RENAME a TO b", "ALTER TABLE [t] RENAME COLUMN [a] TO [b]"),
        (
            "ALTER TABLE t ADD c TEXT DEFAULT 'x'",
            "ALTER TABLE [t] ADD COLUMN [c] TEXT DEFAULT 'x'",
        ),
        ("ALTER TABLE t DROP COLUMN c", "ALTER TABLE [t] DROP COLUMN [c]"),
    ];
    for (sql, expected) in cases {
        renders_as(sql, expected);
    }
    let Statement::AlterTable(a) = parse("ALTER TABLE t DROP c") else {
        panic!("expected ALTER TABLE");
    };
    assert_eq!(a.action, AlterTableAction::DropColumn(String::from("c")));
}
