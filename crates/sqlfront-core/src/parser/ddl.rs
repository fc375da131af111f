//! CREATE, DROP and ALTER TABLE parsing.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnConstraintKind, ColumnDef,
    CreateIndexStatement, CreateTableBody, CreateTableStatement, CreateTriggerStatement,
    CreateViewStatement, Deferrable, DropStatement, Expr, ForeignKeyAction, ForeignKeyClause,
    GeneratedStorage, IndexedColumn, InitialCheck, Literal, ObjectKind, ReferentialAction,
    Statement, TableConstraint, TableConstraintKind, TableOptions, TriggerEvent, TriggerTiming,
};
use crate::lexer::{Keyword, Operator, TokenKind};

impl Parser {
    /// Parses any CREATE statement.
    pub(super) fn parse_create_statement(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Create)?;
        let temporary = self.try_keyword(Keyword::Temp) || self.try_keyword(Keyword::Temporary);

        match self.current().as_keyword() {
            Some(Keyword::Table) => Ok(Statement::CreateTable(
                self.parse_create_table_body(temporary)?,
            )),
            Some(Keyword::View) => Ok(Statement::CreateView(self.parse_create_view(temporary)?)),
            Some(Keyword::Trigger) => {
                Ok(Statement::CreateTrigger(self.parse_create_trigger(temporary)?))
            }
            Some(Keyword::Index | Keyword::Unique) if !temporary => {
                Ok(Statement::CreateIndex(self.parse_create_index()?))
            }
            _ => Err(self.error_expected_any(&["TABLE", "VIEW", "INDEX", "TRIGGER"])),
        }
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.try_keyword(Keyword::If) {
            self.expect(Operator::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table_body(
        &mut self,
        temporary: bool,
    ) -> Result<CreateTableStatement, ParseError> {
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        if self.try_keyword(Keyword::As) {
            let query = self.parse_select_statement()?;
            return Ok(CreateTableStatement {
                temporary,
                if_not_exists,
                name,
                body: CreateTableBody::AsSelect(Box::new(query)),
            });
        }

        self.expect(Operator::LeftParen)?;
        let mut columns = vec![self.parse_column_def()?];
        let mut constraints = Vec::new();
        while self.try_consume(Operator::Comma) {
            if self.starts_table_constraint() {
                constraints.push(self.parse_table_constraint()?);
            } else if constraints.is_empty() {
                columns.push(self.parse_column_def()?);
            } else {
                return Err(self.error_expected("table constraint"));
            }
        }
        self.expect(Operator::RightParen)?;

        let options = self.parse_table_options()?;

        Ok(CreateTableStatement {
            temporary,
            if_not_exists,
            name,
            body: CreateTableBody::Columns {
                columns,
                constraints,
                options,
            },
        })
    }

    /// Parses `WITHOUT ROWID` and `STRICT`, comma separated.
    fn parse_table_options(&mut self) -> Result<TableOptions, ParseError> {
        let mut options = TableOptions::default();
        if !self.check_keyword(Keyword::Without) && !self.check_word("STRICT") {
            return Ok(options);
        }
        loop {
            if self.try_keyword(Keyword::Without) {
                if !self.check_word("ROWID") {
                    return Err(self.error_expected("ROWID"));
                }
                self.advance();
                options.without_rowid = true;
            } else if self.check_word("STRICT") {
                self.advance();
                options.strict = true;
            } else {
                return Err(self.error_expected_any(&["WITHOUT ROWID", "STRICT"]));
            }
            if !self.try_consume(Operator::Comma) {
                return Ok(options);
            }
        }
    }

    /// True if the current token is the plain identifier `word`.
    fn check_word(&self, word: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Identifier(name) if name.eq_ignore_ascii_case(word))
    }

    fn starts_table_constraint(&self) -> bool {
        matches!(
            self.current().as_keyword(),
            Some(
                Keyword::Constraint
                    | Keyword::Primary
                    | Keyword::Unique
                    | Keyword::Check
                    | Keyword::Foreign
            )
        )
    }

    /// Parses a column definition: name, optional type, constraints.
    pub fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let data_type = if matches!(self.current().kind, TokenKind::Identifier(_)) {
            Some(self.parse_data_type()?)
        } else {
            None
        };

        let mut column = ColumnDef::new(name, data_type);
        while let Some(constraint) = self.parse_column_constraint()? {
            column.constraints.push(constraint);
        }
        Ok(column)
    }

    fn parse_column_constraint(&mut self) -> Result<Option<ColumnConstraint>, ParseError> {
        let name = if self.try_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let kind = match self.current().kind.clone() {
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let direction = self.parse_optional_direction();
                let conflict = self.parse_optional_on_conflict()?;
                let autoincrement = self.try_keyword(Keyword::Autoincrement);
                ColumnConstraintKind::PrimaryKey {
                    direction,
                    conflict,
                    autoincrement,
                }
            }
            TokenKind::Operator(Operator::Not) if self.peek_is_keyword(1, Keyword::Null) => {
                self.advance();
                self.advance();
                ColumnConstraintKind::NotNull {
                    conflict: self.parse_optional_on_conflict()?,
                }
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                ColumnConstraintKind::Null
            }
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance();
                ColumnConstraintKind::Unique {
                    conflict: self.parse_optional_on_conflict()?,
                }
            }
            TokenKind::Keyword(Keyword::Check) => {
                self.advance();
                ColumnConstraintKind::Check(self.parse_parenthesized_expr()?)
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                ColumnConstraintKind::Default(self.parse_default_value()?)
            }
            TokenKind::Keyword(Keyword::Collate) => {
                self.advance();
                ColumnConstraintKind::Collate(self.expect_identifier()?)
            }
            TokenKind::Keyword(Keyword::References) => {
                ColumnConstraintKind::References(self.parse_foreign_key_clause()?)
            }
            TokenKind::Keyword(Keyword::Generated | Keyword::As) => {
                if self.try_keyword(Keyword::Generated) {
                    self.expect_keyword(Keyword::Always)?;
                }
                self.expect_keyword(Keyword::As)?;
                let expr = self.parse_parenthesized_expr()?;
                let storage = if self.try_keyword(Keyword::Stored) {
                    Some(GeneratedStorage::Stored)
                } else if self.try_keyword(Keyword::Virtual) {
                    Some(GeneratedStorage::Virtual)
                } else {
                    None
                };
                ColumnConstraintKind::Generated { expr, storage }
            }
            _ if name.is_some() => return Err(self.error_expected("column constraint")),
            _ => return Ok(None),
        };

        Ok(Some(ColumnConstraint { name, kind }))
    }

    /// Parses a DEFAULT value.
    ///
    /// Accepts a literal, a signed number, a parenthesised expression, or a
    /// bare word which SQLite treats as a string (`TRUE`/`FALSE` become 1/0).
    fn parse_default_value(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        let value = match token.kind {
            TokenKind::Operator(Operator::LeftParen) => {
                return Ok(Expr::Paren(Box::new(self.parse_parenthesized_expr()?)));
            }
            TokenKind::Operator(Operator::Minus | Operator::Plus) => {
                return Ok(Expr::number(self.parse_signed_number()?));
            }
            TokenKind::Numeric(text) => Literal::Number(text),
            TokenKind::Text(text) => Literal::Text(text),
            TokenKind::Blob(bytes) => Literal::Blob(bytes),
            TokenKind::Keyword(Keyword::Null) => Literal::Null,
            TokenKind::Keyword(Keyword::CurrentTime) => Literal::CurrentTime,
            TokenKind::Keyword(Keyword::CurrentDate) => Literal::CurrentDate,
            TokenKind::Keyword(Keyword::CurrentTimestamp) => Literal::CurrentTimestamp,
            TokenKind::Identifier(word) if word.eq_ignore_ascii_case("true") => {
                Literal::Number(String::from("1"))
            }
            TokenKind::Identifier(word) if word.eq_ignore_ascii_case("false") => {
                Literal::Number(String::from("0"))
            }
            TokenKind::Identifier(word) => Literal::Text(word),
            TokenKind::Keyword(kw) if !kw.is_reserved() => Literal::Text(token.text),
            _ => return Err(self.error_expected("default value")),
        };
        self.advance();
        Ok(Expr::Literal(value))
    }

    fn parse_parenthesized_expr(&mut self) -> Result<Expr, ParseError> {
        self.expect(Operator::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect(Operator::RightParen)?;
        Ok(expr)
    }

    fn parse_optional_on_conflict(
        &mut self,
    ) -> Result<Option<crate::ast::ConflictResolution>, ParseError> {
        if self.check_keyword(Keyword::On) && self.peek_is_keyword(1, Keyword::Conflict) {
            self.advance();
            self.advance();
            Ok(Some(self.parse_conflict_resolution()?))
        } else {
            Ok(None)
        }
    }

    /// Parses a table-level constraint.
    fn parse_table_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        let name = if self.try_keyword(Keyword::Constraint) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let kind = if self.try_keyword(Keyword::Primary) {
            self.expect_keyword(Keyword::Key)?;
            let columns = self.parse_indexed_columns()?;
            TableConstraintKind::PrimaryKey {
                columns,
                conflict: self.parse_optional_on_conflict()?,
            }
        } else if self.try_keyword(Keyword::Unique) {
            let columns = self.parse_indexed_columns()?;
            TableConstraintKind::Unique {
                columns,
                conflict: self.parse_optional_on_conflict()?,
            }
        } else if self.try_keyword(Keyword::Check) {
            TableConstraintKind::Check(self.parse_parenthesized_expr()?)
        } else if self.try_keyword(Keyword::Foreign) {
            self.expect_keyword(Keyword::Key)?;
            self.expect(Operator::LeftParen)?;
            let columns = self.parse_list(Operator::Comma, Self::expect_identifier)?;
            self.expect(Operator::RightParen)?;
            TableConstraintKind::ForeignKey {
                columns,
                clause: self.parse_foreign_key_clause()?,
            }
        } else {
            return Err(self.error_expected_any(&[
                "PRIMARY KEY",
                "UNIQUE",
                "CHECK",
                "FOREIGN KEY",
            ]));
        };

        Ok(TableConstraint { name, kind })
    }

    fn parse_indexed_columns(&mut self) -> Result<Vec<IndexedColumn>, ParseError> {
        self.expect(Operator::LeftParen)?;
        let columns = self.parse_list(Operator::Comma, Self::parse_indexed_column)?;
        self.expect(Operator::RightParen)?;
        Ok(columns)
    }

    pub(super) fn parse_indexed_column(&mut self) -> Result<IndexedColumn, ParseError> {
        let expr = self.parse_expr()?;
        let direction = self.parse_optional_direction();
        Ok(IndexedColumn { expr, direction })
    }

    /// Parses `REFERENCES table [(cols)] ...`.
    fn parse_foreign_key_clause(&mut self) -> Result<ForeignKeyClause, ParseError> {
        self.expect_keyword(Keyword::References)?;
        let table = self.expect_identifier()?;
        let columns = if self.try_consume(Operator::LeftParen) {
            let columns = self.parse_list(Operator::Comma, Self::expect_identifier)?;
            self.expect(Operator::RightParen)?;
            columns
        } else {
            Vec::new()
        };

        let mut actions = Vec::new();
        loop {
            if self.check_keyword(Keyword::On) && !self.peek_is_keyword(1, Keyword::Conflict) {
                self.advance();
                let on_delete = if self.try_keyword(Keyword::Delete) {
                    true
                } else {
                    self.expect_keyword(Keyword::Update)?;
                    false
                };
                let action = self.parse_referential_action()?;
                actions.push(if on_delete {
                    ForeignKeyAction::OnDelete(action)
                } else {
                    ForeignKeyAction::OnUpdate(action)
                });
            } else if self.try_consume(Operator::Match) {
                actions.push(ForeignKeyAction::Match(self.expect_identifier()?));
            } else {
                break;
            }
        }

        let deferrable = if self.check_keyword(Keyword::Deferrable)
            || (self.check_op(Operator::Not) && self.peek_is_keyword(1, Keyword::Deferrable))
        {
            let negated = self.try_consume(Operator::Not);
            self.expect_keyword(Keyword::Deferrable)?;
            let initially = if self.try_keyword(Keyword::Initially) {
                if self.try_keyword(Keyword::Deferred) {
                    Some(InitialCheck::Deferred)
                } else {
                    self.expect_keyword(Keyword::Immediate)?;
                    Some(InitialCheck::Immediate)
                }
            } else {
                None
            };
            Some(Deferrable { negated, initially })
        } else {
            None
        };

        Ok(ForeignKeyClause {
            table,
            columns,
            actions,
            deferrable,
        })
    }

    fn parse_referential_action(&mut self) -> Result<ReferentialAction, ParseError> {
        if self.try_keyword(Keyword::Set) {
            if self.try_keyword(Keyword::Null) {
                Ok(ReferentialAction::SetNull)
            } else {
                self.expect_keyword(Keyword::Default)?;
                Ok(ReferentialAction::SetDefault)
            }
        } else if self.try_keyword(Keyword::Cascade) {
            Ok(ReferentialAction::Cascade)
        } else if self.try_keyword(Keyword::Restrict) {
            Ok(ReferentialAction::Restrict)
        } else if self.try_keyword(Keyword::No) {
            self.expect_keyword(Keyword::Action)?;
            Ok(ReferentialAction::NoAction)
        } else {
            Err(self.error_expected_any(&[
                "SET NULL",
                "SET DEFAULT",
                "CASCADE",
                "RESTRICT",
                "NO ACTION",
            ]))
        }
    }

    fn parse_create_view(&mut self, temporary: bool) -> Result<CreateViewStatement, ParseError> {
        self.expect_keyword(Keyword::View)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        let columns = if self.try_consume(Operator::LeftParen) {
            let columns = self.parse_list(Operator::Comma, Self::expect_identifier)?;
            self.expect(Operator::RightParen)?;
            columns
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::As)?;
        let query = self.parse_select_statement()?;
        Ok(CreateViewStatement {
            temporary,
            if_not_exists,
            name,
            columns,
            query: Box::new(query),
        })
    }

    fn parse_create_index(&mut self) -> Result<CreateIndexStatement, ParseError> {
        let unique = self.try_keyword(Keyword::Unique);
        self.expect_keyword(Keyword::Index)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;
        self.expect_keyword(Keyword::On)?;
        let table = self.expect_identifier()?;
        let columns = self.parse_indexed_columns()?;
        let where_clause = self.parse_optional_where()?;
        Ok(CreateIndexStatement {
            unique,
            if_not_exists,
            name,
            table,
            columns,
            where_clause,
        })
    }

    fn parse_create_trigger(
        &mut self,
        temporary: bool,
    ) -> Result<CreateTriggerStatement, ParseError> {
        self.expect_keyword(Keyword::Trigger)?;
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_qualified_name()?;

        let timing = if self.try_keyword(Keyword::Before) {
            Some(TriggerTiming::Before)
        } else if self.try_keyword(Keyword::After) {
            Some(TriggerTiming::After)
        } else if self.try_keyword(Keyword::Instead) {
            self.expect_keyword(Keyword::Of)?;
            Some(TriggerTiming::InsteadOf)
        } else {
            None
        };

        let event = if self.try_keyword(Keyword::Delete) {
            TriggerEvent::Delete
        } else if self.try_keyword(Keyword::Insert) {
            TriggerEvent::Insert
        } else if self.try_keyword(Keyword::Update) {
            if self.try_keyword(Keyword::Of) {
                TriggerEvent::Update(self.parse_list(Operator::Comma, Self::expect_identifier)?)
            } else {
                TriggerEvent::Update(Vec::new())
            }
        } else {
            return Err(self.error_expected_any(&["DELETE", "INSERT", "UPDATE"]));
        };

        self.expect_keyword(Keyword::On)?;
        let table = self.expect_identifier()?;

        let for_each_row = if self.try_keyword(Keyword::For) {
            self.expect_keyword(Keyword::Each)?;
            self.expect_keyword(Keyword::Row)?;
            true
        } else {
            false
        };

        let when = if self.try_keyword(Keyword::When) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        self.expect_keyword(Keyword::Begin)?;
        let mut body = Vec::new();
        while !self.check_keyword(Keyword::End) {
            body.push(self.parse_trigger_step()?);
            self.expect(Operator::Semicolon)?;
        }
        if body.is_empty() {
            return Err(self.error_expected_any(&["INSERT", "UPDATE", "DELETE", "SELECT"]));
        }
        self.expect_keyword(Keyword::End)?;

        Ok(CreateTriggerStatement {
            temporary,
            if_not_exists,
            name,
            timing,
            event,
            table,
            for_each_row,
            when,
            body,
        })
    }

    fn parse_trigger_step(&mut self) -> Result<Statement, ParseError> {
        match self.current().as_keyword() {
            Some(Keyword::Insert | Keyword::Replace) => {
                Ok(Statement::Insert(self.parse_insert_statement()?))
            }
            Some(Keyword::Update) => Ok(Statement::Update(self.parse_update_statement()?)),
            Some(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete_statement()?)),
            Some(Keyword::Select | Keyword::Values | Keyword::With) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            _ => Err(self.error_expected_any(&["INSERT", "UPDATE", "DELETE", "SELECT"])),
        }
    }

    /// Parses `DROP TABLE|VIEW|INDEX|TRIGGER [IF EXISTS] name`.
    pub(super) fn parse_drop_statement(&mut self) -> Result<DropStatement, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        let kind = match self.current().as_keyword() {
            Some(Keyword::Table) => ObjectKind::Table,
            Some(Keyword::View) => ObjectKind::View,
            Some(Keyword::Index) => ObjectKind::Index,
            Some(Keyword::Trigger) => ObjectKind::Trigger,
            _ => return Err(self.error_expected_any(&["TABLE", "VIEW", "INDEX", "TRIGGER"])),
        };
        self.advance();
        let if_exists = if self.try_keyword(Keyword::If) {
            self.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };
        let name = self.parse_qualified_name()?;
        Ok(DropStatement {
            kind,
            if_exists,
            name,
        })
    }

    /// Parses an ALTER TABLE statement.
    pub(super) fn parse_alter_table_statement(
        &mut self,
    ) -> Result<AlterTableStatement, ParseError> {
        self.expect_keyword(Keyword::Alter)?;
        self.expect_keyword(Keyword::Table)?;
        let name = self.parse_qualified_name()?;

        let action = if self.try_keyword(Keyword::Rename) {
            if self.try_keyword(Keyword::To) {
                AlterTableAction::RenameTo(self.expect_identifier()?)
            } else {
                self.try_keyword(Keyword::Column);
                let old = self.expect_identifier()?;
                self.expect_keyword(Keyword::To)?;
                let new = self.expect_identifier()?;
                AlterTableAction::RenameColumn { old, new }
            }
        } else if self.try_keyword(Keyword::Add) {
            self.try_keyword(Keyword::Column);
            AlterTableAction::AddColumn(self.parse_column_def()?)
        } else if self.try_keyword(Keyword::Drop) {
            self.try_keyword(Keyword::Column);
            AlterTableAction::DropColumn(self.expect_identifier()?)
        } else {
            return Err(self.error_expected_any(&["RENAME", "ADD", "DROP"]));
        };

        Ok(AlterTableStatement { name, action })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ConflictResolution, DataType, OrderDirection};

    fn parse(sql: &str) -> Statement {
        Parser::new(sql).unwrap().parse_statement().unwrap()
    }

    fn column(sql: &str) -> ColumnDef {
        let mut parser = Parser::new(sql).unwrap();
        let column = parser.parse_column_def().unwrap();
        assert!(parser.cursor.at_end());
        column
    }

    #[test]
    fn test_create_table() {
        let Statement::CreateTable(table) = parse(
            "CREATE TABLE IF NOT EXISTS t (id INTEGER PRIMARY KEY AUTOINCREMENT, name VARCHAR(255) NOT NULL, \
             CONSTRAINT u UNIQUE (name) ON CONFLICT REPLACE) WITHOUT ROWID, STRICT",
        ) else {
            panic!("expected CREATE TABLE");
        };
        assert!(table.if_not_exists);
        assert_eq!(table.columns().len(), 2);
        assert!(table.columns()[0].is_autoincrement());
        assert_eq!(
            table.columns()[1].data_type,
            Some(DataType::sized("VARCHAR", "255"))
        );
        assert_eq!(table.constraints()[0].name.as_deref(), Some("u"));
        let CreateTableBody::Columns { options, .. } = table.body else {
            panic!("expected column body");
        };
        assert!(options.without_rowid && options.strict);
    }

    #[test]
    fn test_create_table_as_select() {
        let Statement::CreateTable(table) = parse("CREATE TEMP TABLE t AS SELECT * FROM u") else {
            panic!("expected CREATE TABLE");
        };
        assert!(table.temporary);
        assert!(matches!(table.body, CreateTableBody::AsSelect(_)));
    }

    #[test]
    fn test_column_without_type() {
        let c = column("payload");
        assert_eq!(c.name, "payload");
        assert_eq!(c.data_type, None);
    }

    #[test]
    fn test_multi_word_type_with_scale() {
        let c = column("price UNSIGNED BIG DECIMAL(10, -2)");
        let data_type = c.data_type.unwrap();
        assert_eq!(data_type.name, "UNSIGNED BIG DECIMAL");
        assert_eq!(data_type.scale.as_deref(), Some("-2"));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(column("a DEFAULT -1").default_value(), Some(&Expr::number("-1")));
        assert_eq!(column("a DEFAULT true").default_value(), Some(&Expr::number("1")));
        assert_eq!(
            column("a DEFAULT draft").default_value(),
            Some(&Expr::string("draft"))
        );
        assert!(matches!(
            column("a DEFAULT (datetime('now'))").default_value(),
            Some(Expr::Paren(_))
        ));
    }

    #[test]
    fn test_column_constraints() {
        let c = column(
            "a TEXT CONSTRAINT pk PRIMARY KEY DESC ON CONFLICT ABORT NOT NULL UNIQUE CHECK (a <> '') COLLATE nocase",
        );
        assert_eq!(c.constraints.len(), 5);
        assert_eq!(c.constraints[0].name.as_deref(), Some("pk"));
        assert_eq!(
            c.constraints[0].kind,
            ColumnConstraintKind::PrimaryKey {
                direction: Some(OrderDirection::Desc),
                conflict: Some(ConflictResolution::Abort),
                autoincrement: false,
            }
        );
        assert!(c.is_not_null() && c.is_unique());
        assert_eq!(c.collation(), Some("nocase"));
    }

    #[test]
    fn test_references_clause() {
        let c = column(
            "owner INTEGER REFERENCES users (id) ON DELETE SET NULL ON UPDATE NO ACTION NOT DEFERRABLE INITIALLY IMMEDIATE NOT NULL",
        );
        let ColumnConstraintKind::References(fk) = &c.constraints[0].kind else {
            panic!("expected REFERENCES");
        };
        assert_eq!(fk.table, "users");
        assert_eq!(
            fk.actions,
            vec![
                ForeignKeyAction::OnDelete(ReferentialAction::SetNull),
                ForeignKeyAction::OnUpdate(ReferentialAction::NoAction)
            ]
        );
        assert_eq!(
            fk.deferrable,
            Some(Deferrable {
                negated: true,
                initially: Some(InitialCheck::Immediate)
            })
        );
        assert!(c.is_not_null());
    }

    #[test]
    fn test_generated_column() {
        let c = column("total REAL GENERATED ALWAYS AS (price * qty) STORED");
        assert!(matches!(
            c.constraints[0].kind,
            ColumnConstraintKind::Generated {
                storage: Some(GeneratedStorage::Stored),
                ..
            }
        ));
    }

    #[test]
    fn test_create_index() {
        let Statement::CreateIndex(index) =
            parse("CREATE UNIQUE INDEX IF NOT EXISTS i ON t (a COLLATE nocase DESC, b) WHERE b > 0")
        else {
            panic!("expected CREATE INDEX");
        };
        assert!(index.unique && index.if_not_exists);
        assert_eq!(index.columns[0].column_name(), Some("a"));
        assert!(index.where_clause.is_some());
    }

    #[test]
    fn test_create_trigger() {
        let Statement::CreateTrigger(trigger) = parse(
            "CREATE TRIGGER trg AFTER UPDATE OF a, b ON t FOR EACH ROW WHEN new.a > 0 \
             BEGIN INSERT INTO log VALUES (new.a); SELECT RAISE(IGNORE); END",
        ) else {
            panic!("expected CREATE TRIGGER");
        };
        assert_eq!(trigger.timing, Some(TriggerTiming::After));
        assert_eq!(
            trigger.event,
            TriggerEvent::Update(vec![String::from("a"), String::from("b")])
        );
        assert!(trigger.for_each_row);
        assert_eq!(trigger.body.len(), 2);
    }

    #[test]
    fn test_trigger_rejects_ddl_body() {
        let err = Parser::new("CREATE TRIGGER t AFTER INSERT ON x BEGIN DROP TABLE y; END")
            .unwrap()
            .parse_statement()
            .unwrap_err();
        assert_eq!(
            err.expected,
            vec![
                String::from("INSERT"),
                String::from("UPDATE"),
                String::from("DELETE"),
                String::from("SELECT"),
            ]
        );
    }

    #[test]
    fn test_drop_and_alter() {
        assert_eq!(
            parse("DROP VIEW IF EXISTS v"),
            Statement::Drop(DropStatement {
                kind: ObjectKind::View,
                if_exists: true,
                name: crate::ast::QualifiedName::new("v"),
            })
        );
        let Statement::AlterTable(alter) = parse("ALTER TABLE t RENAME COLUMN a TO b") else {
            panic!("expected ALTER TABLE");
        };
        assert_eq!(
            alter.action,
            AlterTableAction::RenameColumn {
                old: String::from("a"),
                new: String::from("b")
            }
        );
        let Statement::AlterTable(alter) = parse("ALTER TABLE t ADD COLUMN c INT DEFAULT 0") else {
            panic!("expected ALTER TABLE");
        };
        assert!(matches!(alter.action, AlterTableAction::AddColumn(ref c) if c.name == "c"));
    }

    #[test]
    fn test_column_after_table_constraint_is_error() {
        let err = Parser::new("CREATE TABLE t (a INT, PRIMARY KEY (a), b INT)")
            .unwrap()
            .parse_statement()
            .unwrap_err();
        assert_eq!(err.expected, vec![String::from("table constraint")]);
    }
}
