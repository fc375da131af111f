//! SQL Parser implementation: engine, combinators, queries and DML.

use super::cursor::TokenCursor;
use super::error::ParseError;
use crate::ast::{
    Assignment, CommonTableExpr, CompoundOperator, ConflictResolution, DeleteStatement,
    IndexHint, InsertSource, InsertStatement, JoinClause, JoinConstraint, JoinOperator,
    NullOrdering, OrderDirection, OrderingTerm, QualifiedName, ResultColumn, SelectCore,
    SelectStatement, SimpleSelect, Statement, TableRef, UpdateStatement, UpsertAction,
    UpsertClause, WithClause,
};
use crate::lexer::{Keyword, LexError, Operator, Token, TokenKind, tokenize};

/// A grammar rule usable as a [`Parser::first_of`] alternative.
pub(super) type Rule<T> = fn(&mut Parser) -> Result<T, ParseError>;

/// SQL Parser.
///
/// A backtracking recursive-descent parser over a [`TokenCursor`].
pub struct Parser {
    pub(super) cursor: TokenCursor,
}

impl Parser {
    /// Tokenizes `input` and creates a parser over the tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] if the input cannot be tokenized.
    pub fn new(input: &str) -> Result<Self, LexError> {
        Ok(Self::from_tokens(tokenize(input)?))
    }

    /// Creates a parser over already lexed tokens.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    /// Parses exactly one statement, optionally followed by semicolons.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single valid statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let statement = self.parse_one_statement()?;
        while self.try_consume(Operator::Semicolon) {}
        self.expect_end()?;
        Ok(statement)
    }

    /// Parses a `;`-separated script.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` encountered.
    pub fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();
        loop {
            while self.try_consume(Operator::Semicolon) {}
            if self.cursor.at_end() {
                break;
            }
            statements.push(self.parse_one_statement()?);
            if !self.check_op(Operator::Semicolon) {
                self.expect_end()?;
            }
        }
        Ok(statements)
    }

    /// Parses a single statement without consuming a terminator.
    pub(super) fn parse_one_statement(&mut self) -> Result<Statement, ParseError> {
        match self.current().as_keyword() {
            Some(Keyword::Select | Keyword::Values | Keyword::With) => {
                Ok(Statement::Select(self.parse_select_statement()?))
            }
            Some(Keyword::Insert | Keyword::Replace) => {
                Ok(Statement::Insert(self.parse_insert_statement()?))
            }
            Some(Keyword::Update) => Ok(Statement::Update(self.parse_update_statement()?)),
            Some(Keyword::Delete) => Ok(Statement::Delete(self.parse_delete_statement()?)),
            Some(Keyword::Create) => self.parse_create_statement(),
            Some(Keyword::Drop) => Ok(Statement::Drop(self.parse_drop_statement()?)),
            Some(Keyword::Alter) => Ok(Statement::AlterTable(self.parse_alter_table_statement()?)),
            _ => Err(self.error_expected_any(&[
                "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER",
            ])),
        }
    }

    // --- Queries ---

    /// Parses a SELECT statement, including WITH, compound arms, ORDER BY and LIMIT.
    pub(super) fn parse_select_statement(&mut self) -> Result<SelectStatement, ParseError> {
        let with = if self.check_keyword(Keyword::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };

        let body = self.parse_select_core()?;

        let mut compounds = Vec::new();
        while let Some(op) = self.parse_compound_operator() {
            compounds.push((op, self.parse_select_core()?));
        }

        // ORDER BY clause
        let order_by = if self.try_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_list(Operator::Comma, Self::parse_ordering_term)?
        } else {
            Vec::new()
        };

        // LIMIT clause; `LIMIT a, b` means offset a, limit b
        let (limit, offset) = if self.try_keyword(Keyword::Limit) {
            let first = self.parse_expr()?;
            if self.try_keyword(Keyword::Offset) {
                (Some(first), Some(self.parse_expr()?))
            } else if self.try_consume(Operator::Comma) {
                (Some(self.parse_expr()?), Some(first))
            } else {
                (Some(first), None)
            }
        } else {
            (None, None)
        };

        Ok(SelectStatement {
            with,
            body,
            compounds,
            order_by,
            limit,
            offset,
        })
    }

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.try_keyword(Keyword::Recursive);
        let ctes = self.parse_list(Operator::Comma, |p| {
            let name = p.expect_identifier()?;
            let columns = if p.try_consume(Operator::LeftParen) {
                let columns = p.parse_list(Operator::Comma, Self::expect_identifier)?;
                p.expect(Operator::RightParen)?;
                columns
            } else {
                Vec::new()
            };
            p.expect_keyword(Keyword::As)?;
            p.expect(Operator::LeftParen)?;
            let query = p.parse_select_statement()?;
            p.expect(Operator::RightParen)?;
            Ok(CommonTableExpr {
                name,
                columns,
                query: Box::new(query),
            })
        })?;
        Ok(WithClause { recursive, ctes })
    }

    fn parse_compound_operator(&mut self) -> Option<CompoundOperator> {
        if self.try_keyword(Keyword::Union) {
            if self.try_keyword(Keyword::All) {
                Some(CompoundOperator::UnionAll)
            } else {
                Some(CompoundOperator::Union)
            }
        } else if self.try_keyword(Keyword::Intersect) {
            Some(CompoundOperator::Intersect)
        } else if self.try_keyword(Keyword::Except) {
            Some(CompoundOperator::Except)
        } else {
            None
        }
    }

    fn parse_select_core(&mut self) -> Result<SelectCore, ParseError> {
        if self.try_keyword(Keyword::Values) {
            return Ok(SelectCore::Values(self.parse_values_rows()?));
        }
        self.expect_keyword(Keyword::Select)?;

        // DISTINCT or ALL
        let distinct = if self.try_keyword(Keyword::Distinct) {
            true
        } else {
            self.try_keyword(Keyword::All);
            false
        };

        let columns = self.parse_list(Operator::Comma, Self::parse_result_column)?;

        // FROM clause (optional for expressions like SELECT 1+1)
        let from = if self.try_keyword(Keyword::From) {
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        // WHERE clause
        let where_clause = self.parse_optional_where()?;

        // GROUP BY clause
        let group_by = if self.try_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            self.parse_list(Operator::Comma, Self::parse_expr)?
        } else {
            Vec::new()
        };

        // HAVING clause
        let having = if self.try_keyword(Keyword::Having) {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(SelectCore::Select(SimpleSelect {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
        }))
    }

    /// Parses `(expr, ...), (expr, ...)` after VALUES.
    pub(super) fn parse_values_rows(&mut self) -> Result<Vec<Vec<crate::ast::Expr>>, ParseError> {
        self.parse_list(Operator::Comma, |p| {
            p.expect(Operator::LeftParen)?;
            let row = p.parse_list(Operator::Comma, Self::parse_expr)?;
            p.expect(Operator::RightParen)?;
            Ok(row)
        })
    }

    fn parse_result_column(&mut self) -> Result<ResultColumn, ParseError> {
        if self.try_consume(Operator::Star) {
            return Ok(ResultColumn::Star);
        }
        if self.is_identifier_at(0)
            && self.peek_is_op(1, Operator::Dot)
            && self.peek_is_op(2, Operator::Star)
        {
            let table = self.expect_identifier()?;
            self.advance(); // .
            self.advance(); // *
            return Ok(ResultColumn::TableStar(table));
        }

        let expr = self.parse_expr()?;
        let alias = self.parse_optional_alias()?;
        Ok(ResultColumn::Expr { expr, alias })
    }

    fn parse_ordering_term(&mut self) -> Result<OrderingTerm, ParseError> {
        let expr = self.parse_expr()?;
        let direction = self.parse_optional_direction();
        let nulls = if self.try_keyword(Keyword::Nulls) {
            if self.try_keyword(Keyword::First) {
                Some(NullOrdering::First)
            } else {
                self.expect_keyword(Keyword::Last)?;
                Some(NullOrdering::Last)
            }
        } else {
            None
        };
        Ok(OrderingTerm {
            expr,
            direction,
            nulls,
        })
    }

    pub(super) fn parse_optional_direction(&mut self) -> Option<OrderDirection> {
        if self.try_keyword(Keyword::Asc) {
            Some(OrderDirection::Asc)
        } else if self.try_keyword(Keyword::Desc) {
            Some(OrderDirection::Desc)
        } else {
            None
        }
    }

    // --- FROM clause ---

    /// Parses a table reference with any number of joins.
    pub(super) fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let mut table_ref = self.parse_table_primary()?;

        // Parse joins
        while let Some((natural, operator)) = self.parse_join_operator()? {
            let right = self.parse_table_primary()?;
            let constraint = if self.try_keyword(Keyword::On) {
                Some(JoinConstraint::On(self.parse_expr()?))
            } else if self.try_keyword(Keyword::Using) {
                self.expect(Operator::LeftParen)?;
                let columns = self.parse_list(Operator::Comma, Self::expect_identifier)?;
                self.expect(Operator::RightParen)?;
                Some(JoinConstraint::Using(columns))
            } else {
                None
            };

            table_ref = TableRef::Join(Box::new(JoinClause {
                left: table_ref,
                natural,
                operator,
                right,
                constraint,
            }));
        }

        Ok(table_ref)
    }

    /// Parses a join operator, returning `(natural, operator)`.
    fn parse_join_operator(&mut self) -> Result<Option<(bool, JoinOperator)>, ParseError> {
        if self.try_consume(Operator::Comma) {
            return Ok(Some((false, JoinOperator::Comma)));
        }
        let natural = self.try_keyword(Keyword::Natural);
        let operator = match self.current().as_keyword() {
            Some(Keyword::Join) => JoinOperator::Inner,
            Some(Keyword::Inner) => {
                self.advance();
                JoinOperator::Inner
            }
            Some(Keyword::Cross) => {
                self.advance();
                JoinOperator::Cross
            }
            Some(kw @ (Keyword::Left | Keyword::Right | Keyword::Full)) => {
                self.advance();
                self.try_keyword(Keyword::Outer);
                match kw {
                    Keyword::Left => JoinOperator::Left,
                    Keyword::Right => JoinOperator::Right,
                    _ => JoinOperator::Full,
                }
            }
            _ if natural => return Err(self.error_expected("JOIN")),
            _ => return Ok(None),
        };
        self.expect_keyword(Keyword::Join)?;
        Ok(Some((natural, operator)))
    }

    /// Parses one FROM item: table-valued function, subquery, nested join or table.
    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        if self.check_op(Operator::LeftParen) {
            return self.first_of(&[Self::parse_subquery_ref, Self::parse_nested_ref]);
        }
        if self.is_table_function_ahead() {
            return self.parse_table_function();
        }
        self.parse_named_table()
    }

    /// `name(` or `schema.name(` ahead.
    fn is_table_function_ahead(&self) -> bool {
        self.is_identifier_at(0)
            && (self.peek_is_op(1, Operator::LeftParen)
                || (self.peek_is_op(1, Operator::Dot)
                    && self.is_identifier_at(2)
                    && self.peek_is_op(3, Operator::LeftParen)))
    }

    fn parse_table_function(&mut self) -> Result<TableRef, ParseError> {
        let name = self.parse_qualified_name()?;
        self.expect(Operator::LeftParen)?;
        let args = self.parse_list0(Operator::Comma, Self::parse_expr)?;
        self.expect(Operator::RightParen)?;
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Function { name, args, alias })
    }

    fn parse_subquery_ref(&mut self) -> Result<TableRef, ParseError> {
        self.expect(Operator::LeftParen)?;
        let query = self.parse_select_statement()?;
        self.expect(Operator::RightParen)?;
        let alias = self.parse_optional_alias()?;
        Ok(TableRef::Subquery {
            query: Box::new(query),
            alias,
        })
    }

    fn parse_nested_ref(&mut self) -> Result<TableRef, ParseError> {
        self.expect(Operator::LeftParen)?;
        let inner = self.parse_table_ref()?;
        self.expect(Operator::RightParen)?;
        Ok(TableRef::Nested(Box::new(inner)))
    }

    fn parse_named_table(&mut self) -> Result<TableRef, ParseError> {
        let name = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let hint = if self.try_keyword(Keyword::Indexed) {
            self.expect_keyword(Keyword::By)?;
            Some(IndexHint::IndexedBy(self.expect_identifier()?))
        } else if self.check_op(Operator::Not) && self.peek_is_keyword(1, Keyword::Indexed) {
            self.advance();
            self.advance();
            Some(IndexHint::NotIndexed)
        } else {
            None
        };
        Ok(TableRef::Table { name, alias, hint })
    }

    // --- DML ---

    /// Parses an INSERT (or REPLACE) statement.
    pub(super) fn parse_insert_statement(&mut self) -> Result<InsertStatement, ParseError> {
        let or_action = if self.try_keyword(Keyword::Replace) {
            Some(ConflictResolution::Replace)
        } else {
            self.expect_keyword(Keyword::Insert)?;
            if self.try_consume(Operator::Or) {
                Some(self.parse_conflict_resolution()?)
            } else {
                None
            }
        };
        self.expect_keyword(Keyword::Into)?;
        let table = self.parse_qualified_name()?;
        let alias = if self.try_keyword(Keyword::As) {
            Some(self.expect_identifier()?)
        } else {
            None
        };

        // Column list (optional)
        let columns = if self.try_consume(Operator::LeftParen) {
            let columns = self.parse_list(Operator::Comma, Self::expect_identifier)?;
            self.expect(Operator::RightParen)?;
            columns
        } else {
            Vec::new()
        };

        // VALUES, SELECT, or DEFAULT VALUES
        let source = if self.try_keyword(Keyword::Values) {
            InsertSource::Values(self.parse_values_rows()?)
        } else if self.try_keyword(Keyword::Default) {
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else if matches!(
            self.current().as_keyword(),
            Some(Keyword::Select | Keyword::With)
        ) {
            InsertSource::Select(Box::new(self.parse_select_statement()?))
        } else {
            return Err(self.error_expected_any(&["VALUES", "SELECT", "DEFAULT VALUES"]));
        };

        let upsert = if self.check_keyword(Keyword::On) {
            Some(self.parse_upsert_clause()?)
        } else {
            None
        };

        Ok(InsertStatement {
            or_action,
            table,
            alias,
            columns,
            source,
            upsert,
        })
    }

    fn parse_upsert_clause(&mut self) -> Result<UpsertClause, ParseError> {
        self.expect_keyword(Keyword::On)?;
        self.expect_keyword(Keyword::Conflict)?;
        let (target, target_where) = if self.try_consume(Operator::LeftParen) {
            let target = self.parse_list(Operator::Comma, Self::parse_indexed_column)?;
            self.expect(Operator::RightParen)?;
            (target, self.parse_optional_where()?)
        } else {
            (Vec::new(), None)
        };
        self.expect_keyword(Keyword::Do)?;
        let action = if self.try_keyword(Keyword::Nothing) {
            UpsertAction::Nothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_list(Operator::Comma, Self::parse_assignment)?;
            let where_clause = self.parse_optional_where()?;
            UpsertAction::Update {
                assignments,
                where_clause,
            }
        };
        Ok(UpsertClause {
            target,
            target_where,
            action,
        })
    }

    /// Parses an UPDATE statement.
    pub(super) fn parse_update_statement(&mut self) -> Result<UpdateStatement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let or_action = if self.try_consume(Operator::Or) {
            Some(self.parse_conflict_resolution()?)
        } else {
            None
        };
        let table = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;

        // Parse SET assignments
        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_list(Operator::Comma, Self::parse_assignment)?;

        // FROM clause (optional, for joins)
        let from = if self.try_keyword(Keyword::From) {
            Some(self.parse_table_ref()?)
        } else {
            None
        };

        let where_clause = self.parse_optional_where()?;

        Ok(UpdateStatement {
            or_action,
            table,
            alias,
            assignments,
            from,
            where_clause,
        })
    }

    fn parse_assignment(&mut self) -> Result<Assignment, ParseError> {
        let column = self.expect_identifier()?;
        self.expect(Operator::Eq)?;
        let value = self.parse_expr()?;
        Ok(Assignment { column, value })
    }

    /// Parses a DELETE statement.
    pub(super) fn parse_delete_statement(&mut self) -> Result<DeleteStatement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let table = self.parse_qualified_name()?;
        let alias = self.parse_optional_alias()?;
        let where_clause = self.parse_optional_where()?;
        Ok(DeleteStatement {
            table,
            alias,
            where_clause,
        })
    }

    pub(super) fn parse_conflict_resolution(&mut self) -> Result<ConflictResolution, ParseError> {
        let resolution = match self.current().as_keyword() {
            Some(Keyword::Rollback) => ConflictResolution::Rollback,
            Some(Keyword::Abort) => ConflictResolution::Abort,
            Some(Keyword::Fail) => ConflictResolution::Fail,
            Some(Keyword::Ignore) => ConflictResolution::Ignore,
            Some(Keyword::Replace) => ConflictResolution::Replace,
            _ => {
                return Err(
                    self.error_expected_any(&["ROLLBACK", "ABORT", "FAIL", "IGNORE", "REPLACE"])
                )
            }
        };
        self.advance();
        Ok(resolution)
    }

    pub(super) fn parse_optional_where(&mut self) -> Result<Option<crate::ast::Expr>, ParseError> {
        if self.try_keyword(Keyword::Where) {
            Ok(Some(self.parse_expr()?))
        } else {
            Ok(None)
        }
    }

    // --- Combinators ---

    /// Parses one or more `rule`s separated by `separator`.
    ///
    /// Stops at the first token that is not the separator.
    pub(super) fn parse_list<T>(
        &mut self,
        separator: Operator,
        mut rule: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![rule(self)?];
        while self.try_consume(separator) {
            items.push(rule(self)?);
        }
        Ok(items)
    }

    /// Like [`Parser::parse_list`], but an absent first item yields an empty list.
    pub(super) fn parse_list0<T>(
        &mut self,
        separator: Operator,
        mut rule: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        self.cursor.mark();
        match rule(self) {
            Ok(first) => {
                self.cursor.commit();
                let mut items = vec![first];
                while self.try_consume(separator) {
                    items.push(rule(self)?);
                }
                Ok(items)
            }
            Err(_) => {
                self.cursor.rollback();
                Ok(Vec::new())
            }
        }
    }

    /// Tries each alternative under its own mark and keeps the first success.
    ///
    /// When every alternative fails, the error that got furthest is returned,
    /// with the expected sets of equally far failures merged.
    pub(super) fn first_of<T>(&mut self, rules: &[Rule<T>]) -> Result<T, ParseError> {
        let mut failure: Option<ParseError> = None;
        for rule in rules {
            self.cursor.mark();
            match rule(self) {
                Ok(value) => {
                    self.cursor.commit();
                    return Ok(value);
                }
                Err(err) => {
                    self.cursor.rollback();
                    failure = Some(match failure {
                        Some(previous) => previous.merge(err),
                        None => err,
                    });
                }
            }
        }
        Err(failure.unwrap_or_else(|| self.error_expected("alternative")))
    }

    // --- Helper methods ---

    pub(super) fn current(&self) -> &Token {
        self.cursor.current()
    }

    /// Advances to the next token.
    pub(super) fn advance(&mut self) {
        self.cursor.advance();
    }

    /// Checks if the current token is the given operator.
    pub(super) fn check_op(&self, op: Operator) -> bool {
        self.current().as_operator() == Some(op)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().as_keyword() == Some(keyword)
    }

    pub(super) fn peek_is_op(&self, n: usize, op: Operator) -> bool {
        self.cursor.peek(n).as_operator() == Some(op)
    }

    pub(super) fn peek_is_keyword(&self, n: usize, keyword: Keyword) -> bool {
        self.cursor.peek(n).as_keyword() == Some(keyword)
    }

    /// Consumes the operator if present.
    pub(super) fn try_consume(&mut self, op: Operator) -> bool {
        let found = self.check_op(op);
        if found {
            self.advance();
        }
        found
    }

    /// Consumes the keyword if present.
    pub(super) fn try_keyword(&mut self, keyword: Keyword) -> bool {
        let found = self.check_keyword(keyword);
        if found {
            self.advance();
        }
        found
    }

    /// Expects the current token to be the given operator.
    pub(super) fn expect(&mut self, op: Operator) -> Result<(), ParseError> {
        if self.try_consume(op) {
            Ok(())
        } else {
            Err(self.error_expected(format!("'{}'", op.as_str())))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.try_keyword(keyword) {
            Ok(())
        } else {
            Err(self.error_expected(keyword.as_str()))
        }
    }

    /// Fails unless every token has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` expecting "end of input" at the first leftover token.
    pub fn expect_end(&self) -> Result<(), ParseError> {
        if self.cursor.at_end() {
            Ok(())
        } else {
            Err(self.error_expected("end of input"))
        }
    }

    /// Builds an "unexpected token" error at the current token.
    pub(super) fn error_expected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.current();
        ParseError::unexpected(expected, token.kind.clone(), token.span)
    }

    /// Builds an "unexpected token" error listing every acceptable token.
    pub(super) fn error_expected_any(&self, expected: &[&str]) -> ParseError {
        let token = self.current();
        ParseError::unexpected_any(
            expected.iter().map(|item| (*item).to_string()).collect(),
            token.kind.clone(),
            token.span,
        )
    }

    /// True if the token `n` ahead can serve as a name.
    pub(super) fn is_identifier_at(&self, n: usize) -> bool {
        match &self.cursor.peek(n).kind {
            TokenKind::Identifier(_) => true,
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }

    /// Expects and returns a name: an identifier or a non-reserved keyword.
    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        let name = match &self.current().kind {
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Keyword(kw) if !kw.is_reserved() => self.current().text.clone(),
            _ => return Err(self.error_expected("identifier")),
        };
        self.advance();
        Ok(name)
    }

    /// Parses `name` or `schema.name`.
    pub(super) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let first = self.expect_identifier()?;
        if self.try_consume(Operator::Dot) {
            Ok(QualifiedName::qualified(first, self.expect_identifier()?))
        } else {
            Ok(QualifiedName::new(first))
        }
    }

    /// Parses an optional alias: `AS name`, `AS 'name'`, or a bare identifier.
    pub(super) fn parse_optional_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.try_keyword(Keyword::As) {
            if let TokenKind::Text(name) = &self.current().kind {
                let name = name.clone();
                self.advance();
                return Ok(Some(name));
            }
            return Ok(Some(self.expect_identifier()?));
        }
        if let TokenKind::Identifier(name) = &self.current().kind {
            let name = name.clone();
            self.advance();
            return Ok(Some(name));
        }
        Ok(None)
    }
}
