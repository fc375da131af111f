//! Expression parsing using Pratt binding powers.

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::{
    COLLATE_BP, EQUALITY_BP, infix_binding_power, prefix_binding_power, token_to_binary_op,
    token_to_like_op, token_to_unary_op,
};
use crate::ast::{
    ColumnRef, DataType, Expr, FunctionArgs, FunctionCall, InTarget, Literal, RaiseAction,
};
use crate::lexer::{Keyword, Operator, TokenKind};

impl Parser {
    /// Parses a full expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_expression(0)
    }

    /// Parses an expression whose operators bind at least as tightly as `min_bp`.
    pub(super) fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_prefix()?;

        loop {
            let kind = self.current().kind.clone();
            match kind {
                TokenKind::Keyword(Keyword::Collate) if COLLATE_BP >= min_bp => {
                    self.advance();
                    let collation = self.expect_identifier()?;
                    left = Expr::Collate {
                        expr: Box::new(left),
                        collation,
                    };
                }
                TokenKind::Keyword(kw @ (Keyword::Isnull | Keyword::Notnull))
                    if EQUALITY_BP.0 >= min_bp =>
                {
                    self.advance();
                    left = Expr::IsNull {
                        expr: Box::new(left),
                        negated: kw == Keyword::Notnull,
                    };
                }
                // Postfix `NOT NULL`
                TokenKind::Operator(Operator::Not)
                    if self.peek_is_keyword(1, Keyword::Null) && EQUALITY_BP.0 >= min_bp =>
                {
                    self.advance();
                    self.advance();
                    left = Expr::IsNull {
                        expr: Box::new(left),
                        negated: true,
                    };
                }
                TokenKind::Operator(op) => {
                    let Some((l_bp, r_bp)) = infix_binding_power(op) else {
                        break;
                    };
                    if l_bp < min_bp {
                        break;
                    }
                    self.advance();
                    left = self.parse_infix(left, op, r_bp)?;
                }
                _ => break,
            }
        }

        Ok(left)
    }

    fn parse_infix(&mut self, left: Expr, op: Operator, r_bp: u8) -> Result<Expr, ParseError> {
        match op {
            Operator::In | Operator::NotIn => Ok(Expr::In {
                expr: Box::new(left),
                negated: op == Operator::NotIn,
                target: self.parse_in_target()?,
            }),
            Operator::Between | Operator::NotBetween => {
                let low = self.parse_expression(r_bp)?;
                self.expect(Operator::And)?;
                let high = self.parse_expression(r_bp)?;
                Ok(Expr::Between {
                    expr: Box::new(left),
                    negated: op == Operator::NotBetween,
                    low: Box::new(low),
                    high: Box::new(high),
                })
            }
            _ => {
                if let Some((like, negated)) = token_to_like_op(op) {
                    let pattern = self.parse_expression(r_bp)?;
                    let escape = if self.try_keyword(Keyword::Escape) {
                        Some(Box::new(self.parse_expression(r_bp)?))
                    } else {
                        None
                    };
                    return Ok(Expr::Like {
                        expr: Box::new(left),
                        op: like,
                        negated,
                        pattern: Box::new(pattern),
                        escape,
                    });
                }
                let Some(binary) = token_to_binary_op(op) else {
                    return Err(self.error_expected("binary operator"));
                };
                let right = self.parse_expression(r_bp)?;
                Ok(left.binary(binary, right))
            }
        }
    }

    fn parse_in_target(&mut self) -> Result<InTarget, ParseError> {
        if !self.try_consume(Operator::LeftParen) {
            return Ok(InTarget::Table(self.parse_qualified_name()?));
        }
        let target = if self.starts_select() {
            InTarget::Subquery(Box::new(self.parse_select_statement()?))
        } else {
            InTarget::List(self.parse_list0(Operator::Comma, Self::parse_expr)?)
        };
        self.expect(Operator::RightParen)?;
        Ok(target)
    }

    /// Parses a prefix expression (unary operators and primaries).
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = self.current().as_operator() {
            if let (Some(unary), Some(bp)) = (token_to_unary_op(op), prefix_binding_power(op)) {
                self.advance();
                let operand = self.parse_expression(bp)?;
                return Ok(Expr::Unary {
                    op: unary,
                    operand: Box::new(operand),
                });
            }
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::Numeric(text) => {
                self.advance();
                Ok(Expr::Literal(Literal::Number(text)))
            }
            TokenKind::Text(text) => {
                self.advance();
                Ok(Expr::Literal(Literal::Text(text)))
            }
            TokenKind::Blob(bytes) => {
                self.advance();
                Ok(Expr::Literal(Literal::Blob(bytes)))
            }
            TokenKind::Placeholder(name) => {
                self.advance();
                Ok(Expr::Parameter(name))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                Ok(Expr::Literal(Literal::Null))
            }
            TokenKind::Keyword(Keyword::CurrentTime) => {
                self.advance();
                Ok(Expr::Literal(Literal::CurrentTime))
            }
            TokenKind::Keyword(Keyword::CurrentDate) => {
                self.advance();
                Ok(Expr::Literal(Literal::CurrentDate))
            }
            TokenKind::Keyword(Keyword::CurrentTimestamp) => {
                self.advance();
                Ok(Expr::Literal(Literal::CurrentTimestamp))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::Keyword(Keyword::Cast) => self.parse_cast_expression(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance();
                self.expect(Operator::LeftParen)?;
                let query = self.parse_select_statement()?;
                self.expect(Operator::RightParen)?;
                Ok(Expr::Exists(Box::new(query)))
            }
            TokenKind::Keyword(Keyword::Raise) if self.peek_is_op(1, Operator::LeftParen) => {
                self.parse_raise()
            }
            TokenKind::Operator(Operator::LeftParen) => {
                self.advance();
                let expr = if self.starts_select() {
                    Expr::Subquery(Box::new(self.parse_select_statement()?))
                } else {
                    Expr::Paren(Box::new(self.parse_expr()?))
                };
                self.expect(Operator::RightParen)?;
                Ok(expr)
            }
            // Functions spelled like operators, e.g. `like(a, b)` or `glob(p, s)`
            TokenKind::Operator(op) if op.is_word() && self.peek_is_op(1, Operator::LeftParen) => {
                self.advance();
                self.parse_function_call(token.text)
            }
            _ if self.is_identifier_at(0) => {
                if self.peek_is_op(1, Operator::LeftParen) {
                    self.advance();
                    return self.parse_function_call(token.text);
                }
                self.parse_column_ref()
            }
            _ => Err(self.error_expected("expression")),
        }
    }

    /// Parses `name`, `table.name` or `schema.table.name`.
    fn parse_column_ref(&mut self) -> Result<Expr, ParseError> {
        let mut parts = vec![self.expect_identifier()?];
        while parts.len() < 3 && self.check_op(Operator::Dot) {
            self.advance();
            parts.push(self.expect_identifier()?);
        }
        let name = parts.pop().unwrap_or_default();
        let table = parts.pop();
        let schema = parts.pop();
        Ok(Expr::Column(ColumnRef {
            schema,
            table,
            name,
        }))
    }

    /// Parses a function call after its name.
    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(Operator::LeftParen)?;

        let distinct = self.try_keyword(Keyword::Distinct);
        let args = if self.try_consume(Operator::Star) {
            FunctionArgs::Star
        } else {
            FunctionArgs::List(self.parse_list0(Operator::Comma, Self::parse_expr)?)
        };

        self.expect(Operator::RightParen)?;

        Ok(Expr::Function(FunctionCall {
            name,
            distinct,
            args,
        }))
    }

    /// Parses a CAST expression.
    fn parse_cast_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Cast)?;
        self.expect(Operator::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(Operator::RightParen)?;
        Ok(Expr::Cast {
            expr: Box::new(expr),
            data_type,
        })
    }

    /// Parses a CASE expression.
    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;

        // Check for simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut when_clauses = Vec::new();
        while self.try_keyword(Keyword::When) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            when_clauses.push((condition, result));
        }
        if when_clauses.is_empty() {
            return Err(self.error_expected("WHEN"));
        }

        let else_clause = if self.try_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case {
            operand,
            when_clauses,
            else_clause,
        })
    }

    /// Parses `RAISE(IGNORE)` or `RAISE(ROLLBACK|ABORT|FAIL, 'message')`.
    fn parse_raise(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Raise)?;
        self.expect(Operator::LeftParen)?;
        let action = match self.current().as_keyword() {
            Some(Keyword::Ignore) => RaiseAction::Ignore,
            Some(Keyword::Rollback) => RaiseAction::Rollback,
            Some(Keyword::Abort) => RaiseAction::Abort,
            Some(Keyword::Fail) => RaiseAction::Fail,
            _ => return Err(self.error_expected_any(&["IGNORE", "ROLLBACK", "ABORT", "FAIL"])),
        };
        self.advance();

        let message = if action == RaiseAction::Ignore {
            None
        } else {
            self.expect(Operator::Comma)?;
            match &self.current().kind {
                TokenKind::Text(message) => {
                    let message = message.clone();
                    self.advance();
                    Some(message)
                }
                _ => return Err(self.error_expected("string literal")),
            }
        };

        self.expect(Operator::RightParen)?;
        Ok(Expr::Raise { action, message })
    }

    /// Parses a type name: one or more words with optional `(size[, scale])`.
    pub(super) fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let mut words = Vec::new();
        while let TokenKind::Identifier(word) = &self.current().kind {
            words.push(word.clone());
            self.advance();
        }
        if words.is_empty() {
            return Err(self.error_expected("type name"));
        }

        let mut data_type = DataType::new(words.join(" "));
        if self.try_consume(Operator::LeftParen) {
            data_type.size = Some(self.parse_signed_number()?);
            if self.try_consume(Operator::Comma) {
                data_type.scale = Some(self.parse_signed_number()?);
            }
            self.expect(Operator::RightParen)?;
        }
        Ok(data_type)
    }

    /// Parses an optionally signed numeric literal, returning its text.
    pub(super) fn parse_signed_number(&mut self) -> Result<String, ParseError> {
        let sign = if self.try_consume(Operator::Minus) {
            "-"
        } else {
            self.try_consume(Operator::Plus);
            ""
        };
        match &self.current().kind {
            TokenKind::Numeric(text) => {
                let number = format!("{sign}{text}");
                self.advance();
                Ok(number)
            }
            _ => Err(self.error_expected("number")),
        }
    }

    /// True if a SELECT statement starts at the current token.
    pub(super) fn starts_select(&self) -> bool {
        matches!(
            self.current().as_keyword(),
            Some(Keyword::Select | Keyword::Values | Keyword::With)
        )
    }
}
