//! Expression AST types.

use super::{DataType, SelectStatement};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, kept in its source spelling.
    Number(String),
    /// String literal (unescaped).
    Text(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// NULL literal.
    Null,
    /// `CURRENT_TIME`.
    CurrentTime,
    /// `CURRENT_DATE`.
    CurrentDate,
    /// `CURRENT_TIMESTAMP`.
    CurrentTimestamp,
}

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl QualifiedName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

/// A column reference, optionally qualified by table and schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub schema: Option<String>,
    pub table: Option<String>,
    pub name: String,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Equality
    Eq,
    NotEq,
    Is,
    IsNot,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // String
    Concat,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => precedence::OR,
            Self::And => precedence::AND,
            Self::Eq | Self::NotEq | Self::Is | Self::IsNot => precedence::EQUALITY,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => precedence::RELATIONAL,
            Self::BitAnd | Self::BitOr | Self::LeftShift | Self::RightShift => {
                precedence::BITWISE
            }
            Self::Add | Self::Sub => precedence::ADDITIVE,
            Self::Mul | Self::Div | Self::Mod => precedence::MULTIPLICATIVE,
            Self::Concat => precedence::CONCAT,
        }
    }
}

/// Operator precedence levels, loosest first.
pub mod precedence {
    pub const OR: u8 = 1;
    pub const AND: u8 = 2;
    pub const NOT: u8 = 3;
    /// `=`, `!=`, `IS`, `IN`, `LIKE`, `BETWEEN`, `ISNULL`, ...
    pub const EQUALITY: u8 = 4;
    pub const RELATIONAL: u8 = 5;
    pub const BITWISE: u8 = 6;
    pub const ADDITIVE: u8 = 7;
    pub const MULTIPLICATIVE: u8 = 8;
    pub const CONCAT: u8 = 9;
    pub const COLLATE: u8 = 10;
    pub const UNARY: u8 = 11;
    pub const ATOM: u8 = 12;
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Identity (+)
    Plus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }

    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Not => precedence::NOT,
            Self::Neg | Self::Plus | Self::BitNot => precedence::UNARY,
        }
    }
}

/// Pattern-matching operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOp {
    Like,
    Glob,
    Match,
    Regexp,
}

impl LikeOp {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "LIKE",
            Self::Glob => "GLOB",
            Self::Match => "MATCH",
            Self::Regexp => "REGEXP",
        }
    }
}

/// Action of a `RAISE(...)` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseAction {
    Ignore,
    Rollback,
    Abort,
    Fail,
}

impl RaiseAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ignore => "IGNORE",
            Self::Rollback => "ROLLBACK",
            Self::Abort => "ABORT",
            Self::Fail => "FAIL",
        }
    }
}

/// Arguments of a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionArgs {
    /// `count(*)`
    Star,
    /// Regular argument list (possibly empty).
    List(Vec<Expr>),
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    /// The function name, as written.
    pub name: String,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// The arguments.
    pub args: FunctionArgs,
}

/// Right-hand side of an `IN` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InTarget {
    /// `IN (1, 2, 3)`
    List(Vec<Expr>),
    /// `IN (SELECT ...)`
    Subquery(Box<SelectStatement>),
    /// `IN schema.table`
    Table(QualifiedName),
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A column reference.
    Column(ColumnRef),

    /// A parameter placeholder, including its sigil (`?1`, `:name`).
    Parameter(String),

    /// A unary expression.
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// A binary expression.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `expr [NOT] LIKE pattern [ESCAPE escape]` and its GLOB/MATCH/REGEXP siblings.
    Like {
        expr: Box<Expr>,
        op: LikeOp,
        negated: bool,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
    },

    /// `expr [NOT] BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// `expr [NOT] IN ...`
    In {
        expr: Box<Expr>,
        negated: bool,
        target: InTarget,
    },

    /// Postfix `ISNULL` / `NOTNULL`.
    IsNull { expr: Box<Expr>, negated: bool },

    /// CASE expression.
    Case {
        operand: Option<Box<Expr>>,
        when_clauses: Vec<(Expr, Expr)>,
        else_clause: Option<Box<Expr>>,
    },

    /// `CAST(expr AS type)`
    Cast {
        expr: Box<Expr>,
        data_type: DataType,
    },

    /// `expr COLLATE name`
    Collate { expr: Box<Expr>, collation: String },

    /// `EXISTS (SELECT ...)`
    Exists(Box<SelectStatement>),

    /// Scalar subquery.
    Subquery(Box<SelectStatement>),

    /// Parenthesized expression.
    Paren(Box<Expr>),

    /// A function call.
    Function(FunctionCall),

    /// `RAISE(action[, message])`, only meaningful inside trigger bodies.
    Raise {
        action: RaiseAction,
        message: Option<String>,
    },
}

impl Expr {
    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            schema: None,
            table: None,
            name: name.into(),
        })
    }

    /// Creates a new qualified column reference.
    #[must_use]
    pub fn qualified_column(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            schema: None,
            table: Some(table.into()),
            name: name.into(),
        })
    }

    /// Creates a numeric literal from its textual form.
    #[must_use]
    pub fn number(text: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(text.into()))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Text(value.into()))
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates a parenthesized expression.
    #[must_use]
    pub fn paren(self) -> Self {
        Self::Paren(Box::new(self))
    }

    /// Precedence of the outermost operator of this expression.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::Unary { op, .. } => op.precedence(),
            Self::Like { .. } | Self::Between { .. } | Self::In { .. } | Self::IsNull { .. } => {
                precedence::EQUALITY
            }
            Self::Collate { .. } => precedence::COLLATE,
            _ => precedence::ATOM,
        }
    }

    /// Splits a chain of `AND`s into its top-level terms.
    #[must_use]
    pub fn into_conjuncts(self) -> Vec<Self> {
        match self {
            Self::Binary {
                left,
                op: BinaryOp::And,
                right,
            } => {
                let mut terms = left.into_conjuncts();
                terms.extend(right.into_conjuncts());
                terms
            }
            other => vec![other],
        }
    }

    /// Joins terms back into a left-deep `AND` chain. Returns `None` for no terms.
    #[must_use]
    pub fn from_conjuncts(terms: Vec<Self>) -> Option<Self> {
        terms.into_iter().reduce(Self::and)
    }

    /// Calls `f` on this expression and every nested expression, pre-order.
    ///
    /// Subqueries are not entered; they open their own scope.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Self)) {
        f(self);
        match self {
            Self::Literal(_)
            | Self::Column(_)
            | Self::Parameter(_)
            | Self::Exists(_)
            | Self::Subquery(_)
            | Self::Raise { .. } => {}
            Self::Unary { operand: expr, .. }
            | Self::IsNull { expr, .. }
            | Self::Cast { expr, .. }
            | Self::Collate { expr, .. }
            | Self::Paren(expr) => expr.walk(f),
            Self::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            Self::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                expr.walk(f);
                pattern.walk(f);
                if let Some(escape) = escape {
                    escape.walk(f);
                }
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.walk(f);
                low.walk(f);
                high.walk(f);
            }
            Self::In { expr, target, .. } => {
                expr.walk(f);
                if let InTarget::List(list) = target {
                    for item in list {
                        item.walk(f);
                    }
                }
            }
            Self::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    operand.walk(f);
                }
                for (when, then) in when_clauses {
                    when.walk(f);
                    then.walk(f);
                }
                if let Some(else_clause) = else_clause {
                    else_clause.walk(f);
                }
            }
            Self::Function(call) => {
                if let FunctionArgs::List(args) = &call.args {
                    for arg in args {
                        arg.walk(f);
                    }
                }
            }
        }
    }

    /// Mutable counterpart of [`Expr::walk`]. Subqueries are not entered.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        match self {
            Self::Literal(_)
            | Self::Column(_)
            | Self::Parameter(_)
            | Self::Exists(_)
            | Self::Subquery(_)
            | Self::Raise { .. } => {}
            Self::Unary { operand: expr, .. }
            | Self::IsNull { expr, .. }
            | Self::Cast { expr, .. }
            | Self::Collate { expr, .. }
            | Self::Paren(expr) => expr.walk_mut(f),
            Self::Binary { left, right, .. } => {
                left.walk_mut(f);
                right.walk_mut(f);
            }
            Self::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                expr.walk_mut(f);
                pattern.walk_mut(f);
                if let Some(escape) = escape {
                    escape.walk_mut(f);
                }
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.walk_mut(f);
                low.walk_mut(f);
                high.walk_mut(f);
            }
            Self::In { expr, target, .. } => {
                expr.walk_mut(f);
                if let InTarget::List(list) = target {
                    for item in list {
                        item.walk_mut(f);
                    }
                }
            }
            Self::Case {
                operand,
                when_clauses,
                else_clause,
            } => {
                if let Some(operand) = operand {
                    operand.walk_mut(f);
                }
                for (when, then) in when_clauses {
                    when.walk_mut(f);
                    then.walk_mut(f);
                }
                if let Some(else_clause) = else_clause {
                    else_clause.walk_mut(f);
                }
            }
            Self::Function(call) => {
                if let FunctionArgs::List(args) = &mut call.args {
                    for arg in args {
                        arg.walk_mut(f);
                    }
                }
            }
        }
    }

    /// Returns the subqueries directly nested in this expression tree.
    #[must_use]
    pub fn subqueries(&self) -> Vec<&SelectStatement> {
        let mut found = Vec::new();
        self.walk(&mut |expr| match expr {
            Self::Exists(query) | Self::Subquery(query) => found.push(query.as_ref()),
            Self::In {
                target: InTarget::Subquery(query),
                ..
            } => found.push(query.as_ref()),
            _ => {}
        });
        found
    }

    /// Returns true if any column reference in this tree satisfies `pred`.
    ///
    /// Subqueries are not entered.
    #[must_use]
    pub fn any_column(&self, pred: impl Fn(&ColumnRef) -> bool) -> bool {
        let mut hit = false;
        self.walk(&mut |expr| {
            if let Self::Column(column) = expr {
                hit |= pred(column);
            }
        });
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::Concat.precedence() > BinaryOp::Mul.precedence());
        assert!(UnaryOp::Not.precedence() < BinaryOp::Eq.precedence());
    }

    #[test]
    fn test_expr_builders() {
        let col = Expr::qualified_column("t", "name");
        assert!(matches!(
            col,
            Expr::Column(ColumnRef { table: Some(ref t), ref name, .. }) if t == "t" && name == "name"
        ));
        assert_eq!(Expr::number("42"), Expr::Literal(Literal::Number("42".into())));
    }

    #[test]
    fn test_conjuncts_round_trip() {
        let expr = Expr::column("a")
            .eq(Expr::number("1"))
            .and(Expr::column("b").eq(Expr::number("2")))
            .and(Expr::column("c").or(Expr::column("d")));
        let terms = expr.clone().into_conjuncts();
        assert_eq!(terms.len(), 3);
        assert_eq!(Expr::from_conjuncts(terms), Some(expr));
        assert_eq!(Expr::from_conjuncts(Vec::new()), None);
    }

    #[test]
    fn test_any_column() {
        let expr = Expr::column("a").eq(Expr::qualified_column("t", "b").paren());
        assert!(expr.any_column(|c| c.name == "b"));
        assert!(!expr.any_column(|c| c.name == "z"));
    }

    #[test]
    fn test_walk_mut_renames() {
        let mut expr = Expr::column("a").and(Expr::column("a").or(Expr::column("b")));
        expr.walk_mut(&mut |e| {
            if let Expr::Column(c) = e {
                if c.name == "a" {
                    c.name = String::from("z");
                }
            }
        });
        assert_eq!(
            expr,
            Expr::column("z").and(Expr::column("z").or(Expr::column("b")))
        );
    }
}
