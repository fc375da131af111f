//! Token types for the SQL lexer.

use core::fmt;

use super::Span;

/// SQL keywords.
///
/// Word operators (`AND`, `NOT`, `LIKE`, ...) are not keywords; they live in
/// [`Operator`] so that no keyword and operator share a canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Data Query Language (DQL)
    Select,
    From,
    Where,
    Order,
    By,
    Group,
    Having,
    Limit,
    Offset,
    Distinct,
    All,
    Escape,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    On,
    Using,
    Indexed,

    // Set operations
    Union,
    Intersect,
    Except,

    // Data Manipulation Language (DML)
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    Do,
    Nothing,

    // Data Definition Language (DDL)
    Create,
    Drop,
    Alter,
    Add,
    Rename,
    To,
    Column,
    Table,
    Index,
    View,
    Trigger,
    Virtual,
    Without,

    // Constraints
    Primary,
    Key,
    Foreign,
    References,
    Unique,
    Check,
    Default,
    Constraint,
    Collate,
    Generated,
    Always,
    Stored,
    Cascade,
    Restrict,
    Action,
    No,
    Deferrable,
    Initially,
    Deferred,
    Immediate,

    // NULL handling
    Null,
    Isnull,
    Notnull,
    Exists,

    // Ordering
    Asc,
    Desc,
    Nulls,
    First,
    Last,

    // Conflict resolution
    Autoincrement,
    If,
    Temporary,
    Temp,
    Conflict,
    Replace,
    Abort,
    Rollback,
    Fail,
    Ignore,

    // Expressions
    As,
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    Raise,
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,

    // Triggers
    Before,
    After,
    Instead,
    Of,
    For,
    Each,
    Row,
    Begin,

    // Misc
    With,
    Recursive,
}

/// Every keyword, in declaration order.
const ALL_KEYWORDS: &[Keyword] = &[
    Keyword::Select,
    Keyword::From,
    Keyword::Where,
    Keyword::Order,
    Keyword::By,
    Keyword::Group,
    Keyword::Having,
    Keyword::Limit,
    Keyword::Offset,
    Keyword::Distinct,
    Keyword::All,
    Keyword::Escape,
    Keyword::Join,
    Keyword::Inner,
    Keyword::Left,
    Keyword::Right,
    Keyword::Full,
    Keyword::Outer,
    Keyword::Cross,
    Keyword::Natural,
    Keyword::On,
    Keyword::Using,
    Keyword::Indexed,
    Keyword::Union,
    Keyword::Intersect,
    Keyword::Except,
    Keyword::Insert,
    Keyword::Into,
    Keyword::Values,
    Keyword::Update,
    Keyword::Set,
    Keyword::Delete,
    Keyword::Do,
    Keyword::Nothing,
    Keyword::Create,
    Keyword::Drop,
    Keyword::Alter,
    Keyword::Add,
    Keyword::Rename,
    Keyword::To,
    Keyword::Column,
    Keyword::Table,
    Keyword::Index,
    Keyword::View,
    Keyword::Trigger,
    Keyword::Virtual,
    Keyword::Without,
    Keyword::Primary,
    Keyword::Key,
    Keyword::Foreign,
    Keyword::References,
    Keyword::Unique,
    Keyword::Check,
    Keyword::Default,
    Keyword::Constraint,
    Keyword::Collate,
    Keyword::Generated,
    Keyword::Always,
    Keyword::Stored,
    Keyword::Cascade,
    Keyword::Restrict,
    Keyword::Action,
    Keyword::No,
    Keyword::Deferrable,
    Keyword::Initially,
    Keyword::Deferred,
    Keyword::Immediate,
    Keyword::Null,
    Keyword::Isnull,
    Keyword::Notnull,
    Keyword::Exists,
    Keyword::Asc,
    Keyword::Desc,
    Keyword::Nulls,
    Keyword::First,
    Keyword::Last,
    Keyword::Autoincrement,
    Keyword::If,
    Keyword::Temporary,
    Keyword::Temp,
    Keyword::Conflict,
    Keyword::Replace,
    Keyword::Abort,
    Keyword::Rollback,
    Keyword::Fail,
    Keyword::Ignore,
    Keyword::As,
    Keyword::Case,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
    Keyword::Cast,
    Keyword::Raise,
    Keyword::CurrentDate,
    Keyword::CurrentTime,
    Keyword::CurrentTimestamp,
    Keyword::Before,
    Keyword::After,
    Keyword::Instead,
    Keyword::Of,
    Keyword::For,
    Keyword::Each,
    Keyword::Row,
    Keyword::Begin,
    Keyword::With,
    Keyword::Recursive,
];

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        ALL_KEYWORDS
            .iter()
            .copied()
            .find(|kw| kw.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the keyword as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Limit => "LIMIT",
            Self::Offset => "OFFSET",
            Self::Distinct => "DISTINCT",
            Self::All => "ALL",
            Self::Escape => "ESCAPE",
            Self::Join => "JOIN",
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::Natural => "NATURAL",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Indexed => "INDEXED",
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::Do => "DO",
            Self::Nothing => "NOTHING",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Add => "ADD",
            Self::Rename => "RENAME",
            Self::To => "TO",
            Self::Column => "COLUMN",
            Self::Table => "TABLE",
            Self::Index => "INDEX",
            Self::View => "VIEW",
            Self::Trigger => "TRIGGER",
            Self::Virtual => "VIRTUAL",
            Self::Without => "WITHOUT",
            Self::Primary => "PRIMARY",
            Self::Key => "KEY",
            Self::Foreign => "FOREIGN",
            Self::References => "REFERENCES",
            Self::Unique => "UNIQUE",
            Self::Check => "CHECK",
            Self::Default => "DEFAULT",
            Self::Constraint => "CONSTRAINT",
            Self::Collate => "COLLATE",
            Self::Generated => "GENERATED",
            Self::Always => "ALWAYS",
            Self::Stored => "STORED",
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
            Self::Action => "ACTION",
            Self::No => "NO",
            Self::Deferrable => "DEFERRABLE",
            Self::Initially => "INITIALLY",
            Self::Deferred => "DEFERRED",
            Self::Immediate => "IMMEDIATE",
            Self::Null => "NULL",
            Self::Isnull => "ISNULL",
            Self::Notnull => "NOTNULL",
            Self::Exists => "EXISTS",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Nulls => "NULLS",
            Self::First => "FIRST",
            Self::Last => "LAST",
            Self::Autoincrement => "AUTOINCREMENT",
            Self::If => "IF",
            Self::Temporary => "TEMPORARY",
            Self::Temp => "TEMP",
            Self::Conflict => "CONFLICT",
            Self::Replace => "REPLACE",
            Self::Abort => "ABORT",
            Self::Rollback => "ROLLBACK",
            Self::Fail => "FAIL",
            Self::Ignore => "IGNORE",
            Self::As => "AS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::Cast => "CAST",
            Self::Raise => "RAISE",
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::Instead => "INSTEAD",
            Self::Of => "OF",
            Self::For => "FOR",
            Self::Each => "EACH",
            Self::Row => "ROW",
            Self::Begin => "BEGIN",
            Self::With => "WITH",
            Self::Recursive => "RECURSIVE",
        }
    }

    /// Returns true if the keyword can never be used as a bare identifier.
    ///
    /// Everything else may name a table or column when unquoted (`key`,
    /// `action`, `first`, ...), mirroring SQLite's fallback rule.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::From
                | Self::Where
                | Self::Order
                | Self::Group
                | Self::Having
                | Self::Limit
                | Self::Distinct
                | Self::All
                | Self::Escape
                | Self::Join
                | Self::Inner
                | Self::Left
                | Self::Right
                | Self::Full
                | Self::Outer
                | Self::Cross
                | Self::Natural
                | Self::On
                | Self::Using
                | Self::Union
                | Self::Intersect
                | Self::Except
                | Self::Insert
                | Self::Into
                | Self::Values
                | Self::Update
                | Self::Set
                | Self::Delete
                | Self::Create
                | Self::Drop
                | Self::Alter
                | Self::Add
                | Self::Table
                | Self::Index
                | Self::Primary
                | Self::Foreign
                | Self::References
                | Self::Unique
                | Self::Check
                | Self::Default
                | Self::Constraint
                | Self::Collate
                | Self::Null
                | Self::Isnull
                | Self::Notnull
                | Self::Exists
                | Self::As
                | Self::Case
                | Self::When
                | Self::Then
                | Self::Else
                | Self::Cast
                | Self::CurrentDate
                | Self::CurrentTime
                | Self::CurrentTimestamp
                | Self::To
                | Self::Indexed
                | Self::Autoincrement
                | Self::Deferrable
                | Self::Nothing
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operators and punctuation, symbolic or spelled as words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ||
    Concat,
    /// = or ==
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// ~
    BitNot,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,

    // Word operators
    And,
    Or,
    Not,
    Is,
    /// `IS NOT`, contracted by the lexer.
    IsNot,
    In,
    /// `NOT IN`, contracted by the lexer.
    NotIn,
    Like,
    NotLike,
    Glob,
    NotGlob,
    Match,
    NotMatch,
    Regexp,
    NotRegexp,
    Between,
    NotBetween,
}

/// Symbolic operators, used by the lexer's longest-match search.
const SYMBOLS: &[(&str, Operator)] = &[
    ("+", Operator::Plus),
    ("-", Operator::Minus),
    ("*", Operator::Star),
    ("/", Operator::Slash),
    ("%", Operator::Percent),
    ("||", Operator::Concat),
    ("=", Operator::Eq),
    ("==", Operator::Eq),
    ("!=", Operator::NotEq),
    ("<>", Operator::NotEq),
    ("<", Operator::Lt),
    ("<=", Operator::LtEq),
    (">", Operator::Gt),
    (">=", Operator::GtEq),
    ("&", Operator::BitAnd),
    ("|", Operator::BitOr),
    ("~", Operator::BitNot),
    ("<<", Operator::LeftShift),
    (">>", Operator::RightShift),
    ("(", Operator::LeftParen),
    (")", Operator::RightParen),
    (",", Operator::Comma),
    (";", Operator::Semicolon),
    (".", Operator::Dot),
];

/// Word operators that may appear as a single bare word.
const WORD_OPERATORS: &[Operator] = &[
    Operator::And,
    Operator::Or,
    Operator::Not,
    Operator::Is,
    Operator::In,
    Operator::Like,
    Operator::Glob,
    Operator::Match,
    Operator::Regexp,
    Operator::Between,
];

/// Two-word contractions: `(previous, next) -> composite`.
const CONTRACTIONS: &[(Operator, Operator, Operator)] = &[
    (Operator::Is, Operator::Not, Operator::IsNot),
    (Operator::Not, Operator::In, Operator::NotIn),
    (Operator::Not, Operator::Like, Operator::NotLike),
    (Operator::Not, Operator::Glob, Operator::NotGlob),
    (Operator::Not, Operator::Match, Operator::NotMatch),
    (Operator::Not, Operator::Regexp, Operator::NotRegexp),
    (Operator::Not, Operator::Between, Operator::NotBetween),
];

/// Longest symbolic operator, in characters.
pub const MAX_OPERATOR_LEN: usize = 2;

impl Operator {
    /// Looks up a symbolic operator by its exact spelling.
    #[must_use]
    pub fn from_symbol(s: &str) -> Option<Self> {
        SYMBOLS
            .iter()
            .find(|(text, _)| *text == s)
            .map(|(_, op)| *op)
    }

    /// Looks up a single-word operator (case-insensitive).
    #[must_use]
    pub fn from_word(s: &str) -> Option<Self> {
        WORD_OPERATORS
            .iter()
            .copied()
            .find(|op| op.as_str().eq_ignore_ascii_case(s))
    }

    /// Returns the composite operator formed by `self` followed by `next`.
    #[must_use]
    pub fn contract(self, next: Self) -> Option<Self> {
        CONTRACTIONS
            .iter()
            .find(|(first, second, _)| *first == self && *second == next)
            .map(|(_, _, composite)| *composite)
    }

    /// Returns true for operators spelled as words.
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self,
            Self::And
                | Self::Or
                | Self::Not
                | Self::Is
                | Self::IsNot
                | Self::In
                | Self::NotIn
                | Self::Like
                | Self::NotLike
                | Self::Glob
                | Self::NotGlob
                | Self::Match
                | Self::NotMatch
                | Self::Regexp
                | Self::NotRegexp
                | Self::Between
                | Self::NotBetween
        )
    }

    /// Returns the canonical spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Concat => "||",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitNot => "~",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::Dot => ".",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Glob => "GLOB",
            Self::NotGlob => "NOT GLOB",
            Self::Match => "MATCH",
            Self::NotMatch => "NOT MATCH",
            Self::Regexp => "REGEXP",
            Self::NotRegexp => "NOT REGEXP",
            Self::Between => "BETWEEN",
            Self::NotBetween => "NOT BETWEEN",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// SQL keyword.
    Keyword(Keyword),
    /// Operator or punctuation.
    Operator(Operator),
    /// Identifier, unquoted and unescaped.
    Identifier(String),
    /// Numeric literal, kept in its source spelling (e.g. `42`, `2.5e-3`, `0x1F`).
    Numeric(String),
    /// Text literal with quotes removed and `''` unescaped.
    Text(String),
    /// Blob literal (e.g. `X'CAFE'`).
    Blob(Vec<u8>),
    /// Parameter placeholder including its sigil (`?`, `?1`, `:name`, `@name`, `$name`).
    Placeholder(String),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Short human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Keyword(kw) => kw.as_str().to_string(),
            Self::Operator(op) => format!("'{}'", op.as_str()),
            Self::Identifier(name) => format!("identifier {name:?}"),
            Self::Numeric(text) => format!("number {text}"),
            Self::Text(_) => String::from("string literal"),
            Self::Blob(_) => String::from("blob literal"),
            Self::Placeholder(p) => format!("placeholder {p}"),
            Self::Eof => String::from("end of input"),
        }
    }
}

/// A token with its source text and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The raw source text of the token.
    pub text: String,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Byte offset of the token in the source.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.span.start
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }

    /// Returns the operator if this is an operator token.
    #[must_use]
    pub const fn as_operator(&self) -> Option<Operator> {
        match &self.kind {
            TokenKind::Operator(op) => Some(*op),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("SeLeCt"), Some(Keyword::Select));
        assert_eq!(
            Keyword::from_str("current_timestamp"),
            Some(Keyword::CurrentTimestamp)
        );
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_table_is_total() {
        for kw in ALL_KEYWORDS {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(*kw));
        }
    }

    #[test]
    fn test_keywords_and_operators_do_not_collide() {
        for kw in ALL_KEYWORDS {
            assert_eq!(Operator::from_word(kw.as_str()), None, "{kw}");
        }
        for op in WORD_OPERATORS {
            assert_eq!(Keyword::from_str(op.as_str()), None, "{op}");
        }
    }

    #[test]
    fn test_operator_aliases() {
        assert_eq!(Operator::from_symbol("<>"), Some(Operator::NotEq));
        assert_eq!(Operator::from_symbol("!="), Some(Operator::NotEq));
        assert_eq!(Operator::from_symbol("=="), Some(Operator::Eq));
        assert_eq!(Operator::from_symbol("!"), None);
    }

    #[test]
    fn test_contractions() {
        assert_eq!(Operator::Is.contract(Operator::Not), Some(Operator::IsNot));
        assert_eq!(Operator::Not.contract(Operator::In), Some(Operator::NotIn));
        assert_eq!(Operator::Not.contract(Operator::Is), None);
    }

    #[test]
    fn test_token_accessors() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), "select", Span::new(3, 9));
        let plus = Token::new(TokenKind::Operator(Operator::Plus), "+", Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(select.offset(), 3);
        assert_eq!(plus.as_keyword(), None);
        assert_eq!(plus.as_operator(), Some(Operator::Plus));
        assert!(!plus.is_eof());
    }
}
