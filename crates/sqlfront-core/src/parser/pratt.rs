//! Pratt binding powers for the SQLite operator precedence table.
//!
//! Binding powers derive from [`precedence`] levels: an infix operator at
//! level `p` binds with `(2p, 2p + 1)`, making every binary operator left
//! associative.

use crate::ast::{precedence, BinaryOp, LikeOp, UnaryOp};
use crate::lexer::Operator;

/// `(left_bp, right_bp)` for an operator at `level`.
#[must_use]
pub const fn level_binding_power(level: u8) -> (u8, u8) {
    (level * 2, level * 2 + 1)
}

/// Left binding power of postfix `COLLATE`.
pub const COLLATE_BP: u8 = precedence::COLLATE * 2;

/// Binding power of the equality family (`IN`, `LIKE`, `BETWEEN`, `ISNULL`, ...).
pub const EQUALITY_BP: (u8, u8) = level_binding_power(precedence::EQUALITY);

/// Returns the right binding power of a prefix operator.
///
/// Returns `None` if the operator cannot start an expression.
#[must_use]
pub const fn prefix_binding_power(op: Operator) -> Option<u8> {
    match op {
        Operator::Not => Some(precedence::NOT * 2),
        Operator::Minus | Operator::Plus | Operator::BitNot => Some(precedence::UNARY * 2),
        _ => None,
    }
}

/// Returns the infix binding power for an operator.
///
/// Returns `None` if the operator is not infix.
#[must_use]
pub const fn infix_binding_power(op: Operator) -> Option<(u8, u8)> {
    if let Some(binary) = token_to_binary_op(op) {
        return Some(level_binding_power(binary.precedence()));
    }
    match op {
        Operator::In
        | Operator::NotIn
        | Operator::Between
        | Operator::NotBetween
        | Operator::Like
        | Operator::NotLike
        | Operator::Glob
        | Operator::NotGlob
        | Operator::Match
        | Operator::NotMatch
        | Operator::Regexp
        | Operator::NotRegexp => Some(EQUALITY_BP),
        _ => None,
    }
}

/// Converts an operator to a binary operator.
#[must_use]
pub const fn token_to_binary_op(op: Operator) -> Option<BinaryOp> {
    match op {
        Operator::Plus => Some(BinaryOp::Add),
        Operator::Minus => Some(BinaryOp::Sub),
        Operator::Star => Some(BinaryOp::Mul),
        Operator::Slash => Some(BinaryOp::Div),
        Operator::Percent => Some(BinaryOp::Mod),
        Operator::Eq => Some(BinaryOp::Eq),
        Operator::NotEq => Some(BinaryOp::NotEq),
        Operator::Is => Some(BinaryOp::Is),
        Operator::IsNot => Some(BinaryOp::IsNot),
        Operator::Lt => Some(BinaryOp::Lt),
        Operator::LtEq => Some(BinaryOp::LtEq),
        Operator::Gt => Some(BinaryOp::Gt),
        Operator::GtEq => Some(BinaryOp::GtEq),
        Operator::And => Some(BinaryOp::And),
        Operator::Or => Some(BinaryOp::Or),
        Operator::Concat => Some(BinaryOp::Concat),
        Operator::BitAnd => Some(BinaryOp::BitAnd),
        Operator::BitOr => Some(BinaryOp::BitOr),
        Operator::LeftShift => Some(BinaryOp::LeftShift),
        Operator::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts an operator to a unary operator.
#[must_use]
pub const fn token_to_unary_op(op: Operator) -> Option<UnaryOp> {
    match op {
        Operator::Minus => Some(UnaryOp::Neg),
        Operator::Plus => Some(UnaryOp::Plus),
        Operator::Not => Some(UnaryOp::Not),
        Operator::BitNot => Some(UnaryOp::BitNot),
        _ => None,
    }
}

/// Converts an operator to a pattern-matching operator and its negation flag.
#[must_use]
pub const fn token_to_like_op(op: Operator) -> Option<(LikeOp, bool)> {
    match op {
        Operator::Like => Some((LikeOp::Like, false)),
        Operator::NotLike => Some((LikeOp::Like, true)),
        Operator::Glob => Some((LikeOp::Glob, false)),
        Operator::NotGlob => Some((LikeOp::Glob, true)),
        Operator::Match => Some((LikeOp::Match, false)),
        Operator::NotMatch => Some((LikeOp::Match, true)),
        Operator::Regexp => Some((LikeOp::Regexp, false)),
        Operator::NotRegexp => Some((LikeOp::Regexp, true)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bp(op: Operator) -> (u8, u8) {
        infix_binding_power(op).unwrap()
    }

    #[test]
    fn test_precedence_order() {
        assert!(bp(Operator::Or).0 < bp(Operator::And).0);
        assert!(bp(Operator::And).0 < prefix_binding_power(Operator::Not).unwrap());
        assert!(prefix_binding_power(Operator::Not).unwrap() < bp(Operator::Eq).0);
        assert!(bp(Operator::Eq).0 < bp(Operator::Lt).0);
        assert!(bp(Operator::Lt).0 < bp(Operator::BitAnd).0);
        assert!(bp(Operator::BitAnd).0 < bp(Operator::Plus).0);
        assert!(bp(Operator::Plus).0 < bp(Operator::Star).0);
        assert!(bp(Operator::Star).0 < bp(Operator::Concat).0);
        assert!(bp(Operator::Concat).0 < COLLATE_BP);
        assert!(COLLATE_BP < prefix_binding_power(Operator::Minus).unwrap());
    }

    #[test]
    fn test_equality_family_shares_level() {
        for op in [
            Operator::Eq,
            Operator::NotEq,
            Operator::Is,
            Operator::IsNot,
            Operator::In,
            Operator::NotIn,
            Operator::Like,
            Operator::NotGlob,
            Operator::Between,
        ] {
            assert_eq!(bp(op), EQUALITY_BP, "{op}");
        }
    }

    #[test]
    fn test_left_associativity() {
        let (l, r) = bp(Operator::Minus);
        assert!(l < r);
    }

    #[test]
    fn test_token_to_op() {
        assert_eq!(token_to_binary_op(Operator::IsNot), Some(BinaryOp::IsNot));
        assert_eq!(token_to_binary_op(Operator::Comma), None);
        assert_eq!(token_to_unary_op(Operator::Not), Some(UnaryOp::Not));
        assert_eq!(token_to_like_op(Operator::NotRegexp), Some((LikeOp::Regexp, true)));
        assert_eq!(infix_binding_power(Operator::LeftParen), None);
    }
}
