use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, ExprError};
use crate::expr::Expr;

/// A configured transformation of one heap value.
///
/// Parsed from the shorthands `+N`, `-N` and `*N` (N any signed integer), or
/// from a free-form arithmetic expression over the heap variable `x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Add(i64),
    Subtract(i64),
    Multiply(i64),
    Expression { source: String, expr: Expr },
}

impl Move {
    /// Returns the heap value after the move, or `None` when the move has no
    /// integer result for this heap.
    pub fn apply(&self, heap: i64) -> Option<i64> {
        match self {
            Move::Add(n) => heap.checked_add(*n),
            Move::Subtract(n) => heap.checked_sub(*n),
            Move::Multiply(n) => heap.checked_mul(*n),
            Move::Expression { expr, .. } => expr.eval(heap),
        }
    }

    /// Parses every spec in order, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(specs: &[S]) -> Result<Vec<Move>, ConfigError> {
        specs.iter().map(|spec| spec.as_ref().parse()).collect()
    }
}

impl FromStr for Move {
    type Err = ConfigError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        let mut chars = spec.chars();
        let shorthand = match chars.next() {
            Some('+') => chars.as_str().trim().parse().ok().map(Move::Add),
            Some('-') => chars.as_str().trim().parse().ok().map(Move::Subtract),
            Some('*') => chars.as_str().trim().parse().ok().map(Move::Multiply),
            _ => None,
        };
        if let Some(m) = shorthand {
            return Ok(m);
        }
        let expr = Expr::parse(spec).map_err(|source: ExprError| ConfigError::Move {
            spec: spec.to_string(),
            source,
        })?;
        Ok(Move::Expression {
            source: spec.to_string(),
            expr,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Add(n) => write!(f, "+{}", n),
            Move::Subtract(n) => write!(f, "-{}", n),
            Move::Multiply(n) => write!(f, "*{}", n),
            Move::Expression { source, .. } => write!(f, "{}", source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorthands() {
        assert_eq!("+1".parse::<Move>().unwrap(), Move::Add(1));
        assert_eq!("-3".parse::<Move>().unwrap(), Move::Subtract(3));
        assert_eq!(" *2 ".parse::<Move>().unwrap(), Move::Multiply(2));
        assert_eq!("+-4".parse::<Move>().unwrap(), Move::Add(-4));
        assert_eq!("+4".parse::<Move>().unwrap().apply(7), Some(11));
        assert_eq!("-4".parse::<Move>().unwrap().apply(7), Some(3));
        assert_eq!("*3".parse::<Move>().unwrap().apply(7), Some(21));
    }

    #[test]
    fn test_expression_moves() {
        let m: Move = "x*2+1".parse().unwrap();
        assert!(matches!(m, Move::Expression { .. }));
        assert_eq!(m.apply(10), Some(21));
        assert_eq!(m.to_string(), "x*2+1");

        // a sign prefix followed by something other than an integer
        let m: Move = "-x".parse().unwrap();
        assert_eq!(m.apply(6), Some(-6));

        let halve: Move = "x / 2".parse().unwrap();
        assert_eq!(halve.apply(8), Some(4));
        assert_eq!(halve.apply(7), None);
    }

    #[test]
    fn test_overflow_drops_move() {
        assert_eq!(Move::Add(1).apply(i64::MAX), None);
        assert_eq!(Move::Multiply(2).apply(i64::MIN), None);
    }

    #[test]
    fn test_malformed_move_is_config_error() {
        let err = "x ^ 2".parse::<Move>().unwrap_err();
        assert_eq!(
            err,
            ConfigError::Move {
                spec: "x ^ 2".to_string(),
                source: ExprError::UnexpectedChar('^', 2),
            }
        );
        assert!(Move::parse_all(&["+1", "*2", "y+1"]).is_err());
        assert_eq!(Move::parse_all(&["+1", "*2"]).unwrap().len(), 2);
    }
}
