//! Integer arithmetic over a single bound heap variable.
//!
//! Supports `+ - * / // % **`, parentheses, unary signs and integer literals,
//! with Python-style precedence (`**` binds tighter than unary minus and is
//! right associative). The heap variable is written `x` or `X`.
//!
//! Evaluation never panics: anything without an integer answer (division by
//! zero, inexact `/`, negative exponent, overflow) evaluates to `None`.
use std::fmt;

use crate::error::ExprError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    /// Exact division, undefined when the quotient is not an integer.
    Div,
    /// Floor division.
    FloorDiv,
    /// Remainder taking the sign of the divisor.
    Mod,
    Pow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(i64),
    Heap,
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn parse(source: &str) -> Result<Expr, ExprError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(ExprError::UnexpectedToken(token.to_string())),
        }
    }

    /// Evaluates with the heap variable bound to `heap`.
    pub fn eval(&self, heap: i64) -> Option<i64> {
        match self {
            Expr::Literal(n) => Some(*n),
            Expr::Heap => Some(heap),
            Expr::Neg(inner) => inner.eval(heap)?.checked_neg(),
            Expr::Binary(op, lhs, rhs) => apply(*op, lhs.eval(heap)?, rhs.eval(heap)?),
        }
    }
}

fn apply(op: BinOp, a: i64, b: i64) -> Option<i64> {
    match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if a.checked_rem(b)? != 0 {
                return None;
            }
            a.checked_div(b)
        }
        BinOp::FloorDiv => {
            let q = a.checked_div(b)?;
            if a % b != 0 && (a < 0) != (b < 0) {
                q.checked_sub(1)
            } else {
                Some(q)
            }
        }
        BinOp::Mod => {
            let r = a.checked_rem(b)?;
            if r != 0 && (r < 0) != (b < 0) {
                r.checked_add(b)
            } else {
                Some(r)
            }
        }
        BinOp::Pow => a.checked_pow(u32::try_from(b).ok()?),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Int(i64),
    Heap,
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(n) => write!(f, "{}", n),
            Token::Heap => write!(f, "x"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::StarStar => write!(f, "'**'"),
            Token::Slash => write!(f, "'/'"),
            Token::SlashSlash => write!(f, "'//'"),
            Token::Percent => write!(f, "'%'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = vec![];
    let mut chars = source.char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '0'..='9' => {
                let mut digits = String::from(c);
                while let Some(&(_, d)) = chars.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    digits.push(d);
                    chars.next();
                }
                let value = digits
                    .parse()
                    .map_err(|_| ExprError::LiteralOverflow(digits.clone()))?;
                Token::Int(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::from(c);
                while let Some(&(_, d)) = chars.peek() {
                    if !(d.is_alphanumeric() || d == '_') {
                        break;
                    }
                    name.push(d);
                    chars.next();
                }
                match name.as_str() {
                    "x" | "X" => Token::Heap,
                    _ => return Err(ExprError::UnknownVariable(name)),
                }
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.next_if(|&(_, d)| d == '*').is_some() => Token::StarStar,
            '*' => Token::Star,
            '/' if chars.next_if(|&(_, d)| d == '/').is_some() => Token::SlashSlash,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar(other, offset)),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn sum(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(self.product()?));
        }
    }

    fn product(&mut self) -> Result<Expr, ExprError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::SlashSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(self.unary()?));
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.atom()?;
        if self.peek() == Some(&Token::StarStar) {
            self.pos += 1;
            // right associative, and the exponent may carry its own sign
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some(Token::Int(n)) => Ok(Expr::Literal(n)),
            Some(Token::Heap) => Ok(Expr::Heap),
            Some(Token::LParen) => {
                let inner = self.sum()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    Some(token) => Err(ExprError::UnexpectedToken(token.to_string())),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some(token) => Err(ExprError::UnexpectedToken(token.to_string())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(source: &str, heap: i64) -> Option<i64> {
        Expr::parse(source).unwrap().eval(heap)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("x*2+1", 5), Some(11));
        assert_eq!(eval("1 + x * 2", 5), Some(11));
        assert_eq!(eval("(x + 1) * 2", 5), Some(12));
        assert_eq!(eval("-2 ** 2", 0), Some(-4));
        assert_eq!(eval("2 ** 3 ** 2", 0), Some(512));
        assert_eq!(eval("X - 3 - 2", 10), Some(5));
    }

    #[test]
    fn test_division_semantics() {
        assert_eq!(eval("x / 2", 10), Some(5));
        assert_eq!(eval("x / 3", 10), None);
        assert_eq!(eval("x // 3", 10), Some(3));
        assert_eq!(eval("x // 3", -10), Some(-4));
        assert_eq!(eval("x % 3", -10), Some(2));
        assert_eq!(eval("x % -3", 10), Some(-2));
    }

    #[test]
    fn test_undefined_results() {
        assert_eq!(eval("x / 0", 4), None);
        assert_eq!(eval("x // 0", 4), None);
        assert_eq!(eval("x % 0", 4), None);
        assert_eq!(eval("x ** -1", 4), None);
        assert_eq!(eval("x * x", i64::MAX), None);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Expr::parse(""), Err(ExprError::Empty));
        assert_eq!(Expr::parse("x +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(
            Expr::parse("heap + 1"),
            Err(ExprError::UnknownVariable("heap".to_string()))
        );
        assert_eq!(
            Expr::parse("x $ 12"),
            Err(ExprError::UnexpectedChar('$', 2))
        );
        assert_eq!(Expr::parse("(x + 1"), Err(ExprError::UnexpectedEnd));
        assert_eq!(
            Expr::parse("x 1"),
            Err(ExprError::UnexpectedToken("1".to_string()))
        );
        assert_eq!(
            Expr::parse("99999999999999999999"),
            Err(ExprError::LiteralOverflow("99999999999999999999".to_string()))
        );
    }
}
