use thiserror::Error;

/// Errors raised while parsing a move expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    #[error("unexpected character '{0}' at offset {1}")]
    UnexpectedChar(char, usize),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("integer literal out of range: {0}")]
    LiteralOverflow(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    #[error("empty expression")]
    Empty,
}

/// Errors reported before any search is started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unrecognized win condition operator '{0}'")]
    Operator(String),
    #[error("{field} is not an integer: '{value}'")]
    NotInteger { field: &'static str, value: String },
    #[error(
        "{field} must be a ply count from 0 to {}, got {value}",
        crate::config::MAX_BUDGET
    )]
    Budget { field: &'static str, value: i64 },
    #[error("empty search range: start {start} is greater than end {end}")]
    Range { start: i64, end: i64 },
    #[error("heap 2 value is required for the two-heap variant")]
    MissingHeap2,
    #[error("at least one move is required")]
    NoMoves,
    #[error("invalid move '{spec}': {source}")]
    Move {
        spec: String,
        #[source]
        source: ExprError,
    },
    #[error("unknown preset '{0}'")]
    Preset(String),
}
