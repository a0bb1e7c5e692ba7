use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    #[serde(rename = ">=")]
    AtLeast,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    AtMost,
}

impl Comparison {
    pub const ALL: [Comparison; 5] = [
        Comparison::AtLeast,
        Comparison::Equal,
        Comparison::Greater,
        Comparison::Less,
        Comparison::AtMost,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::Equal => "==",
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::AtMost => "<=",
        }
    }
}

impl FromStr for Comparison {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Comparison::ALL
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| ConfigError::Operator(s.to_string()))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The terminal target of the game: `value <op> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinCondition {
    pub comparison: Comparison,
    pub threshold: i64,
}

impl WinCondition {
    pub fn new(comparison: Comparison, threshold: i64) -> WinCondition {
        WinCondition {
            comparison,
            threshold,
        }
    }

    /// Compares in `i128` so that the two-heap sum never overflows.
    pub fn holds<V: Into<i128>>(&self, value: V) -> bool {
        let value = value.into();
        let threshold = i128::from(self.threshold);
        match self.comparison {
            Comparison::AtLeast => value >= threshold,
            Comparison::Equal => value == threshold,
            Comparison::Greater => value > threshold,
            Comparison::Less => value < threshold,
            Comparison::AtMost => value <= threshold,
        }
    }
}

impl fmt::Display for WinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparison, self.threshold)
    }
}
