//! Raw problem configuration and its validation.
//!
//! A `ProblemForm` holds the values as entered (numbers may arrive as text),
//! and `ProblemForm::validate` turns it into a `Problem` ready to solve.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::{Evaluator, Move, OneHeap, RangeSolver, Solution, TwoHeaps, WinCondition};

pub const PRESETS: [&str; 2] = ["one-heap", "two-heaps"];

/// Largest accepted ply budget. The evaluator recurses once per ply, so this
/// bounds the stack depth of a single evaluation.
pub const MAX_BUDGET: u32 = 500;

/// A numeric input that is either already an integer or still text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Int(i64),
    Text(String),
}

impl Field {
    fn parse(&self, field: &'static str) -> Result<i64, ConfigError> {
        match self {
            Field::Int(n) => Ok(*n),
            Field::Text(s) => s.trim().parse().map_err(|_| ConfigError::NotInteger {
                field,
                value: s.clone(),
            }),
        }
    }

    fn parse_budget(&self, field: &'static str) -> Result<u32, ConfigError> {
        let value = self.parse(field)?;
        match u32::try_from(value) {
            Ok(budget) if budget <= MAX_BUDGET => Ok(budget),
            _ => Err(ConfigError::Budget { field, value }),
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Field {
        Field::Text(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeapCount {
    #[default]
    OneHeap,
    TwoHeaps,
}

/// Unvalidated problem configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemForm {
    pub heaps: HeapCount,
    pub moves: Vec<String>,
    pub win_condition: String,
    pub win_value: Field,
    pub range_start: Field,
    pub range_end: Field,
    pub win_steps: Field,
    pub lose_steps: Field,
    pub heap2_value: Option<Field>,
}

impl Default for ProblemForm {
    fn default() -> ProblemForm {
        ProblemForm {
            heaps: HeapCount::OneHeap,
            moves: vec!["+1".into(), "+4".into(), "*3".into()],
            win_condition: ">=".into(),
            win_value: Field::Int(202),
            range_start: Field::Int(1),
            range_end: Field::Int(201),
            win_steps: Field::Int(2),
            lose_steps: Field::Int(1),
            heap2_value: Some(Field::Int(2)),
        }
    }
}

impl ProblemForm {
    /// Returns one of the built-in example problems listed in `PRESETS`.
    pub fn preset(name: &str) -> Result<ProblemForm, ConfigError> {
        match name {
            "one-heap" => Ok(ProblemForm::default()),
            "two-heaps" => Ok(ProblemForm {
                heaps: HeapCount::TwoHeaps,
                moves: vec!["+2".into(), "*2".into()],
                win_value: Field::Int(142),
                ..ProblemForm::default()
            }),
            other => Err(ConfigError::Preset(other.to_string())),
        }
    }

    /// Checks every field and builds the problem. Nothing is searched here.
    pub fn validate(&self) -> Result<Problem, ConfigError> {
        let comparison = self.win_condition.parse()?;
        let threshold = self.win_value.parse("win value")?;
        let start = self.range_start.parse("range start")?;
        let end = self.range_end.parse("range end")?;
        let win_steps = self.win_steps.parse_budget("win steps")?;
        let lose_steps = self.lose_steps.parse_budget("lose steps")?;
        if start > end {
            return Err(ConfigError::Range { start, end });
        }
        let variant = match self.heaps {
            HeapCount::OneHeap => Variant::OneHeap,
            HeapCount::TwoHeaps => {
                let Some(heap2) = &self.heap2_value else {
                    return Err(ConfigError::MissingHeap2);
                };
                Variant::TwoHeaps {
                    heap2: heap2.parse("heap 2 value")?,
                }
            }
        };
        if self.moves.iter().all(|m| m.trim().is_empty()) {
            return Err(ConfigError::NoMoves);
        }
        let specs: Vec<&str> = self
            .moves
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .collect();
        Ok(Problem {
            moves: Move::parse_all(specs.as_slice())?,
            condition: WinCondition::new(comparison, threshold),
            start,
            end,
            win_steps,
            lose_steps,
            variant,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    OneHeap,
    /// The second heap stays at `heap2` for the whole sweep.
    TwoHeaps { heap2: i64 },
}

/// A validated problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub moves: Vec<Move>,
    pub condition: WinCondition,
    pub start: i64,
    pub end: i64,
    pub win_steps: u32,
    pub lose_steps: u32,
    pub variant: Variant,
}

impl Problem {
    pub fn solve(&self) -> Solution {
        match self.variant {
            Variant::OneHeap => {
                let evaluator = Evaluator::new(self.moves.clone(), self.condition);
                RangeSolver::new(evaluator).sweep(
                    self.start,
                    self.end,
                    self.win_steps,
                    self.lose_steps,
                    |heap| OneHeap { heap },
                )
            }
            Variant::TwoHeaps { heap2 } => {
                let evaluator = Evaluator::new(self.moves.clone(), self.condition);
                RangeSolver::new(evaluator).sweep(
                    self.start,
                    self.end,
                    self.win_steps,
                    self.lose_steps,
                    |first| TwoHeaps {
                        first,
                        second: heap2,
                    },
                )
            }
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves: Vec<String> = self.moves.iter().map(|m| m.to_string()).collect();
        match self.variant {
            Variant::OneHeap => write!(f, "one heap")?,
            Variant::TwoHeaps { heap2 } => write!(f, "two heaps (heap 2 = {})", heap2)?,
        }
        write!(
            f,
            ", moves [{}], win when {}, start in {}..={}, win in {} plies, not in {}",
            moves.join(", "),
            self.condition,
            self.start,
            self.end,
            self.win_steps,
            self.lose_steps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Comparison, ExprError};

    #[test]
    fn test_default_form_validates() {
        let problem = ProblemForm::default().validate().unwrap();
        assert_eq!(
            problem.moves,
            vec![Move::Add(1), Move::Add(4), Move::Multiply(3)]
        );
        assert_eq!(
            problem.condition,
            WinCondition::new(Comparison::AtLeast, 202)
        );
        assert_eq!((problem.start, problem.end), (1, 201));
        assert_eq!((problem.win_steps, problem.lose_steps), (2, 1));
        assert_eq!(problem.variant, Variant::OneHeap);
    }

    #[test]
    fn test_text_fields() {
        let form = ProblemForm {
            win_value: " 30 ".into(),
            range_start: "-5".into(),
            ..ProblemForm::default()
        };
        let problem = form.validate().unwrap();
        assert_eq!(problem.condition.threshold, 30);
        assert_eq!(problem.start, -5);
    }

    #[test]
    fn test_rejections() {
        let bad = |form: ProblemForm| form.validate().unwrap_err();
        let base = ProblemForm::default;

        assert_eq!(
            bad(ProblemForm {
                win_condition: "=>".into(),
                ..base()
            }),
            ConfigError::Operator("=>".into())
        );
        assert_eq!(
            bad(ProblemForm {
                win_value: "abc".into(),
                ..base()
            }),
            ConfigError::NotInteger {
                field: "win value",
                value: "abc".into(),
            }
        );
        assert_eq!(
            bad(ProblemForm {
                range_start: Field::Int(10),
                range_end: Field::Int(3),
                ..base()
            }),
            ConfigError::Range { start: 10, end: 3 }
        );
        assert_eq!(
            bad(ProblemForm {
                lose_steps: Field::Int(-1),
                ..base()
            }),
            ConfigError::Budget {
                field: "lose steps",
                value: -1,
            }
        );
        assert_eq!(
            bad(ProblemForm {
                win_steps: Field::Int(20000),
                ..base()
            }),
            ConfigError::Budget {
                field: "win steps",
                value: 20000,
            }
        );
        assert_eq!(
            bad(ProblemForm {
                lose_steps: "4294967296".into(),
                ..base()
            }),
            ConfigError::Budget {
                field: "lose steps",
                value: 4294967296,
            }
        );
        assert_eq!(
            bad(ProblemForm {
                moves: vec![" ".into()],
                ..base()
            }),
            ConfigError::NoMoves
        );
        assert_eq!(
            bad(ProblemForm {
                moves: vec!["+1".into(), "y*2".into()],
                ..base()
            }),
            ConfigError::Move {
                spec: "y*2".into(),
                source: ExprError::UnknownVariable("y".into()),
            }
        );
        assert_eq!(
            bad(ProblemForm {
                heaps: HeapCount::TwoHeaps,
                heap2_value: None,
                ..base()
            }),
            ConfigError::MissingHeap2
        );
        assert_eq!(
            bad(ProblemForm {
                heaps: HeapCount::TwoHeaps,
                heap2_value: Some("two".into()),
                ..base()
            }),
            ConfigError::NotInteger {
                field: "heap 2 value",
                value: "two".into(),
            }
        );
    }

    #[test]
    fn test_budget_limit() {
        let at_limit = ProblemForm {
            win_steps: Field::Int(i64::from(MAX_BUDGET)),
            lose_steps: Field::Int(0),
            ..ProblemForm::default()
        };
        assert_eq!(at_limit.validate().unwrap().win_steps, MAX_BUDGET);

        let beyond = ProblemForm {
            win_steps: Field::Int(i64::from(MAX_BUDGET) + 1),
            ..ProblemForm::default()
        };
        assert_eq!(
            beyond.validate(),
            Err(ConfigError::Budget {
                field: "win steps",
                value: 501,
            })
        );
    }

    #[test]
    fn test_presets() {
        let two = ProblemForm::preset("two-heaps")
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(two.variant, Variant::TwoHeaps { heap2: 2 });
        assert_eq!(two.moves, vec![Move::Add(2), Move::Multiply(2)]);
        assert_eq!(two.condition.threshold, 142);
        for name in PRESETS {
            assert!(ProblemForm::preset(name).is_ok());
        }
        assert!(ProblemForm::preset("three-heaps").is_err());
    }

    #[test]
    fn test_json_form() {
        let form: ProblemForm = serde_json::from_str(
            r#"{
                "heaps": "two-heaps",
                "moves": ["+1", "x*2"],
                "win_condition": ">=",
                "win_value": "20",
                "range_start": 1,
                "range_end": 10,
                "win_steps": 2,
                "lose_steps": 1,
                "heap2_value": 5
            }"#,
        )
        .unwrap();
        let problem = form.validate().unwrap();
        assert_eq!(problem.variant, Variant::TwoHeaps { heap2: 5 });
        assert_eq!(problem.condition.threshold, 20);
        assert_eq!(problem.moves.len(), 2);
    }
}
