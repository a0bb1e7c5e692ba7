use std::fmt;

use log::{debug, info, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sorted_vec::SortedVec;

use crate::{Evaluator, Position};

/// Sweeps a range of starting values for the first heap and keeps the ones
/// that can be forced within `win_steps` plies but not within `lose_steps`.
///
/// All candidates share the evaluator's cache, for both budgets.
#[derive(Debug, Clone)]
pub struct RangeSolver<P>
where
    P: Position,
{
    evaluator: Evaluator<P>,
}

impl<P> RangeSolver<P>
where
    P: Position,
{
    pub fn new(evaluator: Evaluator<P>) -> RangeSolver<P> {
        RangeSolver { evaluator }
    }

    pub fn get_evaluator(&self) -> &Evaluator<P> {
        &self.evaluator
    }

    /// The dual condition for a single starting position.
    pub fn qualifies(&self, position: &P, win_steps: u32, lose_steps: u32) -> bool {
        !self.evaluator.can_force(position, lose_steps)
            && self.evaluator.can_force(position, win_steps)
    }

    /// Evaluates every `v` in `start..=end`, using `place` to build the
    /// starting position for `v`. Candidates are checked in parallel.
    pub fn sweep<F>(
        &self,
        start: i64,
        end: i64,
        win_steps: u32,
        lose_steps: u32,
        place: F,
    ) -> Solution
    where
        F: Fn(i64) -> P + Sync,
    {
        debug!(
            "sweeping {}..={} with {} moves, condition {}, win in {} / not in {}",
            start,
            end,
            self.evaluator.get_moves().len(),
            self.evaluator.get_condition(),
            win_steps,
            lose_steps
        );
        let values: Vec<i64> = (start..=end)
            .into_par_iter()
            .filter(|&v| {
                let qualifies = self.qualifies(&place(v), win_steps, lose_steps);
                if qualifies {
                    trace!("{} qualifies", v);
                }
                qualifies
            })
            .collect();
        let solution = Solution::new(values);
        info!(
            "found {} of {} candidates, {} states cached",
            solution.count(),
            candidates(start, end),
            self.evaluator.get_cache_size()
        );
        solution
    }
}

/// Number of values in `start..=end`, saturating for the full `i64` range.
fn candidates(start: i64, end: i64) -> u64 {
    end.abs_diff(start).saturating_add(1)
}

/// The ordered set of qualifying starting values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    values: SortedVec<i64>,
}

impl Solution {
    pub fn new(values: Vec<i64>) -> Solution {
        Solution {
            values: SortedVec::from_unsorted(values),
        }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn min(&self) -> Option<i64> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<i64> {
        self.values.last().copied()
    }

    pub fn report(&self) -> Report {
        Report {
            values: self.values.to_vec(),
            count: self.count(),
            min: self.min(),
            max: self.max(),
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(min), Some(max)) = (self.min(), self.max()) else {
            return writeln!(f, "no solutions found");
        };
        writeln!(f, "found: {}", self.count())?;
        writeln!(f, "values: {:?}", self.values())?;
        writeln!(f, "min: {}", min)?;
        writeln!(f, "max: {}", max)
    }
}

/// Serializable summary of a `Solution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub values: Vec<i64>,
    pub count: usize,
    pub min: Option<i64>,
    pub max: Option<i64>,
}
