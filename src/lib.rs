pub mod condition;
pub mod config;
pub mod error;
pub mod expr;
pub mod heaps;
pub mod moves;
pub mod solver;

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;


pub use crate::condition::{Comparison, WinCondition};
pub use crate::config::{Field, HeapCount, Problem, ProblemForm, Variant};
pub use crate::error::{ConfigError, ExprError};
pub use crate::heaps::{OneHeap, TwoHeaps};
pub use crate::moves::Move;
pub use crate::solver::{RangeSolver, Report, Solution};

/// Provides the interface for evaluating a heap game with the `Evaluator`.
///
/// A position is everything about the game except the remaining ply budget.
pub trait Position: Sized + Clone + Hash + Eq + Send + Sync {
    /// Returns whether the win condition already holds at this position.
    fn satisfies(&self, condition: &WinCondition) -> bool;

    /// Returns every position reachable with one move, in move order.
    /// Moves without an integer result are skipped.
    fn successors(&self, moves: &[Move]) -> Vec<Self>;
}

/// A position together with the plies remaining before the horizon closes.
/// This is the memoization key of the `Evaluator`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState<P> {
    pub position: P,
    pub budget: u32,
}

impl<P> GameState<P> {
    pub fn new(position: P, budget: u32) -> GameState<P> {
        GameState { position, budget }
    }
}

/// Evaluates bounded-horizon heap games via memoized backward induction.
///
/// Clones share the cache, so one evaluator can serve a whole range sweep,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct Evaluator<P>
where
    P: Position,
{
    moves: Arc<[Move]>,
    condition: WinCondition,
    cache: Arc<DashMap<GameState<P>, bool>>,
}

impl<P> Evaluator<P>
where
    P: Position,
{
    /// Constructs a new evaluator with an empty cache.
    pub fn new(moves: Vec<Move>, condition: WinCondition) -> Evaluator<P> {
        Evaluator {
            moves: moves.into(),
            condition,
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn get_moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn get_condition(&self) -> &WinCondition {
        &self.condition
    }

    /// Returns the number of entries stored in the evaluator cache.
    pub fn get_cache_size(&self) -> usize {
        self.cache.len()
    }

    /// Returns every state evaluated so far with its outcome.
    pub fn get_outcomes(&self) -> Vec<(GameState<P>, bool)> {
        self.cache
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }

    /// Returns whether the condition can be forced from `position` with
    /// `budget` plies left.
    pub fn can_force(&self, position: &P, budget: u32) -> bool {
        self.get_outcome(&GameState::new(position.clone(), budget))
    }

    /// Looks the state up in the cache, computing and storing it if missing.
    pub fn get_outcome(&self, state: &GameState<P>) -> bool {
        // copy out so the shard lock is released before recursing
        if let Some(known) = self.cache.get(state).map(|e| *e) {
            return known;
        }
        let outcome = self.evaluate(state);
        // another worker may have stored it meanwhile; the first write stays
        let stored = *self.cache.entry(state.clone()).or_insert(outcome);
        debug_assert_eq!(stored, outcome);
        stored
    }

    /// Computes the outcome of a state from its successors, consulting the
    /// cache for them but not for the state itself.
    ///
    /// A condition that already holds counts only when the remaining budget
    /// is even. Otherwise the mover needs a successor that wins when the
    /// budget after the move is even, and every successor must win when it
    /// is odd.
    pub fn evaluate(&self, state: &GameState<P>) -> bool {
        if state.position.satisfies(&self.condition) {
            return state.budget % 2 == 0;
        }
        let Some(next) = state.budget.checked_sub(1) else {
            return false;
        };

        let successors = state.position.successors(&self.moves);
        if successors.is_empty() {
            return false;
        }

        let mut outcomes = successors
            .into_iter()
            .map(|position| self.get_outcome(&GameState::new(position, next)));
        if next % 2 == 0 {
            outcomes.any(|won| won)
        } else {
            outcomes.all(|won| won)
        }
    }
}
