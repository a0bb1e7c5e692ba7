use crate::{Move, Position, WinCondition};

/// A game on a single heap.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub struct OneHeap {
    pub heap: i64,
}

impl Position for OneHeap {
    fn satisfies(&self, condition: &WinCondition) -> bool {
        condition.holds(self.heap)
    }

    fn successors(&self, moves: &[Move]) -> Vec<OneHeap> {
        moves
            .iter()
            .filter_map(|m| m.apply(self.heap))
            .map(|heap| OneHeap { heap })
            .collect()
    }
}

/// A game on two heaps; the condition is checked against their sum and
/// every move may be played on either heap.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy)]
pub struct TwoHeaps {
    pub first: i64,
    pub second: i64,
}

impl Position for TwoHeaps {
    fn satisfies(&self, condition: &WinCondition) -> bool {
        condition.holds(i128::from(self.first) + i128::from(self.second))
    }

    fn successors(&self, moves: &[Move]) -> Vec<TwoHeaps> {
        let mut successors = Vec::with_capacity(2 * moves.len());
        for m in moves {
            if let Some(first) = m.apply(self.first) {
                successors.push(TwoHeaps { first, ..*self });
            }
            if let Some(second) = m.apply(self.second) {
                successors.push(TwoHeaps { second, ..*self });
            }
        }
        successors
    }
}
