//! Per-invocation budget counters.

use rust_decimal::Decimal;

/// Spending allowance for a single dispatch run.
///
/// Holds the initial total plus two counters mutated as items are accepted:
/// `remaining_total` for all items and `remaining_zero_vote` for items with
/// no community votes. Invariants, maintained by `charge`:
/// - both counters are non-increasing within a run;
/// - `remaining_zero_vote <= remaining_total` at every step.
///
/// Scoped to one invocation and owned by the dispatch handler; never shared
/// or persisted. Only the ledger entries written during the run survive it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunBudget {
    total: Decimal,
    remaining_total: Decimal,
    remaining_zero_vote: Decimal,
}

impl RunBudget {
    /// Creates a budget from the initial total and the zero-vote percentage.
    ///
    /// The percentage is clamped to [0, 100]; the zero-vote sub-budget is
    /// computed once from the initial total and is not recomputed as the
    /// total is spent down. A negative total is floored at zero.
    pub fn new(total: Decimal, zero_vote_percent: u8) -> Self {
        let total = total.max(Decimal::ZERO);
        let percent = Decimal::from(zero_vote_percent.min(100));
        let zero_vote = total * percent / Decimal::from(100);
        Self {
            total,
            remaining_total: total,
            remaining_zero_vote: zero_vote,
        }
    }

    /// The initial total allowance for this run.
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// What is still spendable on any item.
    pub fn remaining_total(&self) -> Decimal {
        self.remaining_total
    }

    /// What is still spendable on zero-vote items.
    pub fn remaining_zero_vote(&self) -> Decimal {
        self.remaining_zero_vote
    }

    /// Amount spent so far in this run.
    pub fn spent(&self) -> Decimal {
        self.total - self.remaining_total
    }

    /// Whether the total budget covers `cost`.
    pub fn covers(&self, cost: Decimal) -> bool {
        cost <= self.remaining_total
    }

    /// Whether the zero-vote sub-budget covers `cost`.
    pub fn covers_zero_vote(&self, cost: Decimal) -> bool {
        cost <= self.remaining_zero_vote
    }

    /// Deducts `cost` after a successful dispatch.
    ///
    /// Zero-vote items draw down both counters. After any charge the
    /// zero-vote counter is clamped to the total counter so the containment
    /// invariant holds even when a voted item consumes most of the total.
    pub fn charge(&mut self, cost: Decimal, zero_vote_item: bool) {
        debug_assert!(self.covers(cost), "charge exceeds remaining total");
        self.remaining_total -= cost;
        if zero_vote_item {
            self.remaining_zero_vote -= cost;
        }
        self.remaining_zero_vote = self.remaining_zero_vote.min(self.remaining_total);
    }
}
