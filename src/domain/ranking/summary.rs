//! Run reporting for the dispatch loop.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::AnalysisId;

/// Why the dispatch loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Every backlog item was evaluated.
    BacklogExhausted,
    /// The next item in priority order could not be afforded. Later,
    /// cheaper items are deliberately not considered.
    BudgetExhausted,
    /// The operator-supplied dispatch cap was reached.
    MaxDispatchesReached,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::BacklogExhausted => "backlog exhausted",
            StopReason::BudgetExhausted => "budget exhausted",
            StopReason::MaxDispatchesReached => "max dispatches reached",
        };
        write!(f, "{}", s)
    }
}

/// Durable tally of one dispatch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Analyses successfully triggered, in dispatch order.
    pub triggered: Vec<AnalysisId>,
    /// Items passed over because the zero-vote sub-budget could not cover
    /// them. These do not end the run.
    pub skipped_zero_vote: u32,
    /// Items whose dispatch failed; they stay pending for the next run.
    pub failed: u32,
    pub total_spent: Decimal,
    pub remaining_total: Decimal,
    pub remaining_zero_vote: Decimal,
    pub stop_reason: StopReason,
}

impl RunSummary {
    /// Number of analyses triggered in this run.
    pub fn triggered_count(&self) -> usize {
        self.triggered.len()
    }
}
