//! Backlog candidate read model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AnalysisId, ProcurementId, Timestamp};

/// A pending analysis awaiting dispatch.
///
/// Produced by the discovery pass (which also computes the cost estimate)
/// and read here in priority order: votes descending, then publication
/// recency descending. That ordering is the backlog provider's contract;
/// the dispatcher never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingAnalysis {
    pub id: AnalysisId,
    pub procurement_id: ProcurementId,
    /// Community prioritization signal. Zero-vote items draw from a
    /// reserved sub-budget so they cannot crowd out voted work.
    pub votes: u32,
    /// Cost estimate computed during the zero-cost discovery pass.
    pub estimated_cost: Decimal,
    pub published_at: Timestamp,
}

impl PendingAnalysis {
    /// True when the item has no community votes.
    pub fn is_zero_vote(&self) -> bool {
        self.votes == 0
    }
}
