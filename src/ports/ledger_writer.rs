//! LedgerWriter port - appending expense entries.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::foundation::{AnalysisId, DomainError, Timestamp};

/// Port for recording actual expenditures.
///
/// The ledger is append-only: entries are never updated or deleted. The
/// dispatcher writes one entry per successful trigger, at the estimated
/// cost, so the next run's pacing reflects committed spend.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Appends one expense entry. `amount` must be positive.
    async fn record_expense(
        &self,
        analysis_id: AnalysisId,
        amount: Decimal,
        at: Timestamp,
    ) -> Result<(), DomainError>;
}
