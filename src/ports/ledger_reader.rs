//! LedgerReader port - aggregated views over the expense ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::budget::BudgetPeriod;
use crate::domain::foundation::{DomainError, Timestamp};

/// Port for reading aggregated ledger state.
///
/// The ledger is the single source of truth for budget pacing: the
/// calculator is a pure function of the values read here. Implementations
/// must report store unreachability as `ErrorCode::LedgerUnavailable`;
/// callers treat that as fatal for the run, since no budget can be computed
/// safely.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// All-time credits received minus all-time expenses.
    async fn current_balance(&self) -> Result<Decimal, DomainError>;

    /// Sum of expense amounts inside the period window containing `as_of`.
    ///
    /// Returns zero, not an error, when the window holds no entries.
    async fn period_expenditure(
        &self,
        period: BudgetPeriod,
        as_of: Timestamp,
    ) -> Result<Decimal, DomainError>;
}
