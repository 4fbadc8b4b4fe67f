//! BacklogProvider port - the ordered queue of pending analyses.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::ranking::PendingAnalysis;

/// Port for reading the dispatch backlog.
///
/// The returned sequence is sorted by votes descending, then publication
/// recency descending. That ordering is this port's contract: the dispatch
/// loop's stop/skip semantics assume a priority-ordered prefix and it must
/// not re-sort. Store unreachability is reported as
/// `ErrorCode::BacklogUnavailable` and aborts the run before any dispatch.
#[async_trait]
pub trait BacklogProvider: Send + Sync {
    /// Pending analyses in priority order.
    async fn pending_ranked(&self) -> Result<Vec<PendingAnalysis>, DomainError>;
}
