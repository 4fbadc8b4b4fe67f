//! DispatchSink port - triggering a single analysis.

use async_trait::async_trait;

use crate::domain::foundation::{AnalysisId, DomainError};

/// Port for triggering one analysis.
///
/// A successful trigger durably transitions the analysis out of the pending
/// state (so it will not reappear in the backlog) and enqueues exactly one
/// "analyze this id" message for the worker. A failed trigger leaves the
/// item pending and eligible for the next run; the dispatch loop treats it
/// as recoverable.
#[async_trait]
pub trait DispatchSink: Send + Sync {
    async fn trigger(&self, id: AnalysisId) -> Result<(), DomainError>;
}
