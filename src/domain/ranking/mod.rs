//! Ranking domain - backlog candidates, priority scoring, run reporting.

mod backlog;
mod scoring;
mod summary;

pub use backlog::PendingAnalysis;
pub use scoring::{ExclusionReason, FileCandidate, PriorityScore, PriorityScorer, ProcurementSignals};
pub use summary::{RunSummary, StopReason};
