//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the timestamp value object, and error types
//! that form the vocabulary of the Tender Sentinel domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use ids::{AnalysisId, ProcurementId};
pub use timestamp::Timestamp;
