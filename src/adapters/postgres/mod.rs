//! PostgreSQL adapters for the ledger and backlog ports.

mod backlog_repository;
mod ledger_repository;

pub use backlog_repository::PostgresBacklogRepository;
pub use ledger_repository::PostgresLedgerRepository;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Maps a sqlx error into a domain error, using `unavailable_code` for
/// connectivity-level failures and `DatabaseError` for everything else.
pub(crate) fn map_sqlx_error(e: sqlx::Error, unavailable_code: ErrorCode) -> DomainError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Tls(_) => DomainError::new(unavailable_code, format!("Store unreachable: {}", e)),
        other => DomainError::new(ErrorCode::DatabaseError, format!("Database error: {}", other)),
    }
}
