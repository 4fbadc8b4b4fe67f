//! PostgreSQL implementation of the backlog port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::map_sqlx_error;
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode, ProcurementId, Timestamp};
use crate::domain::ranking::PendingAnalysis;
use crate::ports::BacklogProvider;

/// PostgreSQL implementation of the `BacklogProvider` port.
///
/// The ordering clause is the contract the dispatch loop relies on:
/// votes descending, publication recency descending.
pub struct PostgresBacklogRepository {
    pool: PgPool,
}

impl PostgresBacklogRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a pending analysis.
#[derive(Debug, sqlx::FromRow)]
struct PendingAnalysisRow {
    id: Uuid,
    procurement_id: Uuid,
    votes_count: i32,
    estimated_cost: Decimal,
    published_at: DateTime<Utc>,
}

impl TryFrom<PendingAnalysisRow> for PendingAnalysis {
    type Error = DomainError;

    fn try_from(row: PendingAnalysisRow) -> Result<Self, Self::Error> {
        let votes = u32::try_from(row.votes_count).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Negative votes_count for analysis {}", row.id),
            )
        })?;
        if row.estimated_cost < Decimal::ZERO {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Negative estimated_cost for analysis {}", row.id),
            ));
        }
        Ok(PendingAnalysis {
            id: AnalysisId::from_uuid(row.id),
            procurement_id: ProcurementId::from_uuid(row.procurement_id),
            votes,
            estimated_cost: row.estimated_cost,
            published_at: Timestamp::from_datetime(row.published_at),
        })
    }
}

#[async_trait]
impl BacklogProvider for PostgresBacklogRepository {
    async fn pending_ranked(&self) -> Result<Vec<PendingAnalysis>, DomainError> {
        let rows: Vec<PendingAnalysisRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.procurement_id, p.votes_count, a.estimated_cost, a.published_at
            FROM procurement_analyses a
            JOIN procurements p ON p.id = a.procurement_id
            WHERE a.status = 'pending'
            ORDER BY p.votes_count DESC, a.published_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, ErrorCode::BacklogUnavailable))?;

        rows.into_iter().map(PendingAnalysis::try_from).collect()
    }
}
