//! Redis-backed dispatch sink for production deployments.
//!
//! Triggering an analysis is two steps, in order:
//! 1. flip the analysis status `pending -> in_progress` with a guarded
//!    UPDATE, so the item cannot reappear in the backlog;
//! 2. publish an "analyze this id" message on the dispatch channel for the
//!    worker.
//!
//! The status flip comes first: a message for an already-claimed analysis
//! is harmless (the worker re-checks status), while a claimed row with no
//! message is picked up by the stale-analysis retry sweep.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::Serialize;
use sqlx::PgPool;
use tracing::debug;

use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode};
use crate::ports::DispatchSink;

/// Message payload consumed by the analysis worker.
#[derive(Debug, Serialize)]
struct AnalysisRequest {
    analysis_id: AnalysisId,
}

/// Redis + PostgreSQL implementation of the `DispatchSink` port.
pub struct RedisDispatchSink {
    pool: PgPool,
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisDispatchSink {
    /// Creates a new sink publishing on `channel`.
    pub fn new(pool: PgPool, conn: MultiplexedConnection, channel: impl Into<String>) -> Self {
        Self {
            pool,
            conn,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl DispatchSink for RedisDispatchSink {
    async fn trigger(&self, id: AnalysisId) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE procurement_analyses
            SET status = 'in_progress', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DispatchFailed, format!("Status update failed: {}", e))
                .with_detail("analysis_id", id.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DispatchFailed,
                "Analysis is not in the pending state",
            )
            .with_detail("analysis_id", id.to_string()));
        }

        let payload = serde_json::to_string(&AnalysisRequest { analysis_id: id })
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&self.channel, payload)
            .await
            .map_err(|e: redis::RedisError| {
                DomainError::new(
                    ErrorCode::DispatchFailed,
                    format!("Publish failed after status flip: {}", e),
                )
                .with_detail("analysis_id", id.to_string())
                .with_detail("channel", self.channel.clone())
            })?;

        debug!(analysis_id = %id, channel = %self.channel, "Analysis request published");
        Ok(())
    }
}
