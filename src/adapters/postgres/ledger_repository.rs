//! PostgreSQL implementation of the ledger ports.
//!
//! The ledger is two append-only tables: `donations` (credits) and
//! `budget_ledger` (expenses, one row per triggered analysis). Balance and
//! period expenditure are computed with aggregate queries; nothing is ever
//! updated in place.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::map_sqlx_error;
use crate::domain::budget::BudgetPeriod;
use crate::domain::foundation::{AnalysisId, DomainError, ErrorCode, Timestamp};
use crate::ports::{LedgerReader, LedgerWriter};

/// PostgreSQL implementation of `LedgerReader` and `LedgerWriter`.
pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerReader for PostgresLedgerRepository {
    async fn current_balance(&self) -> Result<Decimal, DomainError> {
        let balance: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE((SELECT SUM(amount) FROM donations), 0)
                 - COALESCE((SELECT SUM(amount) FROM budget_ledger
                             WHERE transaction_type = 'expense'), 0)
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, ErrorCode::LedgerUnavailable))?;

        Ok(balance)
    }

    async fn period_expenditure(
        &self,
        period: BudgetPeriod,
        as_of: Timestamp,
    ) -> Result<Decimal, DomainError> {
        let window_start = period.window_start(as_of);
        let spent: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM budget_ledger
            WHERE transaction_type = 'expense' AND created_at >= $1
            "#,
        )
        .bind(window_start.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, ErrorCode::LedgerUnavailable))?;

        Ok(spent)
    }
}

#[async_trait]
impl LedgerWriter for PostgresLedgerRepository {
    async fn record_expense(
        &self,
        analysis_id: AnalysisId,
        amount: Decimal,
        at: Timestamp,
    ) -> Result<(), DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                "Expense amount must be positive",
            )
            .with_detail("amount", amount.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO budget_ledger (transaction_type, related_analysis_id, amount, description, created_at)
            VALUES ('expense', $1, $2, $3, $4)
            "#,
        )
        .bind(analysis_id.as_uuid())
        .bind(amount)
        .bind(format!("Dispatch of analysis {}", analysis_id))
        .bind(at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, ErrorCode::LedgerUnavailable))?;

        Ok(())
    }
}
