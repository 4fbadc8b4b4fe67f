//! Tender Sentinel binary - one budget-paced dispatch pass.
//!
//! Intended to be invoked on a schedule (e.g. an hourly cron tick). The
//! scheduler must also guarantee at-most-one concurrent run; overlapping
//! invocations would race on the ledger balance read and overspend against
//! the pacing target.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tender_sentinel::adapters::messaging::RedisDispatchSink;
use tender_sentinel::adapters::postgres::{PostgresBacklogRepository, PostgresLedgerRepository};
use tender_sentinel::application::handlers::dispatch::{
    RunRankedDispatchCommand, RunRankedDispatchHandler,
};
use tender_sentinel::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;
    let mode = config.budget.budget_mode()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let redis_client = redis::Client::open(config.messaging.redis_url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_async_connection().await?;

    let ledger = Arc::new(PostgresLedgerRepository::new(pool.clone()));
    let backlog = Arc::new(PostgresBacklogRepository::new(pool.clone()));
    let sink = Arc::new(RedisDispatchSink::new(
        pool,
        redis_conn,
        config.messaging.dispatch_channel.clone(),
    ));

    let handler = RunRankedDispatchHandler::new(ledger.clone(), ledger, backlog, sink);

    let mut cmd = RunRankedDispatchCommand::new(mode);
    cmd.zero_vote_percent = config.budget.zero_vote_percent;
    cmd.max_dispatches = config.budget.max_dispatches;

    match handler.handle(cmd).await {
        Ok(summary) => {
            info!(
                triggered = summary.triggered_count(),
                skipped_zero_vote = summary.skipped_zero_vote,
                failed = summary.failed,
                total_spent = %summary.total_spent,
                remaining = %summary.remaining_total,
                stop_reason = %summary.stop_reason,
                "Dispatch pass finished"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Dispatch pass aborted");
            Err(e.into())
        }
    }
}
