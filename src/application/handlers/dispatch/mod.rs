//! Dispatch handlers - one pass of budget-constrained admission control.

mod run_ranked_dispatch;

pub use run_ranked_dispatch::{RunRankedDispatchCommand, RunRankedDispatchHandler};
