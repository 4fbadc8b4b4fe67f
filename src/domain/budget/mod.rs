//! Budget domain - spending allowance for one dispatch run.
//!
//! The calculator turns ledger state into a bounded allowance; `RunBudget`
//! carries that allowance through a single pass over the backlog.

mod calculator;
mod period;
mod run_budget;

pub use calculator::{paced_run_budget, BudgetMode};
pub use period::BudgetPeriod;
pub use run_budget::RunBudget;
