//! Budget configuration

use rust_decimal::Decimal;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::budget::{BudgetMode, BudgetPeriod};

/// Budget configuration
///
/// Selects between a manual fixed allowance and the automatic paced
/// allowance derived from the ledger. The two modes are mutually exclusive;
/// `budget_mode()` enforces that before any ledger read happens.
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    /// "manual" or "auto"
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Fixed allowance for manual mode
    pub manual_amount: Option<Decimal>,

    /// Pacing period for auto mode: "daily", "weekly" or "monthly"
    pub period: Option<String>,

    /// Share of the budget available to zero-vote analyses (0-100)
    #[serde(default = "default_zero_vote_percent")]
    pub zero_vote_percent: u8,

    /// Optional hard cap on dispatches per run
    pub max_dispatches: Option<u32>,
}

impl BudgetConfig {
    /// Validate budget configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.budget_mode()?;
        if self.zero_vote_percent > 100 {
            return Err(ValidationError::InvalidZeroVotePercent);
        }
        if self.max_dispatches == Some(0) {
            return Err(ValidationError::InvalidMaxDispatches);
        }
        Ok(())
    }

    /// Resolve the configured mode into a `BudgetMode`.
    pub fn budget_mode(&self) -> Result<BudgetMode, ValidationError> {
        match self.mode.to_lowercase().as_str() {
            "manual" => match self.manual_amount {
                Some(amount) if amount >= Decimal::ZERO => Ok(BudgetMode::Manual(amount)),
                _ => Err(ValidationError::MissingManualAmount),
            },
            "auto" => {
                let raw = self
                    .period
                    .as_deref()
                    .ok_or(ValidationError::MissingBudgetPeriod)?;
                let period: BudgetPeriod = raw
                    .parse()
                    .map_err(|_| ValidationError::InvalidBudgetPeriod(raw.to_string()))?;
                Ok(BudgetMode::Auto(period))
            }
            other => Err(ValidationError::InvalidBudgetMode(other.to_string())),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            manual_amount: None,
            period: Some("daily".to_string()),
            zero_vote_percent: default_zero_vote_percent(),
            max_dispatches: None,
        }
    }
}

fn default_mode() -> String {
    "auto".to_string()
}

fn default_zero_vote_percent() -> u8 {
    100
}
