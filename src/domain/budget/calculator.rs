//! Pacing calculator for automatic budget mode.

use rust_decimal::Decimal;

use super::BudgetPeriod;
use crate::domain::foundation::Timestamp;

/// How the total allowance for a run is determined.
///
/// Manual and automatic modes are mutually exclusive by construction; both
/// feed the same `RunBudget` downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetMode {
    /// Operator-supplied fixed allowance; no ledger reads.
    Manual(Decimal),
    /// Allowance derived from ledger state, paced over the given period.
    Auto(BudgetPeriod),
}

/// Computes the allowance for one run from ledger state.
///
/// The intent is that a scheduler invoking this hourly converges on spending
/// the available capital evenly across the period instead of exhausting it
/// on the first run:
///
/// - `period_capital = balance + period_spent`. Spent capital is added back
///   so that donations arriving mid-period inflate the pacing target
///   immediately; it is subtracted back out at the end.
/// - `daily_target = period_capital / length_days`
/// - `cumulative_target = daily_target * elapsed_days`
/// - result = `max(cumulative_target - period_spent, 0)`
///
/// Pure function of its arguments: identical inputs yield identical output.
/// Floors at zero both when spending is ahead of pace and when the balance
/// is zero or negative.
pub fn paced_run_budget(
    balance: Decimal,
    period_spent: Decimal,
    period: BudgetPeriod,
    as_of: Timestamp,
) -> Decimal {
    let period_capital = balance + period_spent;
    let daily_target = period_capital / Decimal::from(period.length_days(as_of));
    let cumulative_target = daily_target * Decimal::from(period.elapsed_days(as_of));
    (cumulative_target - period_spent).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn at(year: i32, month: u32, day: u32) -> Timestamp {
        Timestamp::from_ymd_hms(year, month, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn daily_period_with_no_spend_releases_the_full_balance() {
        let budget = paced_run_budget(
            dec!(100.00),
            dec!(0.00),
            BudgetPeriod::Daily,
            at(2025, 6, 18),
        );
        assert_eq!(budget, dec!(100.00));
    }

    #[test]
    fn monthly_pacing_on_day_twenty_of_a_thirty_day_month() {
        // capital 450, daily target 15, cumulative target 300, spent 150.
        let budget = paced_run_budget(
            dec!(300.00),
            dec!(150.00),
            BudgetPeriod::Monthly,
            at(2025, 6, 20),
        );
        assert_eq!(budget, dec!(150.00));
    }

    #[test]
    fn spending_ahead_of_pace_floors_at_zero() {
        // Day 2 of June: cumulative target = (100 + 90) / 30 * 2 < 90 spent.
        let budget = paced_run_budget(
            dec!(100.00),
            dec!(90.00),
            BudgetPeriod::Monthly,
            at(2025, 6, 2),
        );
        assert_eq!(budget, Decimal::ZERO);
    }

    #[test]
    fn negative_balance_floors_at_zero() {
        let budget = paced_run_budget(
            dec!(-25.00),
            dec!(0.00),
            BudgetPeriod::Weekly,
            at(2025, 6, 18),
        );
        assert_eq!(budget, Decimal::ZERO);
    }

    #[test]
    fn zero_balance_and_zero_spend_yields_zero() {
        let budget = paced_run_budget(
            Decimal::ZERO,
            Decimal::ZERO,
            BudgetPeriod::Daily,
            at(2025, 6, 18),
        );
        assert_eq!(budget, Decimal::ZERO);
    }

    #[test]
    fn weekly_pacing_releases_one_seventh_per_elapsed_day() {
        // Monday, balance 70, nothing spent: one day of a seven-day window.
        let budget = paced_run_budget(
            dec!(70.00),
            dec!(0.00),
            BudgetPeriod::Weekly,
            at(2025, 6, 16),
        );
        assert_eq!(budget, dec!(10.00));
    }

    #[test]
    fn mid_period_donations_inflate_the_target_immediately() {
        // Day 10 of June, 30 spent. A fresh donation raises the balance to
        // 270: capital 300, daily target 10, cumulative target 100.
        let budget = paced_run_budget(
            dec!(270.00),
            dec!(30.00),
            BudgetPeriod::Monthly,
            at(2025, 6, 10),
        );
        assert_eq!(budget, dec!(70.00));
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let as_of = at(2025, 6, 20);
        let a = paced_run_budget(dec!(300.00), dec!(150.00), BudgetPeriod::Monthly, as_of);
        let b = paced_run_budget(dec!(300.00), dec!(150.00), BudgetPeriod::Monthly, as_of);
        assert_eq!(a, b);
    }
}
