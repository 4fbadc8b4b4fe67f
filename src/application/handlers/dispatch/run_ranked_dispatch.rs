//! RunRankedDispatchHandler - the budget-constrained admission loop.
//!
//! Walks the priority-ordered backlog once, triggering analyses while the
//! run budget lasts. Two budgets are tracked: the total allowance and a
//! reserved sub-budget for zero-vote items. The loop is single-threaded and
//! strictly in-order; the stop/skip semantics below depend on sequential
//! evaluation. At-most-one concurrent run is the scheduler's contract, not
//! enforced here.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::domain::budget::{paced_run_budget, BudgetMode, RunBudget};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::ranking::{RunSummary, StopReason};
use crate::ports::{BacklogProvider, DispatchSink, LedgerReader, LedgerWriter};

/// Command to run one dispatch pass.
#[derive(Debug, Clone)]
pub struct RunRankedDispatchCommand {
    pub mode: BudgetMode,
    /// Share of the total budget available to zero-vote items, 0..=100.
    pub zero_vote_percent: u8,
    /// Operator safety valve, independent of money.
    pub max_dispatches: Option<u32>,
    /// Reference time for pacing windows.
    pub as_of: Timestamp,
}

impl RunRankedDispatchCommand {
    /// Creates a command anchored at the current moment, with no dispatch
    /// cap and the full budget available to zero-vote items.
    pub fn new(mode: BudgetMode) -> Self {
        Self {
            mode,
            zero_vote_percent: 100,
            max_dispatches: None,
            as_of: Timestamp::now(),
        }
    }
}

/// Handler for the ranked dispatch pass.
pub struct RunRankedDispatchHandler {
    ledger_reader: Arc<dyn LedgerReader>,
    ledger_writer: Arc<dyn LedgerWriter>,
    backlog: Arc<dyn BacklogProvider>,
    sink: Arc<dyn DispatchSink>,
}

impl RunRankedDispatchHandler {
    pub fn new(
        ledger_reader: Arc<dyn LedgerReader>,
        ledger_writer: Arc<dyn LedgerWriter>,
        backlog: Arc<dyn BacklogProvider>,
        sink: Arc<dyn DispatchSink>,
    ) -> Self {
        Self {
            ledger_reader,
            ledger_writer,
            backlog,
            sink,
        }
    }

    pub async fn handle(
        &self,
        cmd: RunRankedDispatchCommand,
    ) -> Result<RunSummary, DomainError> {
        // 1. Resolve the total allowance. Manual mode touches no ledger.
        let total = match cmd.mode {
            BudgetMode::Manual(amount) => amount,
            BudgetMode::Auto(period) => {
                let balance = self.ledger_reader.current_balance().await?;
                let period_spent = self
                    .ledger_reader
                    .period_expenditure(period, cmd.as_of)
                    .await?;
                let paced = paced_run_budget(balance, period_spent, period, cmd.as_of);
                debug!(
                    %balance,
                    %period_spent,
                    %period,
                    budget = %paced,
                    "Paced budget computed"
                );
                paced
            }
        };

        let mut budget = RunBudget::new(total, cmd.zero_vote_percent);
        info!(
            total = %budget.total(),
            zero_vote = %budget.remaining_zero_vote(),
            max_dispatches = ?cmd.max_dispatches,
            "Starting ranked dispatch run"
        );

        // 2. One backlog read; unavailability aborts before any dispatch.
        let pending = self.backlog.pending_ranked().await?;
        info!(pending = pending.len(), "Backlog loaded");

        let mut triggered = Vec::new();
        let mut skipped_zero_vote = 0u32;
        let mut failed = 0u32;
        let mut stop_reason = StopReason::BacklogExhausted;

        // 3. Prefix admission over the priority order.
        for item in &pending {
            if let Some(max) = cmd.max_dispatches {
                if triggered.len() as u32 == max {
                    info!(max, "Dispatch cap reached, stopping run");
                    stop_reason = StopReason::MaxDispatchesReached;
                    break;
                }
            }

            let cost = item.estimated_cost;

            // An unaffordable item ends the run: a later, cheaper item must
            // not jump ahead of a more important one merely because it fits.
            if !budget.covers(cost) {
                info!(
                    analysis_id = %item.id,
                    %cost,
                    remaining = %budget.remaining_total(),
                    "Next item exceeds remaining budget, stopping run"
                );
                stop_reason = StopReason::BudgetExhausted;
                break;
            }

            // Zero-vote exhaustion only skips: it must not block later
            // items still coverable by their own budget.
            if item.is_zero_vote() && !budget.covers_zero_vote(cost) {
                info!(
                    analysis_id = %item.id,
                    %cost,
                    remaining_zero_vote = %budget.remaining_zero_vote(),
                    "Zero-vote sub-budget cannot cover item, skipping"
                );
                skipped_zero_vote += 1;
                continue;
            }

            match self.sink.trigger(item.id).await {
                Ok(()) => {
                    budget.charge(cost, item.is_zero_vote());
                    if cost > Decimal::ZERO {
                        self.ledger_writer
                            .record_expense(item.id, cost, cmd.as_of)
                            .await?;
                    }
                    triggered.push(item.id);
                    info!(
                        analysis_id = %item.id,
                        %cost,
                        remaining = %budget.remaining_total(),
                        remaining_zero_vote = %budget.remaining_zero_vote(),
                        "Analysis triggered"
                    );
                }
                Err(e) => {
                    // Nothing was committed, so no budget is deducted and
                    // the cap is not consumed. The item stays pending.
                    failed += 1;
                    error!(analysis_id = %item.id, error = %e, "Failed to trigger analysis");
                }
            }
        }

        let summary = RunSummary {
            total_spent: budget.spent(),
            remaining_total: budget.remaining_total(),
            remaining_zero_vote: budget.remaining_zero_vote(),
            triggered,
            skipped_zero_vote,
            failed,
            stop_reason,
        };
        info!(
            triggered = summary.triggered_count(),
            skipped_zero_vote = summary.skipped_zero_vote,
            failed = summary.failed,
            total_spent = %summary.total_spent,
            remaining = %summary.remaining_total,
            stop_reason = %summary.stop_reason,
            "Ranked dispatch run completed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::budget::BudgetPeriod;
    use crate::domain::foundation::{AnalysisId, ErrorCode, ProcurementId};
    use crate::domain::ranking::PendingAnalysis;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct MockLedgerReader {
        balance: Decimal,
        period_spent: Decimal,
        unavailable: bool,
    }

    impl MockLedgerReader {
        fn with(balance: Decimal, period_spent: Decimal) -> Self {
            Self {
                balance,
                period_spent,
                unavailable: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                balance: Decimal::ZERO,
                period_spent: Decimal::ZERO,
                unavailable: true,
            }
        }
    }

    #[async_trait]
    impl LedgerReader for MockLedgerReader {
        async fn current_balance(&self) -> Result<Decimal, DomainError> {
            if self.unavailable {
                return Err(DomainError::new(
                    ErrorCode::LedgerUnavailable,
                    "Ledger store unreachable",
                ));
            }
            Ok(self.balance)
        }

        async fn period_expenditure(
            &self,
            _period: BudgetPeriod,
            _as_of: Timestamp,
        ) -> Result<Decimal, DomainError> {
            if self.unavailable {
                return Err(DomainError::new(
                    ErrorCode::LedgerUnavailable,
                    "Ledger store unreachable",
                ));
            }
            Ok(self.period_spent)
        }
    }

    #[derive(Default)]
    struct RecordingLedgerWriter {
        entries: Mutex<Vec<(AnalysisId, Decimal)>>,
    }

    impl RecordingLedgerWriter {
        fn entries(&self) -> Vec<(AnalysisId, Decimal)> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LedgerWriter for RecordingLedgerWriter {
        async fn record_expense(
            &self,
            analysis_id: AnalysisId,
            amount: Decimal,
            _at: Timestamp,
        ) -> Result<(), DomainError> {
            self.entries.lock().unwrap().push((analysis_id, amount));
            Ok(())
        }
    }

    struct MockBacklog {
        items: Vec<PendingAnalysis>,
        unavailable: bool,
    }

    impl MockBacklog {
        fn with(items: Vec<PendingAnalysis>) -> Self {
            Self {
                items,
                unavailable: false,
            }
        }

        fn unavailable() -> Self {
            Self {
                items: vec![],
                unavailable: true,
            }
        }
    }

    #[async_trait]
    impl BacklogProvider for MockBacklog {
        async fn pending_ranked(&self) -> Result<Vec<PendingAnalysis>, DomainError> {
            if self.unavailable {
                return Err(DomainError::new(
                    ErrorCode::BacklogUnavailable,
                    "Backlog store unreachable",
                ));
            }
            Ok(self.items.clone())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        triggered: Mutex<Vec<AnalysisId>>,
        attempted: Mutex<Vec<AnalysisId>>,
        failing: HashSet<AnalysisId>,
    }

    impl RecordingSink {
        fn failing_for(ids: impl IntoIterator<Item = AnalysisId>) -> Self {
            Self {
                failing: ids.into_iter().collect(),
                ..Default::default()
            }
        }

        fn triggered(&self) -> Vec<AnalysisId> {
            self.triggered.lock().unwrap().clone()
        }

        fn attempted(&self) -> Vec<AnalysisId> {
            self.attempted.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DispatchSink for RecordingSink {
        async fn trigger(&self, id: AnalysisId) -> Result<(), DomainError> {
            self.attempted.lock().unwrap().push(id);
            if self.failing.contains(&id) {
                return Err(DomainError::new(
                    ErrorCode::DispatchFailed,
                    "Simulated trigger failure",
                ));
            }
            self.triggered.lock().unwrap().push(id);
            Ok(())
        }
    }

    fn item(cost: Decimal, votes: u32) -> PendingAnalysis {
        PendingAnalysis {
            id: AnalysisId::new(),
            procurement_id: ProcurementId::new(),
            votes,
            estimated_cost: cost,
            published_at: Timestamp::from_ymd_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    fn handler(
        reader: MockLedgerReader,
        backlog: MockBacklog,
        sink: RecordingSink,
    ) -> (
        RunRankedDispatchHandler,
        Arc<RecordingLedgerWriter>,
        Arc<RecordingSink>,
    ) {
        let writer = Arc::new(RecordingLedgerWriter::default());
        let sink = Arc::new(sink);
        let h = RunRankedDispatchHandler::new(
            Arc::new(reader),
            writer.clone(),
            Arc::new(backlog),
            sink.clone(),
        );
        (h, writer, sink)
    }

    fn manual(amount: Decimal) -> RunRankedDispatchCommand {
        RunRankedDispatchCommand::new(BudgetMode::Manual(amount))
    }

    #[tokio::test]
    async fn unaffordable_item_stops_the_run_without_evaluating_later_items() {
        // Budget 10: A (4.00) triggers, B (7.00) exceeds the remaining 6.00
        // and stops the run; C is never evaluated despite fitting.
        let a = item(dec!(4.00), 5);
        let b = item(dec!(7.00), 3);
        let c = item(dec!(1.00), 0);
        let (h, writer, sink) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(vec![a.clone(), b.clone(), c.clone()]),
            RecordingSink::default(),
        );

        let summary = h.handle(manual(dec!(10.00))).await.unwrap();

        assert_eq!(summary.triggered, vec![a.id]);
        assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(summary.total_spent, dec!(4.00));
        assert_eq!(summary.remaining_total, dec!(6.00));
        assert_eq!(sink.attempted(), vec![a.id]);
        assert_eq!(writer.entries(), vec![(a.id, dec!(4.00))]);
    }

    #[tokio::test]
    async fn zero_vote_sub_budget_skips_but_does_not_stop() {
        // Budget 10, zero-vote 20% = 2.00. A (3.00, zero-vote) is skipped;
        // B (1.00, zero-vote) still triggers.
        let a = item(dec!(3.00), 0);
        let b = item(dec!(1.00), 0);
        let (h, _, sink) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(vec![a.clone(), b.clone()]),
            RecordingSink::default(),
        );

        let mut cmd = manual(dec!(10.00));
        cmd.zero_vote_percent = 20;
        let summary = h.handle(cmd).await.unwrap();

        assert_eq!(summary.triggered, vec![b.id]);
        assert_eq!(summary.skipped_zero_vote, 1);
        assert_eq!(summary.remaining_total, dec!(9.00));
        assert_eq!(summary.remaining_zero_vote, dec!(1.00));
        assert_eq!(summary.stop_reason, StopReason::BacklogExhausted);
        assert_eq!(sink.attempted(), vec![b.id]);
    }

    #[tokio::test]
    async fn dispatch_cap_fires_before_budget_or_backlog_exhaustion() {
        let items: Vec<_> = (0..3).map(|_| item(dec!(1.00), 1)).collect();
        let first = items[0].id;
        let (h, _, sink) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(items),
            RecordingSink::default(),
        );

        let mut cmd = manual(dec!(100.00));
        cmd.max_dispatches = Some(1);
        let summary = h.handle(cmd).await.unwrap();

        assert_eq!(summary.triggered, vec![first]);
        assert_eq!(summary.stop_reason, StopReason::MaxDispatchesReached);
        assert_eq!(sink.triggered().len(), 1);
    }

    #[tokio::test]
    async fn trigger_failure_is_skipped_without_spending_or_consuming_the_cap() {
        let a = item(dec!(2.00), 3);
        let b = item(dec!(2.00), 2);
        let c = item(dec!(2.00), 1);
        let (h, writer, sink) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(vec![a.clone(), b.clone(), c.clone()]),
            RecordingSink::failing_for([b.id]),
        );

        let mut cmd = manual(dec!(100.00));
        cmd.max_dispatches = Some(2);
        let summary = h.handle(cmd).await.unwrap();

        // B failed: A and C triggered, B's cost never deducted, and the
        // failure did not count toward the cap of 2.
        assert_eq!(summary.triggered, vec![a.id, c.id]);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_spent, dec!(4.00));
        assert_eq!(sink.attempted(), vec![a.id, b.id, c.id]);
        assert_eq!(writer.entries().len(), 2);
    }

    #[tokio::test]
    async fn one_ledger_entry_per_trigger_at_the_estimated_cost() {
        let a = item(dec!(1.25), 2);
        let b = item(dec!(0.75), 1);
        let (h, writer, _) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(vec![a.clone(), b.clone()]),
            RecordingSink::default(),
        );

        let summary = h.handle(manual(dec!(10.00))).await.unwrap();

        assert_eq!(summary.triggered.len(), 2);
        assert_eq!(
            writer.entries(),
            vec![(a.id, dec!(1.25)), (b.id, dec!(0.75))]
        );
    }

    #[tokio::test]
    async fn auto_mode_paces_spending_from_ledger_state() {
        // Day 20 of a 30-day month: capital 450, target 300, spent 150.
        let a = item(dec!(100.00), 4);
        let b = item(dec!(60.00), 2);
        let (h, _, _) = handler(
            MockLedgerReader::with(dec!(300.00), dec!(150.00)),
            MockBacklog::with(vec![a.clone(), b.clone()]),
            RecordingSink::default(),
        );

        let mut cmd = RunRankedDispatchCommand::new(BudgetMode::Auto(BudgetPeriod::Monthly));
        cmd.as_of = Timestamp::from_ymd_hms(2025, 6, 20, 8, 0, 0).unwrap();
        let summary = h.handle(cmd).await.unwrap();

        // Run budget 150: A (100) triggers, B (60) exceeds the remaining 50.
        assert_eq!(summary.triggered, vec![a.id]);
        assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(summary.remaining_total, dec!(50.00));
    }

    #[tokio::test]
    async fn ahead_of_pace_spending_dispatches_nothing() {
        let a = item(dec!(1.00), 5);
        let (h, writer, sink) = handler(
            MockLedgerReader::with(dec!(100.00), dec!(90.00)),
            MockBacklog::with(vec![a]),
            RecordingSink::default(),
        );

        let mut cmd = RunRankedDispatchCommand::new(BudgetMode::Auto(BudgetPeriod::Monthly));
        cmd.as_of = Timestamp::from_ymd_hms(2025, 6, 2, 8, 0, 0).unwrap();
        let summary = h.handle(cmd).await.unwrap();

        assert!(summary.triggered.is_empty());
        assert_eq!(summary.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert!(sink.attempted().is_empty());
        assert!(writer.entries().is_empty());
    }

    #[tokio::test]
    async fn ledger_unavailability_aborts_before_any_dispatch() {
        let a = item(dec!(1.00), 5);
        let (h, writer, sink) = handler(
            MockLedgerReader::unavailable(),
            MockBacklog::with(vec![a]),
            RecordingSink::default(),
        );

        let cmd = RunRankedDispatchCommand::new(BudgetMode::Auto(BudgetPeriod::Daily));
        let err = h.handle(cmd).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::LedgerUnavailable);
        assert!(err.is_fatal_for_run());
        assert!(sink.attempted().is_empty());
        assert!(writer.entries().is_empty());
    }

    #[tokio::test]
    async fn backlog_unavailability_aborts_before_any_dispatch() {
        let (h, writer, sink) = handler(
            MockLedgerReader::with(dec!(100.00), dec!(0)),
            MockBacklog::unavailable(),
            RecordingSink::default(),
        );

        let err = h.handle(manual(dec!(10.00))).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::BacklogUnavailable);
        assert!(sink.attempted().is_empty());
        assert!(writer.entries().is_empty());
    }

    #[tokio::test]
    async fn manual_mode_never_reads_the_ledger() {
        // An unavailable ledger reader must not matter in manual mode.
        let a = item(dec!(1.00), 1);
        let (h, _, _) = handler(
            MockLedgerReader::unavailable(),
            MockBacklog::with(vec![a.clone()]),
            RecordingSink::default(),
        );

        let summary = h.handle(manual(dec!(5.00))).await.unwrap();
        assert_eq!(summary.triggered, vec![a.id]);
    }

    #[tokio::test]
    async fn empty_backlog_completes_with_everything_remaining() {
        let (h, _, _) = handler(
            MockLedgerReader::with(dec!(0), dec!(0)),
            MockBacklog::with(vec![]),
            RecordingSink::default(),
        );

        let summary = h.handle(manual(dec!(10.00))).await.unwrap();
        assert!(summary.triggered.is_empty());
        assert_eq!(summary.stop_reason, StopReason::BacklogExhausted);
        assert_eq!(summary.remaining_total, dec!(10.00));
    }
}
