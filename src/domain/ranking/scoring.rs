//! Priority scoring for discovered procurements.
//!
//! The discovery side scores each procurement before it ever reaches the
//! dispatch backlog: potential impact from its metadata, document quality
//! from the file candidates, and a vote-adjusted composite. The backlog
//! ordering consumed by the dispatcher is derived from these outputs.

use chrono::Duration;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Why a source file was excluded from the analysis input bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    ExtractionFailed,
    ConversionFailed,
    UnsupportedExtension,
    LockFile,
    TokenLimitExceeded,
}

/// A source document considered for the analysis input bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub exclusion_reason: Option<ExclusionReason>,
}

/// Procurement metadata feeding the impact score.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcurementSignals {
    pub total_estimated_value: Option<Decimal>,
    pub object_description: String,
    pub votes: u32,
    pub last_update: Timestamp,
}

/// Computed ranking outputs for one procurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityScore {
    /// Document quality, 0..=100.
    pub quality: i32,
    /// Potential impact from metadata, 0..=100.
    pub impact: i32,
    /// Composite priority used to order the backlog.
    pub priority: i64,
    /// Unchanged for the full quarantine window.
    pub is_stable: bool,
}

/// Scores procurements for backlog prioritization.
///
/// Weights are tunable business knobs, kept as associated constants.
pub struct PriorityScorer;

impl PriorityScorer {
    const W_IMPACT: f64 = 1.5;
    const W_QUALITY: f64 = 1.0;
    const W_COST: f64 = 0.1;
    const W_VOTES: f64 = 0.2;

    /// Quarantine window after the last change before a procurement is
    /// considered stable enough to analyze.
    const STABILITY_PERIOD_HOURS: i64 = 48;

    const HIGH_IMPACT_KEYWORDS: [&'static str; 5] = [
        "saúde",
        "hospitalar",
        "educação",
        "saneamento",
        "infraestrutura",
    ];

    /// Computes all ranking outputs for one procurement.
    pub fn score(
        signals: &ProcurementSignals,
        candidates: &[FileCandidate],
        estimated_cost: Decimal,
        now: Timestamp,
    ) -> PriorityScore {
        let quality = Self::quality_score(candidates);
        let impact = Self::impact_score(signals);

        let adjusted_impact = impact as f64 * (1.0 + Self::W_VOTES * signals.votes as f64);
        let priority = Self::W_IMPACT * adjusted_impact + Self::W_QUALITY * quality as f64
            - Self::W_COST * estimated_cost.to_f64().unwrap_or(0.0);

        PriorityScore {
            quality,
            impact,
            priority: priority as i64,
            is_stable: Self::is_stable(signals, now),
        }
    }

    /// Document quality: starts at 100, penalized per excluded file and for
    /// a low ratio of usable files. Empty candidate lists score zero.
    fn quality_score(candidates: &[FileCandidate]) -> i32 {
        if candidates.is_empty() {
            return 0;
        }

        let mut score = 100;
        for candidate in candidates {
            score -= match candidate.exclusion_reason {
                Some(ExclusionReason::ExtractionFailed) => 20,
                Some(ExclusionReason::ConversionFailed) => 15,
                Some(ExclusionReason::UnsupportedExtension) => 10,
                Some(ExclusionReason::LockFile) => 5,
                Some(ExclusionReason::TokenLimitExceeded) => 5,
                None => 0,
            };
        }

        let total = candidates.len();
        let excluded = candidates
            .iter()
            .filter(|c| c.exclusion_reason.is_some())
            .count();
        let usable_ratio = (total - excluded) as f64 / total as f64;

        if usable_ratio < 0.5 {
            score -= 20;
        } else if usable_ratio < 0.8 {
            score -= 10;
        }

        score.max(0)
    }

    /// Potential impact from the procurement's estimated value and
    /// high-impact keywords in its object description. Capped at 100.
    fn impact_score(signals: &ProcurementSignals) -> i32 {
        let mut score = 0;

        if let Some(value) = signals.total_estimated_value {
            if value > Decimal::from(1_000_000) {
                score += 50;
            } else if value > Decimal::from(100_000) {
                score += 25;
            }
        }

        let description = signals.object_description.to_lowercase();
        for keyword in Self::HIGH_IMPACT_KEYWORDS {
            if description.contains(keyword) {
                score += 20;
            }
        }

        score.min(100)
    }

    fn is_stable(signals: &ProcurementSignals, now: Timestamp) -> bool {
        now.duration_since(&signals.last_update)
            > Duration::hours(Self::STABILITY_PERIOD_HOURS)
    }
}
