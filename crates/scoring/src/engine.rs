//! The scoring pipeline: tag → aggregate → score → normalize → decide.
//!
//! A single pure pass over caller-owned data. Nothing here touches the
//! outside world, so concurrent invocations are independent by
//! construction.

use thiserror::Error;

use crate::model::{
    DailyBalance, OverrideMap, ReportContext, ScoreReport, Transaction,
};
use crate::{decision, metrics, points, tagger};

/// Identifies the deterministic rule engine in audit rows.
pub const ENGINE_VERSION: &str = "blink-rules-1.0";

/// Shortest observed history the engine will score.
pub const MIN_HISTORY_DAYS: i64 = 90;

#[derive(Debug, Error)]
pub enum ScoringError {
    /// Too little history to say anything; carries what was observed.
    #[error("insufficient history: {observed_days} observed days")]
    InsufficientHistory { observed_days: i64 },

    /// An arithmetic invariant broke mid-computation.
    #[error("computation error: {0}")]
    Computation(String),
}

/// Score one user's report.
///
/// Fails with [`ScoringError::InsufficientHistory`] before computing any
/// metric when the ledger is empty or spans fewer than
/// [`MIN_HISTORY_DAYS`] days.
pub fn score_report(
    transactions: &[Transaction],
    balances: &[DailyBalance],
    ctx: &ReportContext,
    overrides: &OverrideMap,
) -> Result<ScoreReport, ScoringError> {
    let observed_days =
        metrics::observed_history_days(transactions, ctx.reference_date).unwrap_or(0);
    if observed_days < MIN_HISTORY_DAYS {
        return Err(ScoringError::InsufficientHistory { observed_days });
    }

    let tagged = tagger::tag_transactions(transactions, ctx, overrides);
    let metrics = metrics::compute_metrics(&tagged, balances, ctx);
    validate_metrics(&metrics)?;

    let points = points::score_points(&metrics, &tagged);
    let base_score = points.total();
    let blink_score = decision::normalize(base_score);
    let recommendation = decision::recommend(blink_score, observed_days);
    let flags = decision::emit_flags(&metrics);

    Ok(ScoreReport {
        metrics,
        points,
        base_score,
        blink_score,
        recommendation,
        flags,
        tagged,
    })
}

/// A non-finite metric would poison every bucket comparison downstream.
fn validate_metrics(metrics: &crate::model::MetricVector) -> Result<(), ScoringError> {
    let floats = [
        ("paycheck_regularity", metrics.paycheck_regularity),
        ("buffer_volatility", metrics.buffer_volatility),
        ("deposit_multiplicity30", metrics.deposit_multiplicity30),
        ("volatility90", metrics.volatility90),
    ];
    for (name, value) in floats {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(ScoringError::Computation(format!(
                    "metric {name} is not finite: {v}"
                )));
            }
        }
    }
    Ok(())
}
