use blink_scoring::{ScoreReport, ENGINE_VERSION};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per scoring run. Successful runs carry the full metric and point
/// vectors; insufficient-history runs carry nulls plus a failure reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScoreAudit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub snapshot_timestamp: DateTime<Utc>,

    pub metric_observed_history_days: Option<i64>,
    pub metric_median_paycheck: Option<Decimal>,
    pub metric_paycheck_regularity: Option<f64>,
    pub metric_days_since_last_paycheck: Option<i64>,
    pub metric_overdraft_count90: Option<i64>,
    pub metric_clean_buffer7: Option<Decimal>,
    pub metric_buffer_volatility: Option<f64>,
    pub metric_deposit_multiplicity30: Option<f64>,
    pub metric_net_cash30: Option<Decimal>,
    pub metric_debt_load30: Option<Decimal>,
    pub metric_volatility90: Option<f64>,

    pub points_history_days: Option<i32>,
    pub points_median_paycheck: Option<i32>,
    pub points_paycheck_regularity: Option<i32>,
    pub points_days_since_last_paycheck: Option<i32>,
    pub points_overdraft_count90: Option<i32>,
    pub points_clean_buffer7: Option<i32>,
    pub points_buffer_volatility: Option<i32>,
    pub points_deposit_multiplicity30: Option<i32>,
    pub points_net_cash30: Option<i32>,
    pub points_debt_load30: Option<i32>,
    pub points_volatility90: Option<i32>,

    pub base_score: Option<i32>,
    pub blink_score: Option<f64>,
    pub recommendation: String,
    pub flag_od_vol: bool,
    pub flag_cash_crunch: bool,
    pub flag_debt_trap: bool,
    pub failure_reason: Option<String>,
    pub engine_version: String,
    pub created_at: DateTime<Utc>,
}

impl RiskScoreAudit {
    /// Build a full audit row from a completed scoring run.
    pub fn from_report(user_id: Uuid, report: &ScoreReport) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            snapshot_timestamp: now,

            metric_observed_history_days: report.metrics.history_days,
            metric_median_paycheck: report.metrics.median_paycheck,
            metric_paycheck_regularity: report.metrics.paycheck_regularity,
            metric_days_since_last_paycheck: report.metrics.days_since_last_paycheck,
            metric_overdraft_count90: report.metrics.overdraft_count90,
            metric_clean_buffer7: report.metrics.clean_buffer7,
            metric_buffer_volatility: report.metrics.buffer_volatility,
            metric_deposit_multiplicity30: report.metrics.deposit_multiplicity30,
            metric_net_cash30: report.metrics.net_cash30,
            metric_debt_load30: report.metrics.debt_load30,
            metric_volatility90: report.metrics.volatility90,

            points_history_days: Some(report.points.history_days),
            points_median_paycheck: Some(report.points.median_paycheck),
            points_paycheck_regularity: Some(report.points.paycheck_regularity),
            points_days_since_last_paycheck: Some(report.points.days_since_last_paycheck),
            points_overdraft_count90: Some(report.points.overdraft_count90),
            points_clean_buffer7: Some(report.points.clean_buffer7),
            points_buffer_volatility: Some(report.points.buffer_volatility),
            points_deposit_multiplicity30: Some(report.points.deposit_multiplicity30),
            points_net_cash30: Some(report.points.net_cash30),
            points_debt_load30: Some(report.points.debt_load30),
            points_volatility90: Some(report.points.volatility90),

            base_score: Some(report.base_score),
            blink_score: Some(report.blink_score),
            recommendation: report.recommendation.as_str().to_string(),
            flag_od_vol: report.flags.od_vol,
            flag_cash_crunch: report.flags.cash_crunch,
            flag_debt_trap: report.flags.debt_trap,
            failure_reason: None,
            engine_version: ENGINE_VERSION.to_string(),
            created_at: now,
        }
    }

    /// Partial audit row for a run the engine refused: metrics and score
    /// stay null, the recommendation is rejected, the reason is recorded.
    pub fn insufficient_history(user_id: Uuid, observed_days: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            snapshot_timestamp: now,

            metric_observed_history_days: Some(observed_days),
            metric_median_paycheck: None,
            metric_paycheck_regularity: None,
            metric_days_since_last_paycheck: None,
            metric_overdraft_count90: None,
            metric_clean_buffer7: None,
            metric_buffer_volatility: None,
            metric_deposit_multiplicity30: None,
            metric_net_cash30: None,
            metric_debt_load30: None,
            metric_volatility90: None,

            points_history_days: None,
            points_median_paycheck: None,
            points_paycheck_regularity: None,
            points_days_since_last_paycheck: None,
            points_overdraft_count90: None,
            points_clean_buffer7: None,
            points_buffer_volatility: None,
            points_deposit_multiplicity30: None,
            points_net_cash30: None,
            points_debt_load30: None,
            points_volatility90: None,

            base_score: None,
            blink_score: None,
            recommendation: "rejected".to_string(),
            flag_od_vol: false,
            flag_cash_crunch: false,
            flag_debt_trap: false,
            failure_reason: Some(format!("insufficient_history:{observed_days}")),
            engine_version: ENGINE_VERSION.to_string(),
            created_at: now,
        }
    }
}

/// Paging for audit-history reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
