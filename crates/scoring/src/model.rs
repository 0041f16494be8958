use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single bank transaction as delivered by the asset report.
///
/// Sign convention: inflows (credits) carry a negative amount, outflows
/// (debits) a positive one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub merchant_name: Option<String>,
    pub description: Option<String>,
    /// Ordered category path, e.g. ["Transfer", "Payroll"].
    #[serde(default)]
    pub category: Vec<String>,
    pub category_id: Option<String>,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub fn is_outflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// End-of-day balance for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// Anchors every lookback window to a reference date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContext {
    /// Reference date the windows end at. Must not precede the newest
    /// transaction.
    pub reference_date: NaiveDate,
    /// Balance at the reference date. Absent when the report carried none;
    /// the liquidity buffer is then unavailable.
    pub current_balance: Option<Decimal>,
}

/// Caller-supplied reclassification of a single transaction. Absent fields
/// leave the automatic tag untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TagOverride {
    pub is_payroll: Option<bool>,
    pub is_loanpay: Option<bool>,
}

/// Transaction id → override. Ids not present in the input set are ignored.
pub type OverrideMap = HashMap<String, TagOverride>;

/// Payroll rule-mask bits.
pub const RULE_CATEGORY: u8 = 1;
pub const RULE_KEYWORD: u8 = 1 << 1;
pub const RULE_CADENCE: u8 = 1 << 2;

/// A transaction plus the classifier's verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedTransaction {
    pub transaction: Transaction,
    pub is_payroll: bool,
    pub is_loanpay: bool,
    pub is_odfee: bool,
    /// Bitwise OR of the payroll rules that fired (category / keyword /
    /// cadence).
    pub payroll_rule_mask: u8,
    /// 0.0, 0.2, 0.5 or 1.0 depending on how many rules agreed.
    pub payroll_confidence_weight: f64,
}

impl TaggedTransaction {
    pub fn date(&self) -> NaiveDate {
        self.transaction.date
    }

    pub fn amount(&self) -> Decimal {
        self.transaction.amount
    }
}

/// The eleven behavioral metrics. `None` means "not derivable from the
/// observed data", which the scorer treats differently from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricVector {
    pub history_days: Option<i64>,
    pub median_paycheck: Option<Decimal>,
    pub paycheck_regularity: Option<f64>,
    pub days_since_last_paycheck: Option<i64>,
    pub overdraft_count90: Option<i64>,
    pub clean_buffer7: Option<Decimal>,
    pub buffer_volatility: Option<f64>,
    pub deposit_multiplicity30: Option<f64>,
    pub net_cash30: Option<Decimal>,
    pub debt_load30: Option<Decimal>,
    pub volatility90: Option<f64>,
}

/// Integer point contribution per metric, parallel to [`MetricVector`].
///
/// The liquidity composite (buffer level x buffer volatility) is carried on
/// `clean_buffer7`; `buffer_volatility` is always 0 because the composite
/// already consumed it. The deposit-multiplicity penalty is carried on
/// `deposit_multiplicity30`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointBreakdown {
    pub history_days: i32,
    pub median_paycheck: i32,
    pub paycheck_regularity: i32,
    pub days_since_last_paycheck: i32,
    pub overdraft_count90: i32,
    pub clean_buffer7: i32,
    pub buffer_volatility: i32,
    pub deposit_multiplicity30: i32,
    pub net_cash30: i32,
    pub debt_load30: i32,
    pub volatility90: i32,
}

impl PointBreakdown {
    pub fn total(&self) -> i32 {
        self.history_days
            + self.median_paycheck
            + self.paycheck_regularity
            + self.days_since_last_paycheck
            + self.overdraft_count90
            + self.clean_buffer7
            + self.buffer_volatility
            + self.deposit_multiplicity30
            + self.net_cash30
            + self.debt_load30
            + self.volatility90
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approved,
    Rejected,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approved => "approved",
            Recommendation::Rejected => "rejected",
        }
    }
}

/// Early-warning signals raised independently of the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningFlags {
    pub od_vol: bool,
    pub cash_crunch: bool,
    pub debt_trap: bool,
}

/// Full output of one scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub metrics: MetricVector,
    pub points: PointBreakdown,
    pub base_score: i32,
    /// Normalized, clamped, rounded to two decimals. Always in [0, 100].
    pub blink_score: f64,
    pub recommendation: Recommendation,
    pub flags: WarningFlags,
    pub tagged: Vec<TaggedTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(amount: Decimal) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            amount,
            merchant_name: None,
            description: None,
            category: vec![],
            category_id: None,
        }
    }

    #[test]
    fn negative_amount_is_inflow() {
        let t = tx(dec!(-2000.00));
        assert!(t.is_inflow());
        assert!(!t.is_outflow());
    }

    #[test]
    fn positive_amount_is_outflow() {
        let t = tx(dec!(34.99));
        assert!(t.is_outflow());
        assert!(!t.is_inflow());
    }

    #[test]
    fn zero_amount_is_neither() {
        let t = tx(Decimal::ZERO);
        assert!(!t.is_inflow());
        assert!(!t.is_outflow());
    }

    #[test]
    fn point_breakdown_total_sums_all_eleven_fields() {
        let points = PointBreakdown {
            history_days: 10,
            median_paycheck: 20,
            paycheck_regularity: 25,
            days_since_last_paycheck: 10,
            overdraft_count90: 20,
            clean_buffer7: 40,
            buffer_volatility: 0,
            deposit_multiplicity30: -15,
            net_cash30: 10,
            debt_load30: 20,
            volatility90: 10,
        };
        assert_eq!(points.total(), 150);
    }

    #[test]
    fn recommendation_serializes_lowercase() {
        let s = serde_json::to_string(&Recommendation::Approved).unwrap();
        assert_eq!(s, "\"approved\"");
        assert_eq!(Recommendation::Rejected.as_str(), "rejected");
    }
}
