//! Metric-to-point bucket tables.
//!
//! Each metric maps to an integer contribution; absent metrics contribute
//! nothing unless a bucket says otherwise. Bands are inclusive on the low
//! side and tested top-down.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::{MetricVector, PointBreakdown, TaggedTransaction};

/// Below this average payroll confidence, paycheck-derived points are
/// withheld (the metrics themselves stay reported).
const LOW_CONFIDENCE_THRESHOLD: f64 = 0.25;

/// Deposit-multiplicity above this smells like income shuffling.
const MULTIPLICITY_PENALTY_ABOVE: f64 = 4.0;

pub fn score_points(metrics: &MetricVector, tagged: &[TaggedTransaction]) -> PointBreakdown {
    let mut points = PointBreakdown {
        history_days: history_points(metrics.history_days),
        median_paycheck: median_paycheck_points(metrics.median_paycheck),
        paycheck_regularity: regularity_points(metrics.paycheck_regularity),
        days_since_last_paycheck: days_since_points(metrics.days_since_last_paycheck),
        overdraft_count90: overdraft_points(metrics.overdraft_count90),
        clean_buffer7: liquidity_points(metrics.clean_buffer7, metrics.buffer_volatility),
        // consumed by the liquidity composite above
        buffer_volatility: 0,
        deposit_multiplicity30: multiplicity_points(metrics.deposit_multiplicity30),
        net_cash30: net_cash_points(metrics.net_cash30),
        debt_load30: debt_load_points(metrics.debt_load30),
        volatility90: volatility_points(metrics.volatility90),
    };

    if payroll_confidence_is_low(tagged) {
        points.median_paycheck = 0;
        points.paycheck_regularity = 0;
        points.days_since_last_paycheck = 0;
    }

    points
}

/// Average confidence weight across payroll transactions, when any exist.
pub fn average_payroll_confidence(tagged: &[TaggedTransaction]) -> Option<f64> {
    let weights: Vec<f64> = tagged
        .iter()
        .filter(|t| t.is_payroll)
        .map(|t| t.payroll_confidence_weight)
        .collect();
    if weights.is_empty() {
        return None;
    }
    Some(weights.iter().sum::<f64>() / weights.len() as f64)
}

fn payroll_confidence_is_low(tagged: &[TaggedTransaction]) -> bool {
    average_payroll_confidence(tagged).is_some_and(|avg| avg < LOW_CONFIDENCE_THRESHOLD)
}

fn history_points(days: Option<i64>) -> i32 {
    match days {
        Some(d) if d >= 365 => 10,
        Some(d) if d >= 180 => 5,
        _ => 0,
    }
}

fn overdraft_points(count: Option<i64>) -> i32 {
    match count {
        Some(0) => 20,
        Some(c) if c <= 2 => 5,
        Some(_) => -15,
        None => 0,
    }
}

fn regularity_points(std_dev: Option<f64>) -> i32 {
    match std_dev {
        Some(s) if s <= 2.0 => 25,
        Some(s) if s <= 5.0 => 10,
        Some(_) => -10,
        None => 0,
    }
}

fn days_since_points(days: Option<i64>) -> i32 {
    match days {
        Some(d) if d <= 7 => 10,
        Some(d) if d <= 14 => 0,
        Some(_) => -10,
        None => 0,
    }
}

fn debt_load_points(ratio: Option<Decimal>) -> i32 {
    match ratio {
        Some(r) if r <= dec!(0.15) => 20,
        Some(r) if r <= dec!(0.30) => 5,
        Some(_) => -15,
        None => 0,
    }
}

fn net_cash_points(net: Option<Decimal>) -> i32 {
    match net {
        Some(n) if n >= Decimal::ZERO => 10,
        Some(_) => -10,
        None => 0,
    }
}

fn volatility_points(v: Option<f64>) -> i32 {
    match v {
        Some(v) if v <= 0.40 => 10,
        Some(v) if v <= 0.70 => 0,
        Some(_) => -10,
        None => 0,
    }
}

fn median_paycheck_points(median: Option<Decimal>) -> i32 {
    match median {
        Some(m) if m >= dec!(1500) => 20,
        Some(m) if m >= dec!(1000) => 10,
        Some(m) if m >= dec!(600) => 0,
        Some(_) => -10,
        None => 0,
    }
}

/// Liquidity composite over buffer level and buffer volatility.
fn liquidity_points(buffer: Option<Decimal>, volatility: Option<f64>) -> i32 {
    match buffer {
        Some(b) if b >= dec!(300) => match volatility {
            Some(v) if v <= 50.0 => 40,
            Some(_) => 25,
            None => 25,
        },
        Some(b) if b >= dec!(100) => 10,
        _ => -20,
    }
}

fn multiplicity_points(multiplicity: Option<f64>) -> i32 {
    match multiplicity {
        Some(m) if m > MULTIPLICITY_PENALTY_ABOVE => -15,
        _ => 0,
    }
}
