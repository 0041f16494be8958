//! Recurring-deposit detection.
//!
//! Deposits of similar size arriving on a weekly, biweekly or semimonthly
//! rhythm are payroll-like even when nothing else about them says so. The
//! detector buckets recent inflows by rounded amount and looks for repeated
//! day-gaps inside each bucket.

use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::model::{TaggedTransaction, RULE_CADENCE};
use crate::tagger::confidence_from_mask;

/// Only inflows this many days back from the reference date are considered.
const CADENCE_LOOKBACK_DAYS: i64 = 90;

/// Minimum deposits in an amount bucket before a rhythm is looked for.
const MIN_BUCKET_SIZE: usize = 3;

/// Day-gap targets, tested in order: weekly, biweekly, semimonthly.
const GAP_TARGETS: &[i64] = &[7, 14, 15];

/// A gap matches a target when it is within this many days of it.
const GAP_TOLERANCE: i64 = 1;

/// Minimum matching gaps before the whole bucket is marked recurring.
const MIN_MATCHING_GAPS: usize = 2;

/// Post-pass: set the cadence rule bit on every deposit of each bucket with
/// a detected rhythm, then refresh the confidence weights.
pub fn mark_recurring_deposits(tagged: &mut [TaggedTransaction], reference_date: NaiveDate) {
    let window_start = reference_date - Duration::days(CADENCE_LOOKBACK_DAYS - 1);

    // Amount bucket ($2 wide) → indices of member deposits.
    let mut buckets: HashMap<i64, Vec<usize>> = HashMap::new();
    for (idx, t) in tagged.iter().enumerate() {
        if !t.transaction.is_inflow() {
            continue;
        }
        if t.date() < window_start || t.date() > reference_date {
            continue;
        }
        buckets.entry(bucket_key(t)).or_default().push(idx);
    }

    for members in buckets.values_mut() {
        if members.len() < MIN_BUCKET_SIZE {
            continue;
        }
        members.sort_by_key(|&idx| tagged[idx].date());

        let gaps: Vec<i64> = members
            .windows(2)
            .map(|pair| (tagged[pair[1]].date() - tagged[pair[0]].date()).num_days())
            .collect();

        if !has_rhythm(&gaps) {
            continue;
        }

        for &idx in members.iter() {
            let t = &mut tagged[idx];
            t.payroll_rule_mask |= RULE_CADENCE;
            t.payroll_confidence_weight = confidence_from_mask(t.payroll_rule_mask);
            t.is_payroll = t.payroll_confidence_weight > 0.0;
        }
    }
}

/// Bucket key: round(|amount| / 2) * 2, i.e. $2-wide bins.
fn bucket_key(t: &TaggedTransaction) -> i64 {
    (t.amount().abs() / dec!(2))
        .round()
        .to_i64()
        .map(|half| half.saturating_mul(2))
        .unwrap_or(i64::MAX)
}

/// True when at least two gaps land within tolerance of a single target.
/// Targets are tried in order and the first hit wins.
fn has_rhythm(gaps: &[i64]) -> bool {
    for &target in GAP_TARGETS {
        let matching = gaps
            .iter()
            .filter(|&&gap| (gap - target).abs() <= GAP_TOLERANCE)
            .count();
        if matching >= MIN_MATCHING_GAPS {
            return true;
        }
    }
    false
}
