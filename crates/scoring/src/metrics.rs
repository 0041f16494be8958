//! The eleven-metric window aggregator.
//!
//! Every window is an inclusive calendar-day range ending at the reference
//! date: "last 30 days" is `[T0-29, T0]`. Metrics that cannot be derived
//! from the observed data stay `None`; the scorer decides what absence is
//! worth.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::balances;
use crate::model::{DailyBalance, MetricVector, ReportContext, TaggedTransaction, Transaction};
use crate::stats;

const WINDOW_30: i64 = 30;
const WINDOW_90: i64 = 90;
const WINDOW_180: i64 = 180;

/// Payrolls at or above this weight anchor "days since last paycheck".
const RELIABLE_PAYROLL_WEIGHT: f64 = 0.5;

/// Longest counterparty key taken from a description.
const COUNTERPARTY_KEY_CHARS: usize = 16;

fn window_start(t0: NaiveDate, days: i64) -> NaiveDate {
    t0 - Duration::days(days - 1)
}

fn in_window(date: NaiveDate, t0: NaiveDate, days: i64) -> bool {
    date >= window_start(t0, days) && date <= t0
}

/// Inclusive span from the earliest transaction to the reference date.
pub fn observed_history_days(
    transactions: &[Transaction],
    reference_date: NaiveDate,
) -> Option<i64> {
    let earliest = transactions.iter().map(|t| t.date).min()?;
    Some((reference_date - earliest).num_days() + 1)
}

pub fn compute_metrics(
    tagged: &[TaggedTransaction],
    balances: &[DailyBalance],
    ctx: &ReportContext,
) -> MetricVector {
    let t0 = ctx.reference_date;
    let history_days = tagged
        .iter()
        .map(|t| t.date())
        .min()
        .map(|earliest| (t0 - earliest).num_days() + 1);

    let payrolls: Vec<&TaggedTransaction> = tagged.iter().filter(|t| t.is_payroll).collect();

    let median_pairs: Vec<(Decimal, f64)> = payrolls
        .iter()
        .map(|t| (t.amount().abs(), t.payroll_confidence_weight))
        .collect();
    let median_paycheck = stats::weighted_median(&median_pairs);

    let paycheck_regularity = paycheck_regularity(&payrolls, t0);

    let days_since_last_paycheck = payrolls
        .iter()
        .filter(|t| t.payroll_confidence_weight >= RELIABLE_PAYROLL_WEIGHT)
        .map(|t| t.date())
        .max()
        .map(|latest| (t0 - latest).num_days());

    let overdraft_count90 = Some(
        tagged
            .iter()
            .filter(|t| t.is_odfee && in_window(t.date(), t0, WINDOW_90))
            .count() as i64,
    );

    let buffer = balances::seven_day_buffer(balances, ctx);
    let (clean_buffer7, buffer_volatility) = match buffer {
        Some(b) => (Some(b.clean_buffer), b.volatility),
        None => (None, None),
    };

    let deposit_multiplicity30 = Some(deposit_multiplicity(tagged, t0));

    let net = daily_net_map(tagged, t0, history_days);
    let net_cash30 = if net.is_empty() {
        None
    } else {
        Some(windowed_sum(&net, t0, WINDOW_30))
    };

    let debt_load30 = debt_load(tagged, t0);
    let volatility90 = volatility(&net, t0);

    MetricVector {
        history_days,
        median_paycheck,
        paycheck_regularity,
        days_since_last_paycheck,
        overdraft_count90,
        clean_buffer7,
        buffer_volatility,
        deposit_multiplicity30,
        net_cash30,
        debt_load30,
        volatility90,
    }
}

/// Weighted stddev of consecutive day-gaps between payrolls in the 180-day
/// window; each gap weighs as much as its weaker endpoint.
fn paycheck_regularity(payrolls: &[&TaggedTransaction], t0: NaiveDate) -> Option<f64> {
    let mut recent: Vec<&&TaggedTransaction> = payrolls
        .iter()
        .filter(|t| t.payroll_confidence_weight > 0.0 && in_window(t.date(), t0, WINDOW_180))
        .collect();
    if recent.len() < 2 {
        return None;
    }
    recent.sort_by_key(|t| t.date());

    let gaps: Vec<(f64, f64)> = recent
        .windows(2)
        .map(|pair| {
            let gap = (pair[1].date() - pair[0].date()).num_days() as f64;
            let weight = pair[0]
                .payroll_confidence_weight
                .min(pair[1].payroll_confidence_weight);
            (gap, weight)
        })
        .collect();

    stats::weighted_std_dev(&gaps)
}

/// Unique inflow counterparties over the payroll-event count, both in the
/// 30-day window.
fn deposit_multiplicity(tagged: &[TaggedTransaction], t0: NaiveDate) -> f64 {
    let mut counterparties: HashSet<String> = HashSet::new();
    let mut payroll_events = 0i64;

    for t in tagged {
        if !in_window(t.date(), t0, WINDOW_30) {
            continue;
        }
        if t.is_payroll {
            payroll_events += 1;
        }
        if t.transaction.is_inflow() {
            counterparties.insert(counterparty_key(&t.transaction));
        }
    }

    counterparties.len() as f64 / payroll_events.max(1) as f64
}

fn counterparty_key(tx: &Transaction) -> String {
    let raw: String = match (tx.merchant_name.as_deref(), tx.description.as_deref()) {
        (Some(merchant), _) => merchant.to_string(),
        (None, Some(description)) => description.chars().take(COUNTERPARTY_KEY_CHARS).collect(),
        (None, None) => "Unknown".to_string(),
    };
    raw.trim().to_uppercase()
}

/// Loan-payment outflows over inflow magnitudes, 30-day window.
fn debt_load(tagged: &[TaggedTransaction], t0: NaiveDate) -> Option<Decimal> {
    let mut repaid = Decimal::ZERO;
    let mut inflows = Decimal::ZERO;
    for t in tagged {
        if !in_window(t.date(), t0, WINDOW_30) {
            continue;
        }
        if t.is_loanpay && t.transaction.is_outflow() {
            repaid += t.amount();
        }
        if t.transaction.is_inflow() {
            inflows += -t.amount();
        }
    }
    if inflows.is_zero() {
        return None;
    }
    Some(repaid / inflows)
}

/// Per-day net cash over the full observed history, pre-seeded with zero so
/// quiet days still count as samples.
fn daily_net_map(
    tagged: &[TaggedTransaction],
    t0: NaiveDate,
    history_days: Option<i64>,
) -> BTreeMap<NaiveDate, Decimal> {
    let mut map = BTreeMap::new();
    let Some(days) = history_days else {
        return map;
    };

    let mut day = t0 - Duration::days(days - 1);
    while day <= t0 {
        map.insert(day, Decimal::ZERO);
        day = day + Duration::days(1);
    }

    for t in tagged {
        if let Some(net) = map.get_mut(&t.date()) {
            // daily net = inflows minus outflows; with the sign convention
            // both cases reduce to subtracting the amount
            *net -= t.amount();
        }
    }
    map
}

fn windowed_sum(net: &BTreeMap<NaiveDate, Decimal>, t0: NaiveDate, days: i64) -> Decimal {
    net.range(window_start(t0, days)..=t0).map(|(_, v)| *v).sum()
}

/// Relative cash-flow volatility: stddev of daily net over its mean
/// magnitude, 90-day window. Degenerate means are absent, not infinite.
fn volatility(net: &BTreeMap<NaiveDate, Decimal>, t0: NaiveDate) -> Option<f64> {
    let nets: Vec<f64> = net
        .range(window_start(t0, WINDOW_90)..=t0)
        .map(|(_, v)| stats::to_f64(*v))
        .collect();

    let std_dev = stats::sample_std_dev(&nets)?;
    let magnitudes: Vec<f64> = nets.iter().map(|v| v.abs()).collect();
    let mean_magnitude = stats::mean(&magnitudes)?;

    if std_dev == 0.0 && mean_magnitude == 0.0 {
        return Some(0.0);
    }
    if mean_magnitude < 0.01 && std_dev > 0.0 {
        return None;
    }
    Some(std_dev / mean_magnitude)
}
