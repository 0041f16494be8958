//! Liquidity buffer from the daily balance series.
//!
//! The historical series is sparse; missing days are filled from the
//! nearest later day. The balance map is loaded with ten trailing days of
//! history even though only the last seven feed the buffer stats — the
//! extra head-room days are deliberately kept.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::model::{DailyBalance, ReportContext};
use crate::stats;

/// Days of history loaded into the balance map, counting the reference day.
const BALANCE_MAP_DAYS: i64 = 10;

/// Days whose forward-filled balances feed the min and stddev.
const BUFFER_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct BufferStats {
    /// Minimum forward-filled end-of-day balance over the last seven days.
    pub clean_buffer: Decimal,
    /// Sample stddev of those balances; absent when they never vary.
    pub volatility: Option<f64>,
}

/// Compute the seven-day buffer. Without a current balance at the reference
/// date there is no anchor to fill from and the whole buffer is absent.
pub fn seven_day_buffer(balances: &[DailyBalance], ctx: &ReportContext) -> Option<BufferStats> {
    let current = ctx.current_balance?;
    let t0 = ctx.reference_date;
    let map_start = t0 - Duration::days(BALANCE_MAP_DAYS - 1);

    let mut by_day: BTreeMap<NaiveDate, Decimal> = balances
        .iter()
        .filter(|b| b.date >= map_start && b.date <= t0)
        .map(|b| (b.date, b.balance))
        .collect();
    by_day.insert(t0, current);

    // Walk backward from the reference day; a missing day reuses the most
    // recently seen (later) balance. The reference day is always present,
    // so the series has exactly BUFFER_DAYS entries.
    let mut series = Vec::with_capacity(BUFFER_DAYS as usize);
    let mut last_seen = None;
    for offset in 0..BUFFER_DAYS {
        let day = t0 - Duration::days(offset);
        if let Some(balance) = by_day.get(&day) {
            last_seen = Some(*balance);
        }
        if let Some(balance) = last_seen {
            series.push(balance);
        }
    }
    series.reverse();

    let clean_buffer = series.iter().min().copied()?;

    let mut distinct = series.clone();
    distinct.sort();
    distinct.dedup();
    let volatility = if distinct.len() < 2 {
        None
    } else {
        let values: Vec<f64> = series.iter().map(|b| stats::to_f64(*b)).collect();
        stats::sample_std_dev(&values)
    };

    Some(BufferStats {
        clean_buffer,
        volatility,
    })
}
