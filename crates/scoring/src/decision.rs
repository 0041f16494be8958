//! Score normalization, the approval gate and the early-warning flags.

use rust_decimal_macros::dec;

use crate::model::{MetricVector, Recommendation, WarningFlags};

/// Affine transform constants: raw points centered at (mean 40, spread 25)
/// are remapped to (center 50, spread 15).
const BASE_MEAN: f64 = 40.0;
const BASE_SPREAD: f64 = 25.0;
const SCORE_CENTER: f64 = 50.0;
const SCORE_SPREAD: f64 = 15.0;

/// Normalize a base point sum into the 0-100 band, two decimals.
pub fn normalize(base_score: i32) -> f64 {
    let raw = SCORE_CENTER + SCORE_SPREAD * (base_score as f64 - BASE_MEAN) / BASE_SPREAD;
    (raw.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

/// Approval thresholds loosen as the observed history grows.
pub fn recommend(blink_score: f64, history_days: i64) -> Recommendation {
    let threshold = match history_days {
        d if d < 90 => return Recommendation::Rejected,
        90..=179 => 88.0,
        180..=364 => 80.0,
        _ => 73.0,
    };
    if blink_score >= threshold {
        Recommendation::Approved
    } else {
        Recommendation::Rejected
    }
}

/// Three independent reviewer signals. A flag needs both of its metrics
/// present; absence never raises it.
pub fn emit_flags(metrics: &MetricVector) -> WarningFlags {
    let od_vol = matches!(
        (metrics.overdraft_count90, metrics.buffer_volatility),
        (Some(count), Some(vol)) if count >= 3 && vol > 100.0
    );

    let cash_crunch = matches!(
        (metrics.net_cash30, metrics.days_since_last_paycheck),
        (Some(net), Some(days)) if net < dec!(-200) && days > 10
    );

    let debt_trap = matches!(
        (metrics.debt_load30, metrics.clean_buffer7),
        (Some(load), Some(buffer)) if load > dec!(0.35) && buffer < dec!(50)
    );

    WarningFlags {
        od_vol,
        cash_crunch,
        debt_trap,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn normalize_maps_the_center() {
        // base 40 → exactly 50
        assert_eq!(normalize(40), 50.0);
    }

    #[test]
    fn normalize_scales_linearly() {
        // base 65 → 50 + 15 * 25/25 = 65
        assert_eq!(normalize(65), 65.0);
        // base 15 → 50 - 15 = 35
        assert_eq!(normalize(15), 35.0);
    }

    #[test]
    fn normalize_clamps_to_the_band() {
        assert_eq!(normalize(1000), 100.0);
        assert_eq!(normalize(-1000), 0.0);
    }

    #[test]
    fn normalize_rounds_to_two_decimals() {
        // base 41 → 50 + 15/25 = 50.6
        let s = normalize(41);
        assert_eq!(s, 50.6);
        // base 42 → 51.2
        assert_eq!(normalize(42), 51.2);
    }

    #[test]
    fn short_history_always_rejected() {
        assert_eq!(recommend(100.0, 89), Recommendation::Rejected);
        assert_eq!(recommend(100.0, 0), Recommendation::Rejected);
    }

    #[test]
    fn mid_history_needs_eighty_eight() {
        assert_eq!(recommend(88.0, 90), Recommendation::Approved);
        assert_eq!(recommend(87.99, 179), Recommendation::Rejected);
    }

    #[test]
    fn long_history_needs_eighty() {
        assert_eq!(recommend(80.0, 180), Recommendation::Approved);
        assert_eq!(recommend(79.99, 364), Recommendation::Rejected);
    }

    #[test]
    fn full_year_needs_seventy_three() {
        assert_eq!(recommend(73.0, 365), Recommendation::Approved);
        assert_eq!(recommend(72.99, 400), Recommendation::Rejected);
    }

    #[test]
    fn od_vol_needs_both_conditions() {
        let mut metrics = MetricVector {
            overdraft_count90: Some(4),
            buffer_volatility: Some(150.0),
            ..Default::default()
        };
        assert!(emit_flags(&metrics).od_vol);

        metrics.overdraft_count90 = Some(2);
        assert!(!emit_flags(&metrics).od_vol);

        metrics.overdraft_count90 = Some(4);
        metrics.buffer_volatility = Some(100.0);
        assert!(!emit_flags(&metrics).od_vol);

        metrics.buffer_volatility = None;
        assert!(!emit_flags(&metrics).od_vol);
    }

    #[test]
    fn cash_crunch_needs_both_conditions() {
        let mut metrics = MetricVector {
            net_cash30: Some(dec!(-500)),
            days_since_last_paycheck: Some(12),
            ..Default::default()
        };
        assert!(emit_flags(&metrics).cash_crunch);

        metrics.net_cash30 = Some(dec!(-200));
        assert!(!emit_flags(&metrics).cash_crunch);

        metrics.net_cash30 = Some(dec!(-500));
        metrics.days_since_last_paycheck = Some(10);
        assert!(!emit_flags(&metrics).cash_crunch);

        metrics.days_since_last_paycheck = None;
        assert!(!emit_flags(&metrics).cash_crunch);
    }

    #[test]
    fn debt_trap_needs_both_conditions() {
        let mut metrics = MetricVector {
            debt_load30: Some(dec!(0.40)),
            clean_buffer7: Some(dec!(30)),
            ..Default::default()
        };
        assert!(emit_flags(&metrics).debt_trap);

        metrics.debt_load30 = Some(dec!(0.35));
        assert!(!emit_flags(&metrics).debt_trap);

        metrics.debt_load30 = Some(dec!(0.40));
        metrics.clean_buffer7 = Some(dec!(50));
        assert!(!emit_flags(&metrics).debt_trap);

        metrics.clean_buffer7 = None;
        assert!(!emit_flags(&metrics).debt_trap);
    }

    #[test]
    fn flags_depend_only_on_their_two_metrics() {
        let sparse = MetricVector {
            overdraft_count90: Some(5),
            buffer_volatility: Some(200.0),
            ..Default::default()
        };
        let full = MetricVector {
            history_days: Some(400),
            median_paycheck: Some(dec!(2000)),
            paycheck_regularity: Some(1.0),
            days_since_last_paycheck: Some(2),
            net_cash30: Some(dec!(500)),
            debt_load30: Some(dec!(0.1)),
            volatility90: Some(0.2),
            deposit_multiplicity30: Some(1.0),
            clean_buffer7: Some(dec!(900)),
            ..sparse.clone()
        };
        assert_eq!(emit_flags(&sparse).od_vol, emit_flags(&full).od_vol);
    }
}
