use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Lossy conversion for metrics that leave exact-money territory
/// (standard deviations, ratios of dissimilar units).
pub fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Weighted median: sort by value ascending, walk cumulative weight, return
/// the first value where the cumulative weight reaches half the total.
/// Pairs with non-positive weight are ignored.
pub fn weighted_median(pairs: &[(Decimal, f64)]) -> Option<Decimal> {
    let mut pairs: Vec<(Decimal, f64)> = pairs.iter().filter(|(_, w)| *w > 0.0).copied().collect();
    if pairs.is_empty() {
        return None;
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let total: f64 = pairs.iter().map(|(_, w)| w).sum();
    let half = total / 2.0;
    let mut cumulative = 0.0;
    for (value, weight) in &pairs {
        cumulative += weight;
        if cumulative >= half {
            return Some(*value);
        }
    }
    // Unreachable with positive weights, but the walk must not fall through.
    pairs.last().map(|(v, _)| *v)
}

/// Weighted standard deviation, biased form:
/// sqrt( sum w_i (x_i - mean_w)^2 / sum w_i ).
/// Requires at least two positive-weight samples.
pub fn weighted_std_dev(samples: &[(f64, f64)]) -> Option<f64> {
    let samples: Vec<(f64, f64)> = samples.iter().filter(|(_, w)| *w > 0.0).copied().collect();
    if samples.len() < 2 {
        return None;
    }

    let weight_sum: f64 = samples.iter().map(|(_, w)| w).sum();
    let mean = samples.iter().map(|(x, w)| x * w).sum::<f64>() / weight_sum;
    let variance = samples
        .iter()
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / weight_sum;

    Some(variance.sqrt())
}

/// Sample standard deviation (denominator n - 1).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn weighted_median_empty_is_none() {
        assert_eq!(weighted_median(&[]), None);
    }

    #[test]
    fn weighted_median_single_value() {
        let pairs = [(dec!(2000), 1.0)];
        assert_eq!(weighted_median(&pairs), Some(dec!(2000)));
    }

    #[test]
    fn weighted_median_equal_weights_picks_middle() {
        let pairs = [(dec!(300), 1.0), (dec!(100), 1.0), (dec!(200), 1.0)];
        // sorted: 100, 200, 300; total 3.0, half 1.5; cumulative hits 2.0 at 200
        assert_eq!(weighted_median(&pairs), Some(dec!(200)));
    }

    #[test]
    fn weighted_median_heavy_tail_dominates() {
        let pairs = [(dec!(100), 0.2), (dec!(2000), 1.0)];
        // total 1.2, half 0.6; 100 reaches 0.2, 2000 reaches 1.2 >= 0.6
        assert_eq!(weighted_median(&pairs), Some(dec!(2000)));
    }

    #[test]
    fn weighted_median_ignores_zero_weight() {
        let pairs = [(dec!(5000), 0.0), (dec!(1500), 0.5)];
        assert_eq!(weighted_median(&pairs), Some(dec!(1500)));
    }

    #[test]
    fn weighted_std_dev_requires_two_samples() {
        assert_eq!(weighted_std_dev(&[]), None);
        assert_eq!(weighted_std_dev(&[(14.0, 1.0)]), None);
        assert_eq!(weighted_std_dev(&[(14.0, 1.0), (14.0, 0.0)]), None);
    }

    #[test]
    fn weighted_std_dev_constant_series_is_zero() {
        let s = weighted_std_dev(&[(14.0, 1.0), (14.0, 0.5), (14.0, 1.0)]).unwrap();
        assert!(s.abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_std_dev_matches_hand_computation() {
        // mean = (2*1 + 6*1) / 2 = 4; var = (1*4 + 1*4) / 2 = 4; sd = 2
        let s = weighted_std_dev(&[(2.0, 1.0), (6.0, 1.0)]).unwrap();
        assert!((s - 2.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_std_dev_weights_shift_the_mean() {
        // mean = (2*3 + 6*1) / 4 = 3; var = (3*1 + 1*9) / 4 = 3
        let s = weighted_std_dev(&[(2.0, 3.0), (6.0, 1.0)]).unwrap();
        assert!((s - 3.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn sample_std_dev_requires_two_values() {
        assert_eq!(sample_std_dev(&[]), None);
        assert_eq!(sample_std_dev(&[42.0]), None);
    }

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        // values 2, 4: mean 3, var = (1 + 1) / 1 = 2
        let s = sample_std_dev(&[2.0, 4.0]).unwrap();
        assert!((s - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn mean_averages() {
        assert!((mean(&[1.0, 2.0, 3.0]).unwrap() - 2.0).abs() < 1e-9);
    }
}
