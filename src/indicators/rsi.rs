//! RSI — EWM-smoothed gain/loss ratio.
//!
//! Uses the weighted (pandas `adjust=true`) form of the exponential mean
//! with `alpha = 1/period` (center of mass `period - 1`), which is what
//! `ewm(com=period-1, min_periods=period).mean()` computes. The
//! `min_periods` convention carries over as the `period + 1` minimum series
//! length.

use crate::errors::RsiWatchError;
use crate::series::PriceSeries;

/// Compute the RSI value at the most recent index of `series`.
///
/// Requires `series.len() >= period + 1` (one extra close to form the first
/// delta). Boundaries are explicit: a series with no movement at all yields
/// 0, a series with gains and no losses yields 100.
pub fn rsi(series: &PriceSeries, period: usize) -> Result<f64, RsiWatchError> {
    if period == 0 {
        return Err(RsiWatchError::configuration("RSI period must be >= 1"));
    }

    let closes = series.closes();
    let required = period + 1;
    if closes.len() < required {
        return Err(RsiWatchError::InsufficientData {
            required,
            available: closes.len(),
        });
    }

    let alpha = 1.0 / period as f64;
    let decay = 1.0 - alpha;

    // Weighted EWM over the delta sequence: numerators and the shared
    // denominator evolve as num = x + decay*num, den = 1 + decay*den.
    let mut gain_num = 0.0;
    let mut loss_num = 0.0;
    let mut den = 0.0;

    for pair in closes.windows(2) {
        let delta = pair[1] - pair[0];
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        gain_num = gain + decay * gain_num;
        loss_num = loss + decay * loss_num;
        den = 1.0 + decay * den;
    }

    let avg_gain = gain_num / den;
    let avg_loss = loss_num / den;

    // avg_loss == 0 with no gains means a perfectly flat window; naive
    // division would produce NaN here.
    let value = if avg_gain == 0.0 && avg_loss == 0.0 {
        0.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes.to_vec())
    }

    #[test]
    fn monotonic_rise_is_100() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(rsi(&s, 6).unwrap(), 100.0);
    }

    #[test]
    fn monotonic_fall_is_0() {
        let s = series(&[8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
        assert_eq!(rsi(&s, 6).unwrap(), 0.0);
    }

    #[test]
    fn flat_series_is_0_not_nan() {
        let s = series(&[5.0; 12]);
        let value = rsi(&s, 6).unwrap();
        assert_eq!(value, 0.0);
        assert!(value.is_finite());
    }

    #[test]
    fn mixed_series_stays_bounded() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + (i % 7) as f64)
            .collect();
        let value = rsi(&series(&closes), 14).unwrap();
        assert!((0.0..=100.0).contains(&value), "RSI out of range: {}", value);
    }

    #[test]
    fn equal_gains_and_losses_sit_near_50() {
        // Alternating +1/-1 deltas; gains and losses mirror each other.
        let closes: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let value = rsi(&series(&closes), 6).unwrap();
        assert!((value - 50.0).abs() < 10.0, "expected near 50, got {}", value);
    }

    #[test]
    fn insufficient_data_is_an_error() {
        // period + 1 closes is the minimum; one fewer must fail
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let err = rsi(&s, 6).unwrap_err();
        assert_eq!(
            err,
            RsiWatchError::InsufficientData {
                required: 7,
                available: 6
            }
        );

        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert!(rsi(&s, 6).is_ok());
    }

    #[test]
    fn zero_period_is_a_configuration_error() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert!(matches!(
            rsi(&s, 0),
            Err(RsiWatchError::Configuration { .. })
        ));
    }

    #[test]
    fn recent_gains_outweigh_old_losses() {
        // Early losses followed by steady gains: RSI should end high.
        let mut closes = vec![100.0, 95.0, 90.0, 85.0];
        closes.extend((0..20).map(|i| 85.0 + (i + 1) as f64));
        let value = rsi(&series(&closes), 6).unwrap();
        assert!(value > 90.0, "expected high RSI, got {}", value);
    }
}
