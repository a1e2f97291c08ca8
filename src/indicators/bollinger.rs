//! Bollinger Bands — rolling mean plus/minus a multiple of population
//! standard deviation (divide by `period`, not `period - 1`).

use crate::errors::RsiWatchError;
use crate::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute bands over the last `period` closes of `series`.
///
/// Invariant: `upper >= middle >= lower`, with equality only when the
/// window is perfectly flat.
pub fn bollinger(
    series: &PriceSeries,
    period: usize,
    std_dev_factor: f64,
) -> Result<Bands, RsiWatchError> {
    if period == 0 {
        return Err(RsiWatchError::configuration(
            "Bollinger period must be >= 1",
        ));
    }

    let closes = series.closes();
    if closes.len() < period {
        return Err(RsiWatchError::InsufficientData {
            required: period,
            available: closes.len(),
        });
    }

    let window = &closes[closes.len() - period..];
    let middle = window.iter().sum::<f64>() / period as f64;
    let variance = window
        .iter()
        .map(|x| {
            let d = x - middle;
            d * d
        })
        .sum::<f64>()
        / period as f64;
    let std = variance.sqrt();

    Ok(Bands {
        upper: middle + std_dev_factor * std,
        middle,
        lower: middle - std_dev_factor * std,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(closes.to_vec())
    }

    #[test]
    fn known_window_values() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let bands = bollinger(&s, 5, 2.0).unwrap();
        // mean 3, population variance (4+1+0+1+4)/5 = 2
        let std = 2.0f64.sqrt();
        assert!((bands.middle - 3.0).abs() < 1e-12);
        assert!((bands.upper - (3.0 + 2.0 * std)).abs() < 1e-12);
        assert!((bands.lower - (3.0 - 2.0 * std)).abs() < 1e-12);
    }

    #[test]
    fn uses_only_the_last_period_closes() {
        // A wild prefix must not leak into the window.
        let s = series(&[1000.0, -500.0, 3.0, 3.0, 3.0, 4.0, 5.0]);
        let expected = bollinger(&series(&[3.0, 3.0, 3.0, 4.0, 5.0]), 5, 2.0).unwrap();
        assert_eq!(bollinger(&s, 5, 2.0).unwrap(), expected);
    }

    #[test]
    fn flat_window_collapses_bands() {
        let s = series(&[7.0; 10]);
        let bands = bollinger(&s, 10, 2.0).unwrap();
        assert_eq!(bands.upper, bands.middle);
        assert_eq!(bands.middle, bands.lower);
        assert_eq!(bands.middle, 7.0);
    }

    #[test]
    fn band_ordering_holds() {
        let closes: Vec<f64> = (0..50).map(|i| 50.0 + ((i * 13) % 17) as f64).collect();
        let bands = bollinger(&series(&closes), 20, 2.5).unwrap();
        assert!(bands.upper > bands.middle);
        assert!(bands.middle > bands.lower);
    }

    #[test]
    fn insufficient_data_is_an_error() {
        let s = series(&[1.0, 2.0, 3.0]);
        let err = bollinger(&s, 4, 2.0).unwrap_err();
        assert_eq!(
            err,
            RsiWatchError::InsufficientData {
                required: 4,
                available: 3
            }
        );

        assert!(bollinger(&s, 3, 2.0).is_ok());
    }

    #[test]
    fn zero_period_is_a_configuration_error() {
        let s = series(&[1.0, 2.0]);
        assert!(matches!(
            bollinger(&s, 0, 2.0),
            Err(RsiWatchError::Configuration { .. })
        ));
    }
}
