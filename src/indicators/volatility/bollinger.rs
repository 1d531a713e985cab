//! Bollinger Bands indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::smoothing::check_inputs;
use crate::indicators::trend::sma::mean;

pub const DEFAULT_BB_PERIOD: usize = 20;
pub const DEFAULT_BB_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Calculate Bollinger Bands
///
/// Middle Band = mean of the window
/// Upper Band = Middle + (multiplier * population standard deviation)
/// Lower Band = Middle - (multiplier * population standard deviation)
///
/// Until `period` samples exist the window is every sample so far; a window
/// of one sample (with `period > 1`) yields NaN.
pub fn calculate_bollinger_bands(
    series: &[f64],
    period: usize,
    multiplier: f64,
) -> Result<BollingerBands, IndicatorError> {
    check_inputs("bb", series, &[("period", period)])?;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(IndicatorError::invalid(
            "bb",
            format!("multiplier must be positive, got {}", multiplier),
        ));
    }

    let mut bands = BollingerBands {
        upper: Vec::with_capacity(series.len()),
        middle: Vec::with_capacity(series.len()),
        lower: Vec::with_capacity(series.len()),
    };

    for i in 0..series.len() {
        let window = &series[(i + 1).saturating_sub(period)..=i];
        if window.len() < period.min(2) {
            bands.upper.push(f64::NAN);
            bands.middle.push(f64::NAN);
            bands.lower.push(f64::NAN);
            continue;
        }

        let middle = mean(window);
        let variance = window
            .iter()
            .map(|value| {
                let diff = value - middle;
                diff * diff
            })
            .sum::<f64>()
            / window.len() as f64;
        let width = multiplier * variance.sqrt();

        bands.upper.push(middle + width);
        bands.middle.push(middle);
        bands.lower.push(middle - width);
    }

    Ok(bands)
}
