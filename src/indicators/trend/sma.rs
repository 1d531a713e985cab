//! SMA (Simple Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::smoothing::check_inputs;

pub const DEFAULT_SMA_PERIOD: usize = 20;

/// Rolling mean over `period` samples. Positions before the first full
/// window are NaN so the output stays aligned with the input.
pub fn calculate_sma(series: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_inputs("sma", series, &[("period", period)])?;

    Ok((0..series.len())
        .map(|i| {
            if i + 1 < period {
                f64::NAN
            } else {
                mean(&series[i + 1 - period..=i])
            }
        })
        .collect())
}

pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
