//! RSI (Relative Strength Index) indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::smoothing::{check_inputs, exponential_smoothing};

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Calculate RSI over the whole series
///
/// Gains and losses are smoothed with Wilder's factor `1 / period`.
/// RSI = 100 - (100 / (1 + RS)), RS = smoothed gain / smoothed loss.
/// The first sample has no prior close, so its delta counts as zero.
/// A zero smoothed loss saturates the oscillator at 100.
pub fn calculate_rsi(series: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    check_inputs("rsi", series, &[("period", period)])?;

    let mut gains = Vec::with_capacity(series.len());
    let mut losses = Vec::with_capacity(series.len());
    gains.push(0.0);
    losses.push(0.0);

    for pair in series.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = exponential_smoothing(&gains, alpha);
    let avg_loss = exponential_smoothing(&losses, alpha);

    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&gain, &loss)| {
            if loss == 0.0 {
                100.0
            } else {
                let rs = gain / loss;
                100.0 - (100.0 / (1.0 + rs))
            }
        })
        .collect())
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(series: &[f64]) -> Result<Vec<f64>, IndicatorError> {
    calculate_rsi(series, DEFAULT_RSI_PERIOD)
}
