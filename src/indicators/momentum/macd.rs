//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::smoothing::{check_inputs, exponential_smoothing, span_alpha};

pub const DEFAULT_FAST_PERIOD: usize = 12;
pub const DEFAULT_SLOW_PERIOD: usize = 26;
pub const DEFAULT_SIGNAL_PERIOD: usize = 9;

/// The three MACD output series, aligned to the input axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    series: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MacdSeries, IndicatorError> {
    check_inputs(
        "macd",
        series,
        &[
            ("fast", fast_period),
            ("slow", slow_period),
            ("signal", signal_period),
        ],
    )?;

    let fast_ema = exponential_smoothing(series, span_alpha(fast_period));
    let slow_ema = exponential_smoothing(series, span_alpha(slow_period));

    let macd: Vec<f64> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(fast, slow)| fast - slow)
        .collect();
    let signal = exponential_smoothing(&macd, span_alpha(signal_period));
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    Ok(MacdSeries {
        macd,
        signal,
        histogram,
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(series: &[f64]) -> Result<MacdSeries, IndicatorError> {
    calculate_macd(
        series,
        DEFAULT_FAST_PERIOD,
        DEFAULT_SLOW_PERIOD,
        DEFAULT_SIGNAL_PERIOD,
    )
}
