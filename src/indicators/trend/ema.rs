//! EMA (Exponential Moving Average) indicator

use crate::indicators::error::IndicatorError;
use crate::indicators::smoothing::{check_inputs, exponential_smoothing, span_alpha};

pub const DEFAULT_EMA_SPAN: usize = 9;

/// Calculate the EMA series for a span, seeded with the first sample
pub fn calculate_ema(series: &[f64], span: usize) -> Result<Vec<f64>, IndicatorError> {
    check_inputs("ema", series, &[("span", span)])?;
    Ok(exponential_smoothing(series, span_alpha(span)))
}
