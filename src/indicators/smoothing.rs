//! Recursive exponential smoothing shared by the EMA, RSI and MACD.

use crate::indicators::error::IndicatorError;

/// `out[t] = alpha * raw[t] + (1 - alpha) * out[t - 1]`, seeded with `raw[0]`.
pub fn exponential_smoothing(raw: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(raw.len());
    let mut prev = match raw.first() {
        Some(&first) => first,
        None => return out,
    };
    out.push(prev);

    for &value in &raw[1..] {
        prev = alpha * value + (1.0 - alpha) * prev;
        out.push(prev);
    }

    out
}

/// Smoothing factor for a span: `2 / (span + 1)`
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Reject periods of zero and inputs too short to carry a delta.
pub fn check_inputs(
    indicator: &str,
    series: &[f64],
    periods: &[(&str, usize)],
) -> Result<(), IndicatorError> {
    if series.len() < 2 {
        return Err(IndicatorError::invalid(
            indicator,
            format!("input series needs at least 2 samples, got {}", series.len()),
        ));
    }

    for (name, period) in periods {
        if *period == 0 {
            return Err(IndicatorError::invalid(
                indicator,
                format!("{} must be positive", name),
            ));
        }
    }

    Ok(())
}
