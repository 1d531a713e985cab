//! Unit tests for MACD indicator

use approx::assert_relative_eq;
use pinelite::indicators::momentum::{calculate_macd, calculate_macd_default};
use pinelite::indicators::IndicatorError;

const CLOSES: [f64; 15] = [
    100.0, 102.0, 105.0, 103.0, 106.0, 108.0, 110.0, 109.0, 112.0, 115.0, 113.0, 111.0, 114.0,
    117.0, 120.0,
];

#[test]
fn test_macd_default_values() {
    let macd = calculate_macd_default(&CLOSES).unwrap();

    assert_eq!(macd.macd.len(), CLOSES.len());
    assert_eq!(macd.signal.len(), CLOSES.len());
    assert_eq!(macd.histogram.len(), CLOSES.len());

    assert_relative_eq!(*macd.macd.last().unwrap(), 4.25898660112253, epsilon = 1e-9);
    assert_relative_eq!(*macd.signal.last().unwrap(), 3.0579617046469836, epsilon = 1e-9);
    assert_relative_eq!(*macd.histogram.last().unwrap(), 1.201024896475546, epsilon = 1e-9);
}

#[test]
fn test_macd_histogram_is_line_minus_signal() {
    let macd = calculate_macd(&CLOSES, 3, 7, 4).unwrap();
    for i in 0..CLOSES.len() {
        assert_eq!(macd.histogram[i], macd.macd[i] - macd.signal[i]);
    }
}

#[test]
fn test_macd_starts_at_zero() {
    // both EMAs are seeded with the first close
    let macd = calculate_macd_default(&CLOSES).unwrap();
    assert_eq!(macd.macd[0], 0.0);
    assert_eq!(macd.signal[0], 0.0);
    assert_eq!(macd.histogram[0], 0.0);
}

#[test]
fn test_macd_rejects_zero_spans() {
    for (fast, slow, signal) in [(0, 26, 9), (12, 0, 9), (12, 26, 0)] {
        let err = calculate_macd(&CLOSES, fast, slow, signal).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidParameter { .. }));
    }
}

#[test]
fn test_macd_rejects_short_series() {
    assert!(calculate_macd_default(&[1.0]).is_err());
}
