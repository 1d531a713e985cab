//! Unit tests for per-symbol candle history

use chrono::{Duration, TimeZone, Utc};
use pinelite::core::CandleHistory;
use pinelite::models::Candle;
use pinelite::services::FeedEvent;

fn candle(minute: i64, close: f64) -> Candle {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Candle::from_close(close, base + Duration::minutes(minute))
}

fn closes(history: &CandleHistory) -> Vec<f64> {
    history.candles().map(|c| c.close).collect()
}

#[test]
fn test_history_needs_two_candles() {
    let mut history = CandleHistory::new(10);
    assert!(history.is_empty());

    history.apply(FeedEvent::Candle(candle(0, 1.0)));
    assert!(!history.is_ready());

    history.apply(FeedEvent::Candle(candle(1, 2.0)));
    assert!(history.is_ready());
}

#[test]
fn test_same_open_time_replaces_last_candle() {
    let mut history = CandleHistory::new(10);
    history.apply(FeedEvent::Candle(candle(0, 1.0)));
    history.apply(FeedEvent::Candle(candle(1, 2.0)));
    history.apply(FeedEvent::Candle(candle(1, 2.5)));

    assert_eq!(closes(&history), vec![1.0, 2.5]);
}

#[test]
fn test_history_is_bounded() {
    let mut history = CandleHistory::new(3);
    for minute in 0..5 {
        history.apply(FeedEvent::Candle(candle(minute, minute as f64)));
    }
    assert_eq!(closes(&history), vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_snapshot_replaces_history() {
    let mut history = CandleHistory::new(3);
    history.apply(FeedEvent::Candle(candle(0, 99.0)));

    let snapshot = (0..5).map(|m| candle(m, 10.0 + m as f64)).collect();
    history.apply(FeedEvent::Snapshot(snapshot));

    assert_eq!(closes(&history), vec![12.0, 13.0, 14.0]);
}
