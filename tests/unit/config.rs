//! Unit tests for environment configuration

use pinelite::config::{
    EngineConfig, FeedMode, DEFAULT_FEED_URL, DEFAULT_SIMULATION_PRICES, MAX_EVAL_INTERVAL_SECONDS,
};
use std::collections::HashMap;
use std::time::Duration;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<EngineConfig, pinelite::config::ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EngineConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = from_pairs(&[]).unwrap();

    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.feed_mode, FeedMode::Simulated);
    assert_eq!(config.evaluation_interval(), Duration::from_secs(5));
    assert_eq!(config.simulation_prices, DEFAULT_SIMULATION_PRICES.to_vec());
    assert_eq!(config.feed_url, DEFAULT_FEED_URL);
    assert_eq!(config.history_limit, 500);
    assert_eq!(config.signal.source, "my_rsi");
    assert!(config.strategies_file.is_none());
}

#[test]
fn test_overrides() {
    let config = from_pairs(&[
        ("FEED_MODE", "Live"),
        ("EVAL_INTERVAL_SECONDS", "30"),
        ("SIMULATION_PRICES", "1, 2.5,3"),
        ("KLINE_INTERVAL", "5m"),
        ("HISTORY_LIMIT", "50"),
        ("FEED_CONNECT_RETRIES", "0"),
        ("SIGNAL_SOURCE", "input_0"),
        ("SIGNAL_LOWER", "20"),
        ("SIGNAL_UPPER", "80"),
        ("STRATEGIES_FILE", "strategies.json"),
    ])
    .unwrap();

    assert_eq!(config.feed_mode, FeedMode::Live);
    assert_eq!(config.evaluation_interval_seconds, 30);
    assert_eq!(config.simulation_prices, vec![1.0, 2.5, 3.0]);
    assert_eq!(config.kline_interval, "5m");
    assert_eq!(config.history_limit, 50);
    assert_eq!(config.connect_retries, 0);
    assert_eq!(config.signal.source, "input_0");
    assert_eq!((config.signal.lower, config.signal.upper), (20.0, 80.0));
    assert_eq!(config.strategies_file.as_deref(), Some("strategies.json"));
}

#[test]
fn test_rejects_invalid_values() {
    for pairs in [
        vec![("EVAL_INTERVAL_SECONDS", "0")],
        vec![("EVAL_INTERVAL_SECONDS", "soon")],
        vec![("EVAL_INTERVAL_SECONDS", "86401")],
        vec![("EVAL_INTERVAL_SECONDS", "10000000000000")],
        vec![("HISTORY_LIMIT", "1")],
        vec![("SIMULATION_PRICES", "100")],
        vec![("SIMULATION_PRICES", "100,abc")],
        vec![("FEED_MODE", "replay")],
        vec![("SIGNAL_LOWER", "70"), ("SIGNAL_UPPER", "30")],
    ] {
        assert!(from_pairs(&pairs).is_err(), "expected error for {:?}", pairs);
    }
}

#[test]
fn test_error_names_the_key() {
    let err = from_pairs(&[("HISTORY_LIMIT", "many")]).unwrap_err();
    assert_eq!(err.key, "HISTORY_LIMIT");
    assert_eq!(err.value, "many");
}

#[test]
fn test_interval_cap_is_inclusive() {
    let config = from_pairs(&[("EVAL_INTERVAL_SECONDS", "86400")]).unwrap();
    assert_eq!(config.evaluation_interval_seconds, MAX_EVAL_INTERVAL_SECONDS);

    let err = from_pairs(&[("EVAL_INTERVAL_SECONDS", "86401")]).unwrap_err();
    assert_eq!(err.key, "EVAL_INTERVAL_SECONDS");
}
