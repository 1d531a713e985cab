//! Environment-driven engine configuration

use crate::signals::detector::SignalPolicy;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Close prices replayed by the simulated feed when none are configured.
pub const DEFAULT_SIMULATION_PRICES: [f64; 15] = [
    100.0, 102.0, 105.0, 103.0, 106.0, 108.0, 110.0, 109.0, 112.0, 115.0, 113.0, 111.0, 114.0,
    117.0, 120.0,
];

pub const DEFAULT_FEED_URL: &str = "wss://stream.binance.com:9443/ws";

/// One day
pub const MAX_EVAL_INTERVAL_SECONDS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: String,
    pub value: String,
    pub reason: String,
}

/// Current deployment environment (`APP_ENV`, defaults to `sandbox`)
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Replay fixed prices on a timer
    Simulated,
    /// Exchange kline stream
    Live,
}

impl FromStr for FeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simulated" | "simulation" => Ok(FeedMode::Simulated),
            "live" => Ok(FeedMode::Live),
            other => Err(format!("unknown feed mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub feed_mode: FeedMode,
    pub evaluation_interval_seconds: u64,
    pub simulation_prices: Vec<f64>,
    pub feed_url: String,
    pub kline_interval: String,
    pub history_limit: usize,
    pub connect_retries: usize,
    pub signal: SignalPolicy,
    pub strategies_file: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feed_mode: FeedMode::Simulated,
            evaluation_interval_seconds: 5,
            simulation_prices: DEFAULT_SIMULATION_PRICES.to_vec(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            kline_interval: "1m".to_string(),
            history_limit: 500,
            connect_retries: 3,
            signal: SignalPolicy::default(),
            strategies_file: None,
        }
    }
}

impl EngineConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let evaluation_interval_seconds =
            parse_or(&lookup, "EVAL_INTERVAL_SECONDS", defaults.evaluation_interval_seconds)?;
        if evaluation_interval_seconds == 0 {
            return Err(invalid("EVAL_INTERVAL_SECONDS", "0", "must be greater than 0"));
        }
        if evaluation_interval_seconds > MAX_EVAL_INTERVAL_SECONDS {
            return Err(invalid(
                "EVAL_INTERVAL_SECONDS",
                &evaluation_interval_seconds.to_string(),
                &format!("must be at most {}", MAX_EVAL_INTERVAL_SECONDS),
            ));
        }

        let history_limit = parse_or(&lookup, "HISTORY_LIMIT", defaults.history_limit)?;
        if history_limit < 2 {
            return Err(invalid(
                "HISTORY_LIMIT",
                &history_limit.to_string(),
                "must keep at least 2 samples",
            ));
        }

        let simulation_prices = match lookup("SIMULATION_PRICES") {
            Some(raw) => parse_prices(&raw)?,
            None => defaults.simulation_prices,
        };

        let signal = SignalPolicy {
            source: lookup("SIGNAL_SOURCE").unwrap_or(defaults.signal.source),
            lower: parse_or(&lookup, "SIGNAL_LOWER", defaults.signal.lower)?,
            upper: parse_or(&lookup, "SIGNAL_UPPER", defaults.signal.upper)?,
        };
        if signal.lower >= signal.upper {
            return Err(invalid(
                "SIGNAL_UPPER",
                &signal.upper.to_string(),
                "must be greater than SIGNAL_LOWER",
            ));
        }

        Ok(Self {
            feed_mode: parse_or(&lookup, "FEED_MODE", defaults.feed_mode)?,
            evaluation_interval_seconds,
            simulation_prices,
            feed_url: lookup("FEED_URL").unwrap_or(defaults.feed_url),
            kline_interval: lookup("KLINE_INTERVAL").unwrap_or(defaults.kline_interval),
            history_limit,
            connect_retries: parse_or(&lookup, "FEED_CONNECT_RETRIES", defaults.connect_retries)?,
            signal,
            strategies_file: lookup("STRATEGIES_FILE"),
        })
    }

    pub fn evaluation_interval(&self) -> Duration {
        Duration::from_secs(self.evaluation_interval_seconds)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| invalid(key, &raw, &e.to_string())),
        None => Ok(default),
    }
}

fn parse_prices(raw: &str) -> Result<Vec<f64>, ConfigError> {
    let prices = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid("SIMULATION_PRICES", raw, &e.to_string()))?;

    if prices.len() < 2 {
        return Err(invalid("SIMULATION_PRICES", raw, "needs at least 2 prices"));
    }
    Ok(prices)
}

fn invalid(key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
