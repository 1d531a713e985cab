//! Binance kline stream message types

use crate::models::candle::Candle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `<symbol>@kline_<interval>` stream payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KlineEvent {
    #[serde(rename = "e")]
    pub event_type: String,
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "k")]
    pub kline: Kline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Kline {
    /// Open time (ms)
    #[serde(rename = "t")]
    pub open_time: i64,
    #[serde(rename = "i")]
    pub interval: String,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "v")]
    pub volume: String,
    /// Whether this kline is closed
    #[serde(rename = "x")]
    pub closed: bool,
}

impl Kline {
    pub fn to_candle(&self) -> Result<Candle, String> {
        let timestamp = DateTime::<Utc>::from_timestamp_millis(self.open_time)
            .ok_or_else(|| format!("invalid open time {}", self.open_time))?;

        Ok(Candle::new(
            parse_decimal("open", &self.open)?,
            parse_decimal("high", &self.high)?,
            parse_decimal("low", &self.low)?,
            parse_decimal("close", &self.close)?,
            parse_decimal("volume", &self.volume)?,
            timestamp,
        ))
    }
}

fn parse_decimal(field: &str, raw: &str) -> Result<f64, String> {
    raw.parse::<f64>()
        .map_err(|_| format!("field '{}' is not numeric: '{}'", field, raw))
}
