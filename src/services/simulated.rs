//! Fixed-interval simulated feed replaying a configured price series.

use crate::models::candle::Candle;
use crate::services::market_data::{FeedError, FeedEvent, FeedFactory, MarketFeed};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};
use tracing::debug;

pub struct SimulatedFeedFactory {
    prices: Vec<f64>,
    period: Duration,
}

impl SimulatedFeedFactory {
    pub fn new(prices: Vec<f64>, period: Duration) -> Self {
        Self { prices, period }
    }
}

#[async_trait]
impl FeedFactory for SimulatedFeedFactory {
    async fn connect(&self, symbol: &str) -> Result<Box<dyn MarketFeed>, FeedError> {
        debug!(symbol = %symbol, samples = self.prices.len(), "starting simulated feed");
        Ok(Box::new(SimulatedFeed::new(self.prices.clone(), self.period)))
    }
}

/// Yields the whole price series as a snapshot on every tick.
/// The first tick completes immediately.
pub struct SimulatedFeed {
    prices: Vec<f64>,
    period: Duration,
    ticker: Interval,
}

impl SimulatedFeed {
    pub fn new(prices: Vec<f64>, period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            prices,
            period,
            ticker,
        }
    }

    fn snapshot(&self) -> Vec<Candle> {
        backdated_candles(&self.prices, self.period, Utc::now())
    }
}

/// Candles for `prices`, the last stamped `now` and each earlier one a
/// further `period` back. Offsets chrono cannot represent fall back to `now`.
pub fn backdated_candles(prices: &[f64], period: Duration, now: DateTime<Utc>) -> Vec<Candle> {
    let step = chrono::Duration::from_std(period).ok();
    let last = prices.len().saturating_sub(1);

    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let timestamp = step
                .and_then(|step| step.checked_mul(i32::try_from(last - i).ok()?))
                .and_then(|back| now.checked_sub_signed(back))
                .unwrap_or(now);
            Candle::from_close(close, timestamp)
        })
        .collect()
}

#[async_trait]
impl MarketFeed for SimulatedFeed {
    async fn next_event(&mut self) -> Result<FeedEvent, FeedError> {
        self.ticker.tick().await;
        Ok(FeedEvent::Snapshot(self.snapshot()))
    }
}
