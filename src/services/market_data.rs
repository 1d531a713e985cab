//! Market data feed interface consumed by the per-symbol loops.

use crate::models::candle::Candle;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedError {
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("{symbol}: feed disconnected")]
    Disconnected { symbol: String },

    #[error("{symbol}: malformed message: {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("{symbol}: transport error: {reason}")]
    Transport { symbol: String, reason: String },
}

/// What a feed delivers on each wake-up
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Full price history replacing whatever was accumulated
    Snapshot(Vec<Candle>),
    /// One incremental candle; a candle with the same open time as the
    /// latest one is an in-progress update of it
    Candle(Candle),
}

/// A connected stream of market data for one symbol.
///
/// `next_event` is the loop's suspension point and must be cancel-safe.
#[async_trait]
pub trait MarketFeed: Send {
    async fn next_event(&mut self) -> Result<FeedEvent, FeedError>;

    /// Release the underlying connection
    async fn close(&mut self) {}
}

/// Opens feeds per symbol
#[async_trait]
pub trait FeedFactory: Send + Sync {
    async fn connect(&self, symbol: &str) -> Result<Box<dyn MarketFeed>, FeedError>;
}
