//! Market data providers

pub mod binance;
pub mod market_data;
pub mod simulated;

pub use binance::BinanceFeedFactory;
pub use market_data::{FeedError, FeedEvent, FeedFactory, MarketFeed};
pub use simulated::{backdated_candles, SimulatedFeed, SimulatedFeedFactory};
