//! Binance public kline stream

pub mod feed;
pub mod messages;

pub use feed::{BinanceFeed, BinanceFeedFactory};
pub use messages::{Kline, KlineEvent};
