//! Live kline feed over a Binance-style WebSocket stream

use super::messages::KlineEvent;
use crate::services::market_data::{FeedError, FeedEvent, FeedFactory, MarketFeed};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct BinanceFeedFactory {
    base_url: String,
    interval: String,
    connect_retries: usize,
}

impl BinanceFeedFactory {
    pub fn new(base_url: impl Into<String>, interval: impl Into<String>, connect_retries: usize) -> Self {
        Self {
            base_url: base_url.into(),
            interval: interval.into(),
            connect_retries,
        }
    }

    /// `{base}/{symbol}@kline_{interval}`, symbol lowercased with `/` removed
    pub fn stream_url(&self, symbol: &str) -> Result<Url, FeedError> {
        let stream = symbol.to_lowercase().replace('/', "");
        let raw = format!(
            "{}/{}@kline_{}",
            self.base_url.trim_end_matches('/'),
            stream,
            self.interval
        );
        Url::parse(&raw).map_err(|e| FeedError::Connect {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl FeedFactory for BinanceFeedFactory {
    async fn connect(&self, symbol: &str) -> Result<Box<dyn MarketFeed>, FeedError> {
        let url = self.stream_url(symbol)?;
        let target = url.as_str();

        let (stream, _) = (|| async move { connect_async(target).await })
            .retry(ExponentialBuilder::default().with_max_times(self.connect_retries))
            .sleep(tokio::time::sleep)
            .notify(|err, delay: Duration| {
                warn!(
                    symbol = %symbol,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "feed connect failed, retrying"
                );
            })
            .await
            .map_err(|e| FeedError::Connect {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        info!(symbol = %symbol, url = %url, "connected to kline feed");
        Ok(Box::new(BinanceFeed {
            symbol: symbol.to_string(),
            stream,
        }))
    }
}

pub struct BinanceFeed {
    symbol: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl BinanceFeed {
    fn malformed(&self, reason: impl Into<String>) -> FeedError {
        FeedError::Malformed {
            symbol: self.symbol.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl MarketFeed for BinanceFeed {
    async fn next_event(&mut self) -> Result<FeedEvent, FeedError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    let event: KlineEvent =
                        serde_json::from_str(&text).map_err(|e| self.malformed(e.to_string()))?;
                    let candle = event
                        .kline
                        .to_candle()
                        .map_err(|reason| self.malformed(reason))?;
                    debug!(
                        symbol = %self.symbol,
                        close = candle.close,
                        closed = event.kline.closed,
                        "kline update"
                    );
                    return Ok(FeedEvent::Candle(candle));
                }
                Some(Ok(Message::Binary(_))) => {
                    return Err(self.malformed("unexpected binary frame"));
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    return Err(FeedError::Disconnected {
                        symbol: self.symbol.clone(),
                    });
                }
                Some(Err(e)) => {
                    return Err(FeedError::Transport {
                        symbol: self.symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn close(&mut self) {
        match tokio::time::timeout(CLOSE_TIMEOUT, self.stream.close(None)).await {
            Ok(Ok(())) => debug!(symbol = %self.symbol, "feed connection closed"),
            Ok(Err(e)) => debug!(symbol = %self.symbol, error = %e, "feed close failed"),
            Err(_) => debug!(symbol = %self.symbol, "feed close timed out"),
        }
    }
}
