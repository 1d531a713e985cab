//! One symbol's evaluation loop

use crate::models::candle::Candle;
use crate::models::context::MarketContext;
use crate::models::signal::SignalEvent;
use crate::script::interpreter::Interpreter;
use crate::services::market_data::{FeedEvent, FeedFactory, MarketFeed};
use crate::signals::detector::SignalPolicy;
use crate::signals::sink::SignalSink;
use crate::strategies::CompiledStrategy;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Minimum candles before a pass is attempted
pub const MIN_HISTORY: usize = 2;

/// Bounded candle history for one symbol.
#[derive(Debug, Clone)]
pub struct CandleHistory {
    candles: VecDeque<Candle>,
    limit: usize,
}

impl CandleHistory {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(MIN_HISTORY);
        Self {
            candles: VecDeque::with_capacity(limit),
            limit,
        }
    }

    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Snapshot(candles) => {
                self.candles.clear();
                let skip = candles.len().saturating_sub(self.limit);
                self.candles.extend(candles.into_iter().skip(skip));
            }
            FeedEvent::Candle(candle) => {
                match self.candles.back_mut() {
                    // in-progress update of the current kline
                    Some(last) if last.timestamp == candle.timestamp => *last = candle,
                    _ => {
                        if self.candles.len() == self.limit {
                            self.candles.pop_front();
                        }
                        self.candles.push_back(candle);
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn is_ready(&self) -> bool {
        self.candles.len() >= MIN_HISTORY
    }

    pub fn candles(&self) -> impl Iterator<Item = &Candle> {
        self.candles.iter()
    }
}

pub(crate) struct SymbolLoop {
    pub symbol: String,
    pub strategy: CompiledStrategy,
    pub interpreter: Interpreter,
    pub policy: SignalPolicy,
    pub history_limit: usize,
    pub feeds: Arc<dyn FeedFactory>,
    pub sink: Arc<dyn SignalSink>,
}

impl SymbolLoop {
    /// Runs until `shutdown` flips (or its sender is dropped) or the feed fails.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let symbol = self.symbol.clone();

        let connected = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                debug!(symbol = %symbol, "stopped before feed connected");
                return;
            }
            result = self.feeds.connect(&symbol) => result,
        };

        let mut feed = match connected {
            Ok(feed) => feed,
            Err(e) => {
                error!(symbol = %symbol, error = %e, "feed connection failed, loop terminated");
                return;
            }
        };

        info!(symbol = %symbol, "evaluation loop started");
        let mut history = CandleHistory::new(self.history_limit);

        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                event = feed.next_event() => event,
            };

            match event {
                Ok(event) => {
                    history.apply(event);
                    if history.is_ready() {
                        self.evaluate_pass(&history);
                    } else {
                        debug!(symbol = %symbol, samples = history.len(), "waiting for more history");
                    }
                }
                Err(e) => {
                    error!(symbol = %symbol, error = %e, "feed failed, loop terminated");
                    break;
                }
            }
        }

        close_feed(feed.as_mut(), &symbol).await;
        info!(symbol = %symbol, "evaluation loop stopped");
    }

    fn evaluate_pass(&self, history: &CandleHistory) {
        let mut context = self
            .strategy
            .prepare_context(MarketContext::from_candles(history.candles()));
        let evaluation = self.interpreter.evaluate(&self.strategy.script, &mut context);

        debug!(
            symbol = %self.symbol,
            samples = history.len(),
            conditions = ?evaluation.conditions,
            skipped = evaluation.diagnostics.len(),
            "evaluation pass complete"
        );

        match self.policy.detect(&context) {
            Some((action, value)) => self.sink.emit(SignalEvent {
                symbol: self.symbol.clone(),
                action,
                value,
                timestamp: Utc::now(),
            }),
            None if !context.contains(&self.policy.source) => {
                warn!(
                    symbol = %self.symbol,
                    source = %self.policy.source,
                    "signal source not produced by strategy"
                );
            }
            None => {}
        }
    }
}

async fn close_feed(feed: &mut dyn MarketFeed, symbol: &str) {
    feed.close().await;
    debug!(symbol = %symbol, "feed released");
}
