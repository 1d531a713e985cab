//! Execution supervisor: one evaluation loop per symbol with global start/stop.

use super::runner::SymbolLoop;
use crate::config::{EngineConfig, FeedMode};
use crate::indicators::registry::IndicatorRegistry;
use crate::models::strategy::StrategyDefinition;
use crate::script::interpreter::Interpreter;
use crate::services::binance::BinanceFeedFactory;
use crate::services::market_data::FeedFactory;
use crate::services::simulated::SimulatedFeedFactory;
use crate::signals::sink::SignalSink;
use crate::strategies::{CompiledStrategy, StrategyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SupervisorStateError {
    #[error("engine is already running")]
    AlreadyRunning,

    #[error("engine is not running")]
    NotRunning,

    #[error("no loop running for symbol '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error("strategy for '{symbol}' rejected: {source}")]
    InvalidStrategy {
        symbol: String,
        source: StrategyError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub is_running: bool,
}

struct SymbolTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl SymbolTask {
    async fn stop(self, symbol: &str) {
        // a loop that already exited has dropped its receiver
        let _ = self.shutdown.send(true);
        if let Err(e) = self.handle.await {
            error!(symbol = %symbol, error = %e, "evaluation loop panicked");
        }
    }
}

#[derive(Default)]
struct EngineState {
    is_running: bool,
    tasks: HashMap<String, SymbolTask>,
}

impl EngineState {
    /// Drop registry entries whose loop ended on its own.
    fn reap_finished(&mut self) {
        self.tasks.retain(|symbol, task| {
            let alive = !task.handle.is_finished();
            if !alive {
                debug!(symbol = %symbol, "reaping finished evaluation loop");
            }
            alive
        });
    }
}

/// Build the feed factory selected by `FEED_MODE`.
pub fn feeds_from_config(config: &EngineConfig) -> Arc<dyn FeedFactory> {
    match config.feed_mode {
        FeedMode::Simulated => Arc::new(SimulatedFeedFactory::new(
            config.simulation_prices.clone(),
            config.evaluation_interval(),
        )),
        FeedMode::Live => Arc::new(BinanceFeedFactory::new(
            config.feed_url.clone(),
            config.kline_interval.clone(),
            config.connect_retries,
        )),
    }
}

pub struct ExecutionSupervisor {
    config: EngineConfig,
    interpreter: Interpreter,
    feeds: Arc<dyn FeedFactory>,
    sink: Arc<dyn SignalSink>,
    state: Mutex<EngineState>,
}

impl ExecutionSupervisor {
    pub fn new(config: EngineConfig, feeds: Arc<dyn FeedFactory>, sink: Arc<dyn SignalSink>) -> Self {
        Self::with_registry(config, feeds, sink, Arc::new(IndicatorRegistry::builtin()))
    }

    pub fn with_registry(
        config: EngineConfig,
        feeds: Arc<dyn FeedFactory>,
        sink: Arc<dyn SignalSink>,
        registry: Arc<IndicatorRegistry>,
    ) -> Self {
        Self {
            config,
            interpreter: Interpreter::new(registry),
            feeds,
            sink,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Start one loop per strategy. Strategies that fail to compile are
    /// logged and skipped; returns how many loops were started.
    pub async fn start_all(
        &self,
        strategies: HashMap<String, StrategyDefinition>,
    ) -> Result<usize, SupervisorStateError> {
        let mut state = self.state.lock().await;
        if state.is_running {
            warn!("start requested while engine is already running");
            return Err(SupervisorStateError::AlreadyRunning);
        }
        state.is_running = true;

        let mut started = 0;
        for (symbol, definition) in &strategies {
            match self.spawn_locked(&mut state, symbol, definition) {
                Ok(true) => started += 1,
                Ok(false) => {}
                Err(e) => error!(symbol = %symbol, error = %e, "skipping symbol"),
            }
        }

        info!(
            requested = strategies.len(),
            started = started,
            "engine started with {} evaluation loops",
            started
        );
        Ok(started)
    }

    /// Signal every loop to stop and wait for each to finish.
    pub async fn stop_all(&self) -> Result<usize, SupervisorStateError> {
        let mut state = self.state.lock().await;
        if !state.is_running {
            warn!("stop requested while engine is not running");
            return Err(SupervisorStateError::NotRunning);
        }
        state.is_running = false;

        let tasks: Vec<(String, SymbolTask)> = state.tasks.drain().collect();
        let stopped = tasks.len();
        for (_, task) in &tasks {
            let _ = task.shutdown.send(true);
        }
        for (symbol, task) in tasks {
            task.stop(&symbol).await;
        }

        info!(stopped = stopped, "engine stopped");
        Ok(stopped)
    }

    /// Start a loop for one symbol on a running engine. Returns `false` when
    /// the symbol already has a loop.
    pub async fn start_symbol(
        &self,
        symbol: &str,
        definition: &StrategyDefinition,
    ) -> Result<bool, SupervisorStateError> {
        let mut state = self.state.lock().await;
        if !state.is_running {
            return Err(SupervisorStateError::NotRunning);
        }
        state.reap_finished();
        self.spawn_locked(&mut state, symbol, definition)
    }

    /// Stop one symbol's loop; the engine stays running.
    pub async fn stop_symbol(&self, symbol: &str) -> Result<(), SupervisorStateError> {
        let mut state = self.state.lock().await;
        let task = state
            .tasks
            .remove(symbol)
            .ok_or_else(|| SupervisorStateError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?;
        task.stop(symbol).await;
        info!(symbol = %symbol, "evaluation loop stopped on request");
        Ok(())
    }

    pub async fn status(&self) -> EngineStatus {
        EngineStatus {
            is_running: self.state.lock().await.is_running,
        }
    }

    /// Symbols with a live loop, sorted
    pub async fn active_symbols(&self) -> Vec<String> {
        let mut state = self.state.lock().await;
        state.reap_finished();
        let mut symbols: Vec<String> = state.tasks.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    fn spawn_locked(
        &self,
        state: &mut EngineState,
        symbol: &str,
        definition: &StrategyDefinition,
    ) -> Result<bool, SupervisorStateError> {
        if state.tasks.contains_key(symbol) {
            debug!(symbol = %symbol, "loop already running, not starting another");
            return Ok(false);
        }

        let strategy = CompiledStrategy::compile(definition, self.interpreter.registry())
            .map_err(|source| SupervisorStateError::InvalidStrategy {
                symbol: symbol.to_string(),
                source,
            })?;

        for diagnostic in self.interpreter.registry().validate(&strategy.script) {
            warn!(symbol = %symbol, diagnostic = %diagnostic, "strategy statement will be skipped");
        }

        let policy = match &strategy.signal_source {
            Some(source) => self.config.signal.clone().with_source(source.clone()),
            None => self.config.signal.clone(),
        };

        let runner = SymbolLoop {
            symbol: symbol.to_string(),
            strategy,
            interpreter: self.interpreter.clone(),
            policy,
            history_limit: self.config.history_limit,
            feeds: self.feeds.clone(),
            sink: self.sink.clone(),
        };

        let (shutdown, receiver) = watch::channel(false);
        let handle = tokio::spawn(runner.run(receiver));
        state
            .tasks
            .insert(symbol.to_string(), SymbolTask { shutdown, handle });

        debug!(symbol = %symbol, "evaluation loop spawned");
        Ok(true)
    }
}
