//! pinelite engine
//!
//! Runs one evaluation loop per configured symbol until Ctrl-C.

use dotenvy::dotenv;
use pinelite::config::{get_environment, EngineConfig};
use pinelite::core::{feeds_from_config, ExecutionSupervisor};
use pinelite::logging;
use pinelite::models::StrategyDefinition;
use pinelite::signals::TracingSink;
use pinelite::EngineError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

const DEFAULT_SYMBOL: &str = "BTCUSDT";
const DEFAULT_SCRIPT: &str = "my_rsi = ta.rsi(close, 14)";

fn load_strategies(
    config: &EngineConfig,
) -> Result<HashMap<String, StrategyDefinition>, EngineError> {
    match &config.strategies_file {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            let strategies: HashMap<String, StrategyDefinition> = serde_json::from_str(&raw)?;
            info!(path = %path, count = strategies.len(), "loaded strategies from file");
            Ok(strategies)
        }
        None => {
            info!(symbol = DEFAULT_SYMBOL, "STRATEGIES_FILE not set, using default strategy");
            Ok(HashMap::from([(
                DEFAULT_SYMBOL.to_string(),
                StrategyDefinition::from(DEFAULT_SCRIPT),
            )]))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    dotenv().ok();
    logging::init_logging();

    let config = EngineConfig::from_env()?;
    info!(
        environment = %get_environment(),
        feed_mode = ?config.feed_mode,
        interval_secs = config.evaluation_interval_seconds,
        "starting pinelite engine"
    );

    let strategies = load_strategies(&config)?;
    if strategies.is_empty() {
        warn!("no strategies configured, engine will idle");
    }

    let feeds = feeds_from_config(&config);
    let supervisor = ExecutionSupervisor::new(config, feeds, Arc::new(TracingSink));
    supervisor.start_all(strategies).await?;

    signal::ctrl_c().await?;
    info!("shutdown signal received");

    supervisor.stop_all().await?;
    info!("engine shut down cleanly");
    Ok(())
}
