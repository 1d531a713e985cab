//! Top-level error type for the binaries and library entry points

use crate::config::ConfigError;
use crate::core::supervisor::SupervisorStateError;
use crate::services::market_data::FeedError;
use crate::strategies::StrategyError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("supervisor error: {0}")]
    Supervisor(#[from] SupervisorStateError),

    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
