use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalAction {
    Buy,
    Sell,
}

/// Trade signal emitted by a symbol's evaluation loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub action: SignalAction,
    /// The oscillator value that crossed the threshold
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}
