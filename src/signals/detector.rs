//! Oscillator threshold signals

use crate::models::context::MarketContext;
use crate::models::signal::SignalAction;

pub const DEFAULT_SIGNAL_SOURCE: &str = "my_rsi";
pub const DEFAULT_LOWER_THRESHOLD: f64 = 30.0;
pub const DEFAULT_UPPER_THRESHOLD: f64 = 70.0;

/// Watches one context value: below `lower` buys, above `upper` sells.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPolicy {
    pub source: String,
    pub lower: f64,
    pub upper: f64,
}

impl Default for SignalPolicy {
    fn default() -> Self {
        Self {
            source: DEFAULT_SIGNAL_SOURCE.to_string(),
            lower: DEFAULT_LOWER_THRESHOLD,
            upper: DEFAULT_UPPER_THRESHOLD,
        }
    }
}

impl SignalPolicy {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn classify(&self, value: f64) -> Option<SignalAction> {
        if value.is_nan() {
            None
        } else if value < self.lower {
            Some(SignalAction::Buy)
        } else if value > self.upper {
            Some(SignalAction::Sell)
        } else {
            None
        }
    }

    /// Inspect the evaluated context; returns the action and the value seen.
    pub fn detect(&self, context: &MarketContext) -> Option<(SignalAction, f64)> {
        let value = context.latest(&self.source)?;
        self.classify(value).map(|action| (action, value))
    }
}
