//! Signal sinks

use crate::models::signal::{SignalAction, SignalEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Receives signal events from the per-symbol loops.
pub trait SignalSink: Send + Sync {
    fn emit(&self, event: SignalEvent);
}

/// Logs every signal
#[derive(Debug, Default, Clone)]
pub struct TracingSink;

impl SignalSink for TracingSink {
    fn emit(&self, event: SignalEvent) {
        let label = match event.action {
            SignalAction::Buy => "BUY",
            SignalAction::Sell => "SELL",
        };
        info!(
            symbol = %event.symbol,
            action = ?event.action,
            value = event.value,
            "--- {} SIGNAL for {} ({:.2}) ---",
            label,
            event.symbol,
            event.value
        );
    }
}

/// Forwards signals over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<SignalEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl SignalSink for ChannelSink {
    fn emit(&self, event: SignalEvent) {
        if let Err(e) = self.sender.send(event) {
            warn!(symbol = %e.0.symbol, "signal receiver dropped, discarding event");
        }
    }
}
