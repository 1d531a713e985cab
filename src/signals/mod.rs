//! Signal detection and delivery.

pub mod detector;
pub mod sink;

pub use detector::SignalPolicy;
pub use sink::{ChannelSink, SignalSink, TracingSink};
