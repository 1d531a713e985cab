//! Shared data models spanning the engine layers.

pub mod candle;
pub mod context;
pub mod script;
pub mod signal;
pub mod strategy;
pub mod value;

pub use candle::Candle;
pub use context::{KindConflict, MarketContext};
pub use script::{Comparison, ConditionStatement, IndicatorStatement, ParsedScript};
pub use signal::{SignalAction, SignalEvent};
pub use strategy::{ConditionInput, StrategyDefinition, StructuredCondition, StructuredStrategy};
pub use value::{Argument, Value, ValueKind};
