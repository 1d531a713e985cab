//! Strategy definitions compiled into evaluable scripts.

pub mod compiler;

pub use compiler::{compile_condition, CompiledStrategy, StrategyError, CONDITION_OUTPUT};
