//! pinelite: a small strategy-script engine.
//!
//! Scripts are parsed into indicator and condition statements, evaluated
//! against a market context, and run continuously per instrument by the
//! execution supervisor.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod script;
pub mod services;
pub mod signals;
pub mod strategies;

pub use error::EngineError;
