//! Execution supervisor and the per-symbol evaluation loops it owns

pub mod runner;
pub mod supervisor;

pub use runner::CandleHistory;
pub use supervisor::{feeds_from_config, EngineStatus, ExecutionSupervisor, SupervisorStateError};
