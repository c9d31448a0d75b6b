//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: command-backed planners and agents, the
//! playback planner, the JSONL run log, and configuration file loading.

pub mod agents;
pub mod config;
pub mod logging;
pub mod planner;
pub mod process;

// Re-export commonly used types
pub use agents::{CommandAgent, EchoAgent};
pub use config::{
    ConfigLoader, ConfigSources, FileAgentConfig, FileAgentKind, FileConfig, FileLoggingConfig,
    FileOrchestratorConfig, FileOutputConfig, FilePlannerConfig,
};
pub use logging::JsonlRunLogger;
pub use planner::{CommandPlanner, PLAYBACK_SEPARATOR, PlaybackPlanner};
pub use process::{CommandSpec, ProcessError};
