//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent_executor;
pub mod planner_gateway;
pub mod progress;
pub mod run_logger;
pub mod synthesizer;
