//! Application layer for conductor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    agent_executor::{AgentError, AgentExecutor},
    planner_gateway::{PlannerGateway, PlannerGatewayError, PlanningRequest},
    progress::{NoProgress, OrchestrationProgress},
    run_logger::{NoRunLogger, RunEvent, RunLogger},
    synthesizer::{SynthesisError, Synthesizer},
};
pub use registry::{AgentRegistry, RegistryError};
pub use use_cases::execute_step::{StepExecutionError, StepExecutor, task_failure_text};
pub use use_cases::orchestrate::{OrchestrationError, OrchestrationOutcome, Orchestrator};
pub use use_cases::plan_client::{PlannerClient, PlanningError};
pub use use_cases::synthesize::AgentSynthesizer;
