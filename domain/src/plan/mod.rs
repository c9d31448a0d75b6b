//! Plan domain module
//!
//! Value types describing an objective's plan, its steps and tasks, and the
//! results accumulated while executing them.
//!
//! - [`entities`]: what the planner produces ([`Plan`], [`NextStep`], [`Step`], [`AgentTask`])
//! - [`results`]: what execution produces ([`TaskWithResult`], [`StepResult`], [`PlanResult`])
//! - [`parser`]: extraction of planner replies from raw text
//! - [`validation`]: schema and agent-reference checks at the planner boundary

pub mod entities;
pub mod mode;
pub mod parser;
pub mod results;
pub mod state;
pub mod validation;

pub use entities::{AgentTask, Described, NextStep, Plan, Step, Task};
pub use mode::PlanningMode;
pub use parser::{PlannerOutput, parse_next_step_reply, parse_plan_reply, parse_reply};
pub use results::{MAX_EXTENSIONS, PlanResult, StepResult, TaskWithResult};
pub use state::OrchestrationState;
pub use validation::{PlanValidationError, validate_next_step, validate_plan};
