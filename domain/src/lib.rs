//! Domain layer for conductor
//!
//! This crate contains the plan model and the pure logic around it. It has no
//! dependencies on infrastructure or presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Plan, Step, Task
//!
//! An objective is broken into a [`Plan`] of sequential [`Step`]s. Each step
//! holds independent [`AgentTask`]s that run in parallel, each assigned to one
//! named agent.
//!
//! ## Planning modes
//!
//! - **Full** (default): the planner produces the whole plan once
//! - **Iterative**: the planner produces one [`NextStep`] at a time, seeing
//!   the results of every step before it
//!
//! ## Results
//!
//! Execution accumulates a [`PlanResult`]. The [`format`] module renders it
//! as text for people and as tagged markup for the planner.

pub mod agent;
pub mod config;
pub mod core;
pub mod format;
pub mod plan;
pub mod prompt;

// Re-export commonly used types
pub use agent::{AgentDescriptor, AgentLookup};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use format::{
    ExecutionHistory, format_plan_result_markup, format_plan_result_text,
    format_step_result_markup, format_step_result_text, format_task_result_markup,
    format_task_result_text, plan_status, summarize_step_results, summarize_task_results,
};
pub use plan::{
    AgentTask, Described, NextStep, OrchestrationState, Plan, PlanResult, PlanValidationError,
    PlannerOutput, PlanningMode, Step, StepResult, Task, TaskWithResult, parse_next_step_reply,
    parse_plan_reply, parse_reply, validate_next_step, validate_plan,
};
pub use prompt::PromptTemplate;
