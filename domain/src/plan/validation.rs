//! Validation of planner output against the plan schema and the agent registry.
//!
//! This is the only place planner output is checked. Everything downstream
//! of the planner client may assume descriptions are non-empty and every
//! task names a registered agent.

use thiserror::Error;

use super::entities::{NextStep, Plan, Step};
use crate::agent::AgentLookup;

/// Why a planner reply was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanValidationError {
    /// The reply was not structurally a plan (no JSON, wrong shape, empty fields).
    #[error("Invalid planner output: {0}")]
    Invalid(String),

    /// A task names an agent that is not registered.
    #[error("Step {step}, task {task}: unknown agent '{agent}'")]
    UnknownAgent {
        agent: String,
        step: usize,
        task: usize,
    },
}

impl PlanValidationError {
    pub fn is_unknown_agent(&self) -> bool {
        matches!(self, PlanValidationError::UnknownAgent { .. })
    }
}

/// Validate a full plan. Steps and tasks are numbered from 1 in messages.
pub fn validate_plan<L>(plan: &Plan, agents: &L) -> Result<(), PlanValidationError>
where
    L: AgentLookup + ?Sized,
{
    for (index, step) in plan.steps.iter().enumerate() {
        validate_step(step, index + 1, agents)?;
    }
    Ok(())
}

/// Validate a single iterative step.
pub fn validate_next_step<L>(next: &NextStep, agents: &L) -> Result<(), PlanValidationError>
where
    L: AgentLookup + ?Sized,
{
    validate_step(&next.step, 1, agents)
}

fn validate_step<L>(step: &Step, number: usize, agents: &L) -> Result<(), PlanValidationError>
where
    L: AgentLookup + ?Sized,
{
    if step.description.trim().is_empty() {
        return Err(PlanValidationError::Invalid(format!(
            "step {} has an empty description",
            number
        )));
    }

    for (index, task) in step.tasks.iter().enumerate() {
        if task.description.trim().is_empty() {
            return Err(PlanValidationError::Invalid(format!(
                "step {}, task {} has an empty description",
                number,
                index + 1
            )));
        }
        if !agents.has_agent(&task.agent) {
            return Err(PlanValidationError::UnknownAgent {
                agent: task.agent.clone(),
                step: number,
                task: index + 1,
            });
        }
    }

    Ok(())
}
