//! Plan entities produced by the planner.
//!
//! These are the shapes the planner collaborator must return. They are
//! created once per planning call and never mutated afterwards; execution
//! state accumulates in [`PlanResult`](super::results::PlanResult) instead.

use serde::{Deserialize, Serialize};

/// Anything that carries a human-readable description.
///
/// This is the common "task" shape shared by [`Task`], [`AgentTask`],
/// [`Step`] and [`TaskWithResult`](super::results::TaskWithResult).
pub trait Described {
    fn description(&self) -> &str;
}

/// An individual unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub description: String,
}

impl Task {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl Described for Task {
    fn description(&self) -> &str {
        &self.description
    }
}

/// A task assigned to a named agent collaborator.
///
/// `agent` must resolve against the agent registry; this is checked by
/// [`validate_plan`](super::validation::validate_plan) when the plan arrives
/// and again by the step executor at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTask {
    pub description: String,
    pub agent: String,
}

impl AgentTask {
    pub fn new(description: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            agent: agent.into(),
        }
    }
}

impl Described for AgentTask {
    fn description(&self) -> &str {
        &self.description
    }
}

/// A step of independent tasks that may run in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub description: String,
    #[serde(default)]
    pub tasks: Vec<AgentTask>,
}

impl Step {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: AgentTask) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = AgentTask>) -> Self {
        self.tasks.extend(tasks);
        self
    }
}

impl Described for Step {
    fn description(&self) -> &str {
        &self.description
    }
}

/// A complete plan: steps run sequentially, in order.
///
/// `is_complete` is the planner's own verdict on whether executing these
/// steps satisfies the objective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub is_complete: bool,
}

impl Plan {
    pub fn new(steps: Vec<Step>, is_complete: bool) -> Self {
        Self { steps, is_complete }
    }

    /// Total number of tasks across all steps.
    pub fn task_count(&self) -> usize {
        self.steps.iter().map(|s| s.tasks.len()).sum()
    }
}

/// A single step produced in iterative mode, plus the planner's verdict on
/// whether the objective is complete once this step has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    #[serde(flatten)]
    pub step: Step,
    pub is_complete: bool,
}

impl NextStep {
    pub fn new(step: Step, is_complete: bool) -> Self {
        Self { step, is_complete }
    }
}

impl Described for NextStep {
    fn description(&self) -> &str {
        &self.step.description
    }
}
