//! Orchestration progress port.
//!
//! [`OrchestrationProgress`] is an **output port** that the presentation
//! layer implements to show a run as it happens. All callback argument types
//! come from the domain layer.
//!
//! All methods have default no-op implementations, so implementers only
//! need to override the callbacks they care about.

use conductor_domain::{AgentTask, OrchestrationState, Plan, PlanResult, Step, StepResult, TaskWithResult};

pub trait OrchestrationProgress: Send + Sync {
    /// Called when the orchestrator enters a new state
    fn on_state_change(&self, _state: OrchestrationState) {}

    /// Called before each request to the planner
    fn on_planning_attempt(&self, _attempt: usize, _max_attempts: usize) {}

    /// Called when a planner reply is rejected or the request fails
    fn on_plan_rejected(&self, _attempt: usize, _reason: &str) {}

    /// Called once a full plan has been accepted
    fn on_plan_ready(&self, _plan: &Plan) {}

    /// Called when a step begins. `index` is 1-based; `total` is known in
    /// full-plan mode only.
    fn on_step_start(&self, _index: usize, _step: &Step, _total: Option<usize>) {}

    /// Called when a task is dispatched
    fn on_task_start(&self, _task: &AgentTask) {}

    /// Called when a task settles, successfully or not
    fn on_task_complete(&self, _task: &TaskWithResult, _success: bool) {}

    /// Called when a step's result has been appended
    fn on_step_complete(&self, _index: usize, _step_result: &StepResult) {}

    /// Called once when the run ends, on every path
    fn on_finished(&self, _state: OrchestrationState, _plan_result: &PlanResult) {}
}

/// No-op progress notifier
pub struct NoProgress;

impl OrchestrationProgress for NoProgress {}
