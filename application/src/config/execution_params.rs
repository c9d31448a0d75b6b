//! Execution parameters: orchestration loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control
//! [`Orchestrator`](crate::use_cases::orchestrate::Orchestrator) and the
//! components it drives. These are application-layer concerns, not domain
//! policy.

use conductor_domain::PlanningMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on executed steps in iterative mode.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Default number of planner requests per planning round.
pub const DEFAULT_MAX_PLANNING_ATTEMPTS: usize = 3;

/// Orchestration loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Full plan up front, or one step at a time.
    pub mode: PlanningMode,
    /// Maximum number of executed steps in iterative mode.
    pub max_iterations: usize,
    /// Planner requests per planning round before giving up.
    pub max_planning_attempts: usize,
    /// Upper bound on tasks of one step running at once. `None` runs all.
    pub max_concurrent_tasks: Option<usize>,
    /// Per-task deadline. An expired task is recorded as failed.
    pub task_timeout: Option<Duration>,
    /// Ask the synthesizer for step summaries (when one is configured).
    pub synthesize_steps: bool,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            mode: PlanningMode::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_planning_attempts: DEFAULT_MAX_PLANNING_ATTEMPTS,
            max_concurrent_tasks: None,
            task_timeout: None,
            synthesize_steps: true,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_mode(mut self, mode: PlanningMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn with_max_planning_attempts(mut self, max: usize) -> Self {
        self.max_planning_attempts = max;
        self
    }

    pub fn with_max_concurrent_tasks(mut self, max: Option<usize>) -> Self {
        self.max_concurrent_tasks = max;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_synthesize_steps(mut self, enabled: bool) -> Self {
        self.synthesize_steps = enabled;
        self
    }
}
