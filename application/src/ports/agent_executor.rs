//! Agent Executor port
//!
//! Defines the interface for the collaborators that carry out individual
//! tasks. What an agent does with a task is entirely its own concern.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors an agent can report for a single task.
///
/// These never abort a step: the step executor records them as the task's
/// result text and lets sibling tasks finish.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Agent unavailable: {0}")]
    Unavailable(String),
}

/// Port for task execution
///
/// `task` is the task description; `context` is the markup rendering of the
/// run so far.
#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(&self, task: &str, context: &str) -> Result<String, AgentError>;
}
