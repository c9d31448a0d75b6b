//! Orchestration state machine states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one orchestration run.
///
/// ```text
/// Planning → Executing → (loop) → Complete | Failed | MaxIterationsExceeded | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationState {
    Planning,
    Executing,
    Complete,
    Failed,
    MaxIterationsExceeded,
    Cancelled,
}

impl OrchestrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestrationState::Planning => "planning",
            OrchestrationState::Executing => "executing",
            OrchestrationState::Complete => "complete",
            OrchestrationState::Failed => "failed",
            OrchestrationState::MaxIterationsExceeded => "max_iterations_exceeded",
            OrchestrationState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            OrchestrationState::Planning | OrchestrationState::Executing
        )
    }

    /// Terminal and not a normal completion.
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && *self != OrchestrationState::Complete
    }
}

impl fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!OrchestrationState::Planning.is_terminal());
        assert!(!OrchestrationState::Executing.is_terminal());
        assert!(OrchestrationState::Complete.is_terminal());
        assert!(OrchestrationState::Failed.is_terminal());
        assert!(OrchestrationState::MaxIterationsExceeded.is_terminal());
        assert!(OrchestrationState::Cancelled.is_terminal());
    }

    #[test]
    fn test_complete_is_not_failure() {
        assert!(!OrchestrationState::Complete.is_failure());
        assert!(OrchestrationState::MaxIterationsExceeded.is_failure());
        assert!(!OrchestrationState::Executing.is_failure());
    }
}
