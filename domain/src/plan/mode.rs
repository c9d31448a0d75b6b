//! Planning mode definitions.
//!
//! - Full: the planner produces the whole plan up front, executed without replanning
//! - Iterative: the planner produces one step at a time and is consulted after every step

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::DomainError;

/// How the orchestrator talks to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanningMode {
    /// Plan once, execute every step, no replanning
    #[default]
    Full,
    /// Replan after every step using the accumulated history
    Iterative,
}

impl PlanningMode {
    /// Get a human-readable description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            PlanningMode::Full => "Full: plan once, then execute every step",
            PlanningMode::Iterative => "Iterative: plan one step, execute, replan",
        }
    }

    pub fn is_iterative(&self) -> bool {
        matches!(self, PlanningMode::Iterative)
    }
}

impl fmt::Display for PlanningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningMode::Full => write!(f, "full"),
            PlanningMode::Iterative => write!(f, "iterative"),
        }
    }
}

impl std::str::FromStr for PlanningMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "plan" => Ok(PlanningMode::Full),
            "iterative" | "iter" | "step" => Ok(PlanningMode::Iterative),
            _ => Err(DomainError::InvalidMode(s.to_string())),
        }
    }
}
