//! Orchestrator configuration from TOML (`[orchestrator]` section)

use conductor_application::ExecutionParams;
use conductor_domain::{ConfigIssue, ConfigIssueCode, PlanningMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw orchestrator configuration from TOML
///
/// # Example
///
/// ```toml
/// [orchestrator]
/// mode = "iterative"          # "full" or "iterative"
/// max_iterations = 10
/// max_planning_attempts = 3
/// max_concurrent_tasks = 4    # unset: no limit
/// task_timeout_secs = 300     # unset: no deadline
/// synthesize_steps = true
/// synthesizer = "writer"      # agent that writes summaries
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Planning mode: "full" or "iterative"
    pub mode: String,
    pub max_iterations: usize,
    pub max_planning_attempts: usize,
    pub max_concurrent_tasks: Option<usize>,
    pub task_timeout_secs: Option<u64>,
    pub synthesize_steps: bool,
    /// Name of a configured agent used for step and final summaries
    pub synthesizer: Option<String>,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            mode: params.mode.to_string(),
            max_iterations: params.max_iterations,
            max_planning_attempts: params.max_planning_attempts,
            max_concurrent_tasks: params.max_concurrent_tasks,
            task_timeout_secs: params.task_timeout.map(|t| t.as_secs()),
            synthesize_steps: params.synthesize_steps,
            synthesizer: None,
        }
    }
}

impl FileOrchestratorConfig {
    /// Parse the mode string, falling back to the default with a warning.
    ///
    /// Accepts: "full", "plan", "iterative", "iter", "step"
    pub fn parse_mode(&self) -> (PlanningMode, Vec<ConfigIssue>) {
        match self.mode.parse::<PlanningMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let fallback = PlanningMode::default();
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidValue,
                    format!(
                        "orchestrator.mode: unknown value '{}', falling back to '{}'",
                        self.mode, fallback
                    ),
                );
                (fallback, vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_mode().1;

        if self.max_iterations == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxIterations,
                "orchestrator.max_iterations must be at least 1",
            ));
        }
        if self.max_planning_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroPlanningAttempts,
                "orchestrator.max_planning_attempts must be at least 1",
            ));
        }
        if self.max_concurrent_tasks == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroConcurrency,
                "orchestrator.max_concurrent_tasks must be at least 1 (omit it for no limit)",
            ));
        }
        if self.task_timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "orchestrator.task_timeout_secs cannot be 0 (omit it for no deadline)",
            ));
        }

        issues
    }

    /// Convert into execution parameters. Invalid modes fall back silently;
    /// [`validate`](Self::validate) reports them.
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_mode(self.parse_mode().0)
            .with_max_iterations(self.max_iterations)
            .with_max_planning_attempts(self.max_planning_attempts)
            .with_max_concurrent_tasks(self.max_concurrent_tasks)
            .with_task_timeout(self.task_timeout_secs.map(Duration::from_secs))
            .with_synthesize_steps(self.synthesize_steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::Severity;

    #[test]
    fn test_default_matches_execution_params() {
        let config = FileOrchestratorConfig::default();
        assert_eq!(config.to_execution_params(), ExecutionParams::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_invalid_mode_warns_and_falls_back() {
        let config = FileOrchestratorConfig {
            mode: "freestyle".to_string(),
            ..Default::default()
        };
        let (mode, issues) = config.parse_mode();
        assert_eq!(mode, PlanningMode::Full);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidValue);
    }

    #[test]
    fn test_zero_bounds_are_errors() {
        let config = FileOrchestratorConfig {
            max_iterations: 0,
            max_planning_attempts: 0,
            max_concurrent_tasks: Some(0),
            task_timeout_secs: Some(0),
            ..Default::default()
        };
        let codes: Vec<_> = config.validate().iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::ZeroMaxIterations,
                ConfigIssueCode::ZeroPlanningAttempts,
                ConfigIssueCode::ZeroConcurrency,
                ConfigIssueCode::ZeroTimeout,
            ]
        );
    }

    #[test]
    fn test_to_execution_params() {
        let config = FileOrchestratorConfig {
            mode: "iter".to_string(),
            max_iterations: 4,
            task_timeout_secs: Some(90),
            synthesize_steps: false,
            ..Default::default()
        };
        let params = config.to_execution_params();
        assert_eq!(params.mode, PlanningMode::Iterative);
        assert_eq!(params.max_iterations, 4);
        assert_eq!(params.task_timeout, Some(Duration::from_secs(90)));
        assert!(!params.synthesize_steps);
    }
}
