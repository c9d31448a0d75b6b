//! Configuration issues.
//!
//! Loaders validate what they read and report structured issues instead of
//! failing on the first problem. Errors abort startup; warnings are logged.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `max_iterations` is zero: no step could ever run.
    ZeroMaxIterations,
    /// `max_planning_attempts` is zero: the planner is never asked.
    ZeroPlanningAttempts,
    /// `max_concurrent_tasks` is zero: no task could ever be dispatched.
    ZeroConcurrency,
    /// A timeout of zero seconds fails every call.
    ZeroTimeout,
    /// No agents are registered, so every plan fails validation.
    NoAgents,
    /// An agent has no name.
    EmptyAgentName,
    /// Two agents share a name.
    DuplicateAgent,
    /// An agent or planner has an empty command.
    EmptyCommand,
    /// Neither a planner command nor a playback file is configured.
    NoPlanner,
    /// The synthesizer names an agent that is not registered.
    UnknownSynthesizer,
    /// A string setting holds a value outside its allowed set.
    InvalidValue,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Whether any issue in the list is an error.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_ignores_warnings() {
        let issues = vec![ConfigIssue::warning(ConfigIssueCode::NoAgents, "no agents")];
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_detects_error() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::NoAgents, "no agents"),
            ConfigIssue::error(ConfigIssueCode::ZeroMaxIterations, "max_iterations must be >= 1"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn display_includes_level() {
        let issue = ConfigIssue::error(ConfigIssueCode::EmptyCommand, "agent 'x' has no command");
        assert_eq!(issue.to_string(), "error: agent 'x' has no command");
    }
}
