//! Planner configuration from TOML (`[planner]` section)

use conductor_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Raw planner configuration from TOML
///
/// # Example
///
/// ```toml
/// [planner]
/// command = ["my-planner", "--json"]
/// timeout_secs = 300
/// # or replay recorded replies instead:
/// playback = "replies.txt"
/// ```
///
/// `playback` takes precedence over `command` when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    /// Program and arguments; receives the planning request as JSON on stdin
    pub command: Vec<String>,
    /// File of recorded replies separated by `---` lines
    pub playback: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub working_dir: Option<PathBuf>,
}

impl FilePlannerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn is_configured(&self) -> bool {
        self.playback.is_some() || !self.command.is_empty()
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !self.is_configured() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::NoPlanner,
                "[planner] has neither 'command' nor 'playback'; pass --playback to run",
            ));
        }
        if self.command.first().is_some_and(|p| p.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCommand,
                "planner.command starts with an empty program name",
            ));
        }
        if self.timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "planner.timeout_secs cannot be 0",
            ));
        }

        issues
    }
}
