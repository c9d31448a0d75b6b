//! Agent configuration from TOML (`[[agents]]` tables)

use conductor_domain::{AgentDescriptor, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

/// How an agent is implemented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAgentKind {
    /// External program, one process per task
    #[default]
    Command,
    /// Built-in agent that answers with the task text
    Echo,
}

/// One `[[agents]]` entry
///
/// # Example
///
/// ```toml
/// [[agents]]
/// name = "organizer"
/// instruction = "Moves and renames files"
/// command = ["organize-agent"]
/// timeout_secs = 120
///
/// [[agents]]
/// name = "echo"
/// kind = "echo"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub name: String,
    /// Shown to the planner next to the agent's name
    pub instruction: String,
    pub kind: FileAgentKind,
    /// Program and arguments (command agents only)
    pub command: Vec<String>,
    pub timeout_secs: Option<u64>,
    pub working_dir: Option<PathBuf>,
}

impl FileAgentConfig {
    pub fn descriptor(&self) -> AgentDescriptor {
        AgentDescriptor::new(self.name.clone(), self.instruction.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self, index: usize) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let label = if self.name.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyAgentName,
                format!("agents[{}] has no name", index),
            ));
            format!("agents[{}]", index)
        } else {
            format!("agent '{}'", self.name)
        };

        match self.kind {
            FileAgentKind::Command => {
                if self.command.first().is_none_or(|p| p.trim().is_empty()) {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::EmptyCommand,
                        format!("{} has no command", label),
                    ));
                }
            }
            FileAgentKind::Echo => {
                if !self.command.is_empty() {
                    issues.push(ConfigIssue::warning(
                        ConfigIssueCode::InvalidValue,
                        format!("{} is an echo agent; its command is ignored", label),
                    ));
                }
            }
        }

        if self.timeout_secs == Some(0) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                format!("{}: timeout_secs cannot be 0", label),
            ));
        }

        issues
    }
}

/// Validate every agent entry plus cross-entry rules.
pub(super) fn validate_agents(agents: &[FileAgentConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if agents.is_empty() {
        issues.push(ConfigIssue::warning(
            ConfigIssueCode::NoAgents,
            "no [[agents]] configured; every plan will be rejected",
        ));
    }

    let mut seen = BTreeSet::new();
    for (index, agent) in agents.iter().enumerate() {
        issues.extend(agent.validate(index));
        if !agent.name.trim().is_empty() && !seen.insert(agent.name.as_str()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateAgent,
                format!("agent '{}' is defined more than once", agent.name),
            ));
        }
    }

    issues
}
