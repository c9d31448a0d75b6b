//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod agents;
mod logging;
mod orchestrator;
mod output;
mod planner;

pub use agents::{FileAgentConfig, FileAgentKind};
pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use output::FileOutputConfig;
pub use planner::FilePlannerConfig;

use conductor_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Loop control
    pub orchestrator: FileOrchestratorConfig,
    /// Planner collaborator
    pub planner: FilePlannerConfig,
    /// Agent roster
    pub agents: Vec<FileAgentConfig>,
    /// Diagnostic log and run transcript
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. Errors make the
    /// configuration unusable; warnings are reported and startup continues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.orchestrator.validate());
        issues.extend(self.planner.validate());
        issues.extend(agents::validate_agents(&self.agents));

        if let Some(ref synthesizer) = self.orchestrator.synthesizer
            && !self.agents.iter().any(|a| &a.name == synthesizer)
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::UnknownSynthesizer,
                format!(
                    "orchestrator.synthesizer names unknown agent '{}'",
                    synthesizer
                ),
            ));
        }

        issues
    }

    pub fn agent(&self, name: &str) -> Option<&FileAgentConfig> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Render the merged configuration as TOML (for --show-config)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
