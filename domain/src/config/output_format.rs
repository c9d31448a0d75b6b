//! Output format value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::DomainError;

/// How a finished [`PlanResult`](crate::plan::PlanResult) is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text progress report (default)
    #[default]
    Text,
    /// Tagged markup, as fed to the planner
    Markup,
    /// JSON document of the whole result
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Markup => "markup",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "markup" | "xml" => Ok(OutputFormat::Markup),
            "json" => Ok(OutputFormat::Json),
            other => Err(DomainError::InvalidOutputFormat(other.to_string())),
        }
    }
}
