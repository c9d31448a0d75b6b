//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// # Example
///
/// ```toml
/// [logging]
/// dir = "~/.local/state/conductor/logs"   # daily-rolling diagnostic log
/// run_log = "runs/latest.jsonl"            # structured run transcript
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling diagnostic log. Unset: stderr only.
    pub dir: Option<PathBuf>,
    /// JSONL transcript of each run. Unset: no transcript.
    pub run_log: Option<PathBuf>,
}
