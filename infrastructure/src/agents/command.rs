//! Agent backed by an external program.

use crate::process::{CommandSpec, ProcessError};
use async_trait::async_trait;
use conductor_application::{AgentError, AgentExecutor};
use serde::Serialize;
use tracing::debug;

/// What the program receives on stdin, as one JSON document.
#[derive(Debug, Serialize)]
struct AgentRequest<'a> {
    agent: &'a str,
    task: &'a str,
    context: &'a str,
}

/// Runs a configured program once per task.
///
/// The program reads `{"agent", "task", "context"}` from stdin and writes
/// its result to stdout.
pub struct CommandAgent {
    name: String,
    command: CommandSpec,
}

impl CommandAgent {
    pub fn new(name: impl Into<String>, command: CommandSpec) -> Self {
        Self {
            name: name.into(),
            command,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<ProcessError> for AgentError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::Timeout { timeout, .. } => AgentError::Timeout(timeout),
            ProcessError::NotFound(_) | ProcessError::Spawn { .. } => {
                AgentError::Unavailable(e.to_string())
            }
            other => AgentError::ExecutionFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl AgentExecutor for CommandAgent {
    async fn execute(&self, task: &str, context: &str) -> Result<String, AgentError> {
        debug!(
            "Agent '{}' running '{}' for task: {}",
            self.name,
            self.command.program(),
            task
        );
        let request = AgentRequest {
            agent: &self.name,
            task,
            context,
        };
        Ok(self.command.run_json(&request).await?)
    }
}
