//! Built-in agent that answers with the task itself.

use async_trait::async_trait;
use conductor_application::{AgentError, AgentExecutor};

/// Returns the task description unchanged. Pairs with the playback planner
/// for dry runs that exercise the whole pipeline without any real agent.
pub struct EchoAgent;

#[async_trait]
impl AgentExecutor for EchoAgent {
    async fn execute(&self, task: &str, _context: &str) -> Result<String, AgentError> {
        Ok(task.to_string())
    }
}
