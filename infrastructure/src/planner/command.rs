//! Planner backed by an external program.

use crate::process::{CommandSpec, ProcessError};
use async_trait::async_trait;
use conductor_application::{PlannerGateway, PlannerGatewayError, PlanningRequest};
use tracing::debug;

/// Runs a configured program once per planning request.
///
/// The program receives the whole [`PlanningRequest`] as JSON on stdin
/// (including the rendered `prompt`) and prints its reply on stdout.
pub struct CommandPlanner {
    command: CommandSpec,
}

impl CommandPlanner {
    pub fn new(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl From<ProcessError> for PlannerGatewayError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::Timeout { .. } => PlannerGatewayError::Timeout,
            other => PlannerGatewayError::RequestFailed(other.to_string()),
        }
    }
}

#[async_trait]
impl PlannerGateway for CommandPlanner {
    async fn request(&self, request: &PlanningRequest) -> Result<String, PlannerGatewayError> {
        debug!(
            "Running planner '{}' (attempt {})",
            self.command.program(),
            request.attempt
        );
        let reply = self.command.run_json(request).await?;
        if reply.is_empty() {
            return Err(PlannerGatewayError::RequestFailed(format!(
                "planner '{}' printed nothing",
                self.command.program()
            )));
        }
        Ok(reply)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use conductor_domain::{AgentDescriptor, PlanningMode};

    fn request() -> PlanningRequest {
        PlanningRequest {
            objective: "Organize".to_string(),
            history: "No steps executed yet".to_string(),
            mode: PlanningMode::Full,
            agents: vec![AgentDescriptor::new("organizer", "")],
            feedback: None,
            attempt: 1,
            system: "You are a planner.".to_string(),
            prompt: "Objective: Organize".to_string(),
        }
    }

    fn sh_planner(script: &str) -> CommandPlanner {
        CommandPlanner::new(
            CommandSpec::from_argv(&["sh".to_string(), "-c".to_string(), script.to_string()])
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_request_is_sent_as_json() {
        let reply = sh_planner("cat").request(&request()).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(value["objective"], "Organize");
        assert_eq!(value["mode"], "full");
        assert_eq!(value["agents"][0]["name"], "organizer");
        assert_eq!(value["system"], "You are a planner.");
        assert!(value.get("feedback").is_none());
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let err = sh_planner("cat >/dev/null").request(&request()).await.unwrap_err();
        assert!(matches!(err, PlannerGatewayError::RequestFailed(_)));
    }
}
