//! Planner client
//!
//! Wraps the [`PlannerGateway`] port: renders the planning prompt, parses the
//! reply into the shape the current mode expects, validates it against the
//! agent registry, and retries with the rejection fed back to the planner.
//! Nothing unvalidated ever leaves this module.

use super::shared::{Cancelled, cancellable, check_cancelled};
use crate::config::execution_params::DEFAULT_MAX_PLANNING_ATTEMPTS;
use crate::ports::planner_gateway::{PlannerGateway, PlanningRequest};
use crate::ports::progress::OrchestrationProgress;
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::registry::AgentRegistry;
use conductor_domain::{
    NextStep, Plan, PlanValidationError, PlannerOutput, PlanningMode, PromptTemplate,
    parse_next_step_reply, parse_plan_reply, validate_next_step, validate_plan,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Planning gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Planning failed after {attempts} attempt(s): {message}")]
    Exhausted { attempts: usize, message: String },

    #[error("Planning cancelled")]
    Cancelled,
}

impl From<Cancelled> for PlanningError {
    fn from(_: Cancelled) -> Self {
        PlanningError::Cancelled
    }
}

/// Validated access to the planner collaborator.
pub struct PlannerClient {
    gateway: Arc<dyn PlannerGateway>,
    max_attempts: usize,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl PlannerClient {
    pub fn new(gateway: Arc<dyn PlannerGateway>) -> Self {
        Self {
            gateway,
            max_attempts: DEFAULT_MAX_PLANNING_ATTEMPTS,
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Ask for whatever `mode` calls for: a full [`Plan`] or one [`NextStep`].
    pub async fn plan(
        &self,
        objective: &str,
        history: &str,
        mode: PlanningMode,
        agents: &AgentRegistry,
        progress: &dyn OrchestrationProgress,
    ) -> Result<PlannerOutput, PlanningError> {
        match mode {
            PlanningMode::Full => self
                .full_plan(objective, history, agents, progress)
                .await
                .map(PlannerOutput::Plan),
            PlanningMode::Iterative => self
                .next_step(objective, history, agents, progress)
                .await
                .map(PlannerOutput::NextStep),
        }
    }

    /// Ask for a complete plan.
    pub async fn full_plan(
        &self,
        objective: &str,
        history: &str,
        agents: &AgentRegistry,
        progress: &dyn OrchestrationProgress,
    ) -> Result<Plan, PlanningError> {
        self.request_validated(objective, history, PlanningMode::Full, agents, progress, |reply| {
            let plan = parse_plan_reply(reply)?;
            validate_plan(&plan, agents)?;
            Ok(plan)
        })
        .await
    }

    /// Ask for the single next step.
    pub async fn next_step(
        &self,
        objective: &str,
        history: &str,
        agents: &AgentRegistry,
        progress: &dyn OrchestrationProgress,
    ) -> Result<NextStep, PlanningError> {
        self.request_validated(
            objective,
            history,
            PlanningMode::Iterative,
            agents,
            progress,
            |reply| {
                let next = parse_next_step_reply(reply)?;
                validate_next_step(&next, agents)?;
                Ok(next)
            },
        )
        .await
    }

    async fn request_validated<T>(
        &self,
        objective: &str,
        history: &str,
        mode: PlanningMode,
        agents: &AgentRegistry,
        progress: &dyn OrchestrationProgress,
        accept: impl Fn(&str) -> Result<T, PlanValidationError>,
    ) -> Result<T, PlanningError> {
        let descriptors = agents.descriptors();
        let mut feedback: Option<String> = None;
        let mut last_error = String::from("no planning attempts were allowed");

        for attempt in 1..=self.max_attempts {
            check_cancelled(&self.cancellation_token)?;
            progress.on_planning_attempt(attempt, self.max_attempts);

            let request = PlanningRequest {
                objective: objective.to_string(),
                history: history.to_string(),
                mode,
                agents: descriptors.clone(),
                feedback: feedback.clone(),
                attempt,
                system: PromptTemplate::planner_system().to_string(),
                prompt: PromptTemplate::planning_prompt(
                    objective,
                    &descriptors,
                    history,
                    mode,
                    feedback.as_deref(),
                ),
            };

            info!(
                "Requesting {} plan (attempt {}/{})",
                mode, attempt, self.max_attempts
            );
            self.run_logger.log(RunEvent::new(
                "planner_request",
                json!({
                    "mode": mode,
                    "attempt": attempt,
                    "feedback": request.feedback,
                    "prompt": request.prompt,
                }),
            ));

            let reply =
                cancellable(&self.cancellation_token, self.gateway.request(&request)).await?;

            let reason = match reply {
                Ok(text) => {
                    debug!("Planner replied with {} bytes", text.len());
                    self.run_logger.log(RunEvent::new(
                        "planner_reply",
                        json!({ "attempt": attempt, "text": text }),
                    ));
                    match accept(&text) {
                        Ok(output) => return Ok(output),
                        Err(e) => {
                            let reason = e.to_string();
                            feedback = Some(reason.clone());
                            reason
                        }
                    }
                }
                Err(e) => e.to_string(),
            };

            warn!("Planner attempt {} rejected: {}", attempt, reason);
            self.run_logger.log(RunEvent::new(
                "plan_rejected",
                json!({ "attempt": attempt, "reason": reason }),
            ));
            progress.on_plan_rejected(attempt, &reason);
            last_error = reason;
        }

        Err(PlanningError::Exhausted {
            attempts: self.max_attempts,
            message: last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::planner_gateway::PlannerGatewayError;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::test_support::{DelayAgent, ScriptedPlanner, registry};

    const VALID_PLAN: &str = r#"{"steps": [{"description": "Organize", "tasks": [{"description": "Move a", "agent": "organizer"}]}], "is_complete": true}"#;
    const UNKNOWN_AGENT_PLAN: &str = r#"{"steps": [{"description": "Organize", "tasks": [{"description": "Move a", "agent": "sorter"}]}], "is_complete": true}"#;
    const VALID_NEXT: &str = r#"```json
{"description": "Look", "tasks": [{"description": "List files", "agent": "organizer"}], "is_complete": false}
```"#;

    fn agents() -> AgentRegistry {
        registry(vec![("organizer", Arc::new(DelayAgent::new()))])
    }

    #[tokio::test]
    async fn test_full_plan_first_attempt() {
        let planner = Arc::new(ScriptedPlanner::replies(&[VALID_PLAN]));
        let client = PlannerClient::new(planner.clone());

        let plan = client
            .full_plan("Organize files", "No steps executed yet", &agents(), &NoProgress)
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 1);
        assert!(plan.is_complete);
        let requests = planner.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].attempt, 1);
        assert_eq!(requests[0].feedback, None);
        assert!(requests[0].prompt.contains("- organizer"));
        assert!(requests[0].system.contains("must not depend on each other"));
        assert!(requests[0].system.contains("single JSON document"));
    }

    #[tokio::test]
    async fn test_retry_feeds_back_rejection() {
        let planner = Arc::new(ScriptedPlanner::replies(&[UNKNOWN_AGENT_PLAN, VALID_PLAN]));
        let client = PlannerClient::new(planner.clone());

        let plan = client
            .full_plan("Organize files", "", &agents(), &NoProgress)
            .await
            .unwrap();
        assert_eq!(plan.steps[0].tasks[0].agent, "organizer");

        let requests = planner.requests();
        assert_eq!(requests.len(), 2);
        let feedback = requests[1].feedback.as_deref().unwrap();
        assert!(feedback.contains("unknown agent 'sorter'"));
        assert!(requests[1].prompt.contains("rejected"));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let planner = Arc::new(ScriptedPlanner::repeating("I cannot help with that"));
        let client = PlannerClient::new(planner.clone()).with_max_attempts(3);

        let err = client
            .full_plan("Organize files", "", &agents(), &NoProgress)
            .await
            .unwrap_err();

        assert_eq!(planner.request_count(), 3);
        match err {
            PlanningError::Exhausted { attempts, message } => {
                assert_eq!(attempts, 3);
                assert!(message.contains("Invalid planner output"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gateway_errors_are_retried() {
        let planner = Arc::new(ScriptedPlanner::new(vec![
            Err(PlannerGatewayError::Timeout),
            Ok(VALID_PLAN.to_string()),
        ]));
        let client = PlannerClient::new(planner.clone());

        assert!(client.full_plan("x", "", &agents(), &NoProgress).await.is_ok());
        let requests = planner.requests();
        assert_eq!(requests.len(), 2);
        // Transport failures say nothing about the reply's content
        assert_eq!(requests[1].feedback, None);
    }

    #[tokio::test]
    async fn test_iterative_mode_expects_next_step() {
        let planner = Arc::new(ScriptedPlanner::replies(&[VALID_PLAN, VALID_NEXT]));
        let client = PlannerClient::new(planner.clone());

        let output = client
            .plan("x", "", PlanningMode::Iterative, &agents(), &NoProgress)
            .await
            .unwrap();

        // The full-plan shaped reply was rejected first
        assert_eq!(planner.request_count(), 2);
        match output {
            PlannerOutput::NextStep(next) => {
                assert_eq!(next.step.description, "Look");
                assert!(!next.is_complete);
            }
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancelled_before_request() {
        let planner = Arc::new(ScriptedPlanner::replies(&[VALID_PLAN]));
        let token = CancellationToken::new();
        token.cancel();
        let client = PlannerClient::new(planner.clone()).with_cancellation(token);

        let err = client
            .full_plan("x", "", &agents(), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err, PlanningError::Cancelled);
        assert_eq!(planner.request_count(), 0);
    }
}
