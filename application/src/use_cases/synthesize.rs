//! Synthesis on top of a registered agent.

use crate::ports::agent_executor::AgentExecutor;
use crate::ports::synthesizer::{SynthesisError, Synthesizer};
use async_trait::async_trait;
use conductor_domain::{PlanResult, PromptTemplate, Step, TaskWithResult, format_plan_result_markup};
use std::sync::Arc;
use tracing::debug;

/// [`Synthesizer`] that delegates to an ordinary agent.
///
/// The synthesis instructions are sent as the task; the run history in markup
/// form is sent as context. A blank reply counts as a failure so callers
/// fall back to their deterministic summary.
pub struct AgentSynthesizer {
    name: String,
    agent: Arc<dyn AgentExecutor>,
}

impl AgentSynthesizer {
    pub fn new(name: impl Into<String>, agent: Arc<dyn AgentExecutor>) -> Self {
        Self {
            name: name.into(),
            agent,
        }
    }

    async fn ask(&self, task: &str, context: &str) -> Result<String, SynthesisError> {
        debug!("Requesting synthesis from agent '{}'", self.name);
        let reply = self
            .agent
            .execute(task, context)
            .await
            .map_err(|e| SynthesisError(format!("agent '{}': {}", self.name, e)))?;

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(SynthesisError(format!(
                "agent '{}' returned an empty reply",
                self.name
            )));
        }
        Ok(reply.to_string())
    }
}

#[async_trait]
impl Synthesizer for AgentSynthesizer {
    async fn synthesize_step(
        &self,
        step: &Step,
        task_results: &[TaskWithResult],
        plan_result: &PlanResult,
    ) -> Result<String, SynthesisError> {
        let task = PromptTemplate::step_synthesis(step, task_results);
        self.ask(&task, &format_plan_result_markup(plan_result)).await
    }

    async fn synthesize_plan(&self, plan_result: &PlanResult) -> Result<String, SynthesisError> {
        let task = PromptTemplate::plan_synthesis(plan_result);
        self.ask(&task, &format_plan_result_markup(plan_result)).await
    }
}
