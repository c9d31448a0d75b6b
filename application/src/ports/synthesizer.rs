//! Synthesizer port
//!
//! Optional collaborator that writes step summaries and the final result.
//! Without one, the use cases fall back to deterministic concatenation.

use async_trait::async_trait;
use conductor_domain::{PlanResult, Step, TaskWithResult};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Synthesis failed: {0}")]
pub struct SynthesisError(pub String);

#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Summarise one executed step. `plan_result` is the history before it.
    async fn synthesize_step(
        &self,
        step: &Step,
        task_results: &[TaskWithResult],
        plan_result: &PlanResult,
    ) -> Result<String, SynthesisError>;

    /// Write the final result of a run.
    async fn synthesize_plan(&self, plan_result: &PlanResult) -> Result<String, SynthesisError>;
}
