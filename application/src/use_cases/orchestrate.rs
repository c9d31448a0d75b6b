//! Orchestrator
//!
//! Drives one run from objective to outcome:
//!
//! ```text
//! Planning ──> Executing ──> Complete
//!     │            │  ↺ (iterative: plan next step)
//!     └────────────┴──> Failed | MaxIterationsExceeded | Cancelled
//! ```
//!
//! The orchestrator is the only writer of the run's [`PlanResult`]. Step
//! results are appended after the step has fully settled, so a failed or
//! cancelled step never leaves a partial entry behind.

use super::execute_step::{StepExecutionError, StepExecutor};
use super::plan_client::{PlannerClient, PlanningError};
use super::shared::{Cancelled, cancellable, check_cancelled};
use crate::config::ExecutionParams;
use crate::ports::planner_gateway::PlannerGateway;
use crate::ports::progress::{NoProgress, OrchestrationProgress};
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::ports::synthesizer::Synthesizer;
use crate::registry::AgentRegistry;
use conductor_domain::{
    OrchestrationState, Plan, PlanResult, PlanningMode, Step, format_plan_result_markup,
    summarize_step_results,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Why a run ended without completing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrchestrationError {
    #[error("Planning failed after {attempts} attempt(s): {message}")]
    Planning { attempts: usize, message: String },

    #[error("Maximum iterations ({max}) reached before the objective was complete")]
    MaxIterationsExceeded { max: usize },

    #[error("Step failed: {0}")]
    StepFailed(String),

    #[error("Run cancelled")]
    Cancelled,
}

impl OrchestrationError {
    /// Terminal state this error leads to.
    pub fn state(&self) -> OrchestrationState {
        match self {
            OrchestrationError::Planning { .. } | OrchestrationError::StepFailed(_) => {
                OrchestrationState::Failed
            }
            OrchestrationError::MaxIterationsExceeded { .. } => {
                OrchestrationState::MaxIterationsExceeded
            }
            OrchestrationError::Cancelled => OrchestrationState::Cancelled,
        }
    }
}

impl From<PlanningError> for OrchestrationError {
    fn from(e: PlanningError) -> Self {
        match e {
            PlanningError::Exhausted { attempts, message } => {
                OrchestrationError::Planning { attempts, message }
            }
            PlanningError::Cancelled => OrchestrationError::Cancelled,
        }
    }
}

impl From<StepExecutionError> for OrchestrationError {
    fn from(e: StepExecutionError) -> Self {
        match e {
            StepExecutionError::Cancelled => OrchestrationError::Cancelled,
            other => OrchestrationError::StepFailed(other.to_string()),
        }
    }
}

impl From<Cancelled> for OrchestrationError {
    fn from(_: Cancelled) -> Self {
        OrchestrationError::Cancelled
    }
}

/// How a run ended. The [`PlanResult`] is present on every path and keeps
/// every step that completed.
#[derive(Debug, Clone)]
pub struct OrchestrationOutcome {
    pub state: OrchestrationState,
    pub plan_result: PlanResult,
    pub error: Option<OrchestrationError>,
}

impl OrchestrationOutcome {
    pub fn is_success(&self) -> bool {
        self.state == OrchestrationState::Complete
    }
}

/// Plan-execute-replan engine.
pub struct Orchestrator {
    gateway: Arc<dyn PlannerGateway>,
    agents: AgentRegistry,
    params: ExecutionParams,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn PlannerGateway>, agents: AgentRegistry) -> Self {
        Self {
            gateway,
            agents,
            params: ExecutionParams::default(),
            synthesizer: None,
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
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

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Run with default (no-op) progress
    pub async fn run(&self, objective: &str) -> OrchestrationOutcome {
        self.run_with_progress(objective, &NoProgress).await
    }

    /// Run with progress callbacks
    pub async fn run_with_progress(
        &self,
        objective: &str,
        progress: &dyn OrchestrationProgress,
    ) -> OrchestrationOutcome {
        info!(
            "Starting {} run with {} agent(s): {}",
            self.params.mode,
            self.agents.len(),
            objective
        );
        self.run_logger.log(RunEvent::new(
            "run_started",
            json!({
                "objective": objective,
                "mode": self.params.mode,
                "agents": self.agents.names().collect::<Vec<_>>(),
            }),
        ));

        let mut plan_result = PlanResult::new(objective);
        let result = match self.params.mode {
            PlanningMode::Full => self.run_full(&mut plan_result, progress).await,
            PlanningMode::Iterative => self.run_iterative(&mut plan_result, progress).await,
        };

        let (state, error) = match result {
            Ok(()) => (OrchestrationState::Complete, None),
            Err(e) => {
                warn!("Run ended early: {}", e);
                plan_result.fail(e.to_string());
                (e.state(), Some(e))
            }
        };

        progress.on_state_change(state);
        progress.on_finished(state, &plan_result);
        info!(
            "Run finished in state {} after {} step(s)",
            state,
            plan_result.step_results().len()
        );
        self.run_logger.log(RunEvent::new(
            "run_finished",
            json!({
                "state": state,
                "steps": plan_result.step_results().len(),
                "is_complete": plan_result.is_complete,
                "result": plan_result.result,
            }),
        ));

        OrchestrationOutcome {
            state,
            plan_result,
            error,
        }
    }

    fn planner(&self) -> PlannerClient {
        let client = PlannerClient::new(Arc::clone(&self.gateway))
            .with_max_attempts(self.params.max_planning_attempts)
            .with_run_logger(Arc::clone(&self.run_logger));
        match &self.cancellation_token {
            Some(token) => client.with_cancellation(token.clone()),
            None => client,
        }
    }

    fn executor(&self) -> StepExecutor {
        let synthesizer = if self.params.synthesize_steps {
            self.synthesizer.clone()
        } else {
            None
        };
        let executor = StepExecutor::new(self.agents.clone())
            .with_max_concurrent_tasks(self.params.max_concurrent_tasks)
            .with_task_timeout(self.params.task_timeout)
            .with_synthesizer(synthesizer)
            .with_run_logger(Arc::clone(&self.run_logger));
        match &self.cancellation_token {
            Some(token) => executor.with_cancellation(token.clone()),
            None => executor,
        }
    }

    async fn run_full(
        &self,
        plan_result: &mut PlanResult,
        progress: &dyn OrchestrationProgress,
    ) -> Result<(), OrchestrationError> {
        progress.on_state_change(OrchestrationState::Planning);
        let history = format_plan_result_markup(plan_result);
        let plan: Plan = self
            .planner()
            .full_plan(&plan_result.objective, &history, &self.agents, progress)
            .await?;

        info!(
            "Plan accepted: {} step(s), {} task(s)",
            plan.steps.len(),
            plan.task_count()
        );
        progress.on_plan_ready(&plan);
        plan_result.plan = Some(plan.clone());

        progress.on_state_change(OrchestrationState::Executing);
        let executor = self.executor();
        let total = plan.steps.len();
        for (index, step) in plan.steps.iter().enumerate() {
            check_cancelled(&self.cancellation_token)?;
            self.execute_and_append(&executor, index + 1, step, Some(total), plan_result, progress)
                .await?;
        }

        let result = self.final_result(plan_result).await?;
        plan_result.complete(plan.is_complete, result);
        Ok(())
    }

    async fn run_iterative(
        &self,
        plan_result: &mut PlanResult,
        progress: &dyn OrchestrationProgress,
    ) -> Result<(), OrchestrationError> {
        let planner = self.planner();
        let executor = self.executor();
        let max = self.params.max_iterations;

        loop {
            check_cancelled(&self.cancellation_token)?;
            if plan_result.step_results().len() >= max {
                return Err(OrchestrationError::MaxIterationsExceeded { max });
            }

            progress.on_state_change(OrchestrationState::Planning);
            let history = format_plan_result_markup(plan_result);
            let next = planner
                .next_step(&plan_result.objective, &history, &self.agents, progress)
                .await?;

            progress.on_state_change(OrchestrationState::Executing);
            let index = plan_result.step_results().len() + 1;
            self.execute_and_append(&executor, index, &next.step, None, plan_result, progress)
                .await?;

            if next.is_complete {
                info!("Planner reported the objective complete after step {}", index);
                let result = self.final_result(plan_result).await?;
                // The executed steps become the plan once the run is finalized
                let executed = plan_result
                    .step_results()
                    .iter()
                    .map(|r| r.step().clone())
                    .collect();
                plan_result.plan = Some(Plan::new(executed, true));
                plan_result.complete(true, result);
                return Ok(());
            }
        }
    }

    async fn execute_and_append(
        &self,
        executor: &StepExecutor,
        index: usize,
        step: &Step,
        total: Option<usize>,
        plan_result: &mut PlanResult,
        progress: &dyn OrchestrationProgress,
    ) -> Result<(), OrchestrationError> {
        progress.on_step_start(index, step, total);
        let step_result = executor.execute(step, plan_result, progress).await?;
        plan_result.add_step_result(step_result);
        if let Some(appended) = plan_result.step_results().last() {
            progress.on_step_complete(index, appended);
        }
        Ok(())
    }

    async fn final_result(&self, plan_result: &PlanResult) -> Result<String, OrchestrationError> {
        if let Some(synthesizer) = &self.synthesizer {
            let synthesized = cancellable(
                &self.cancellation_token,
                synthesizer.synthesize_plan(plan_result),
            )
            .await?;
            match synthesized {
                Ok(result) => return Ok(result),
                Err(e) => warn!("Final synthesis failed, using step summaries: {}", e),
            }
        }
        Ok(summarize_step_results(plan_result.step_results()))
    }
}
