//! Step executor
//!
//! Runs every task of one [`Step`] concurrently and joins them back into a
//! [`StepResult`] in the step's original task order.
//!
//! - Each task goes to the agent it names, with the markup-rendered history
//!   of the run as context.
//! - A failing or timed-out task becomes that task's result text; its
//!   siblings keep going.
//! - Executor-level faults (an agent that no longer resolves, a panicked
//!   dispatch) are fatal to the step.
//! - Cancellation aborts every outstanding dispatch and returns nothing.

use super::shared::{Cancelled, cancellable, check_cancelled};
use crate::ports::agent_executor::{AgentError, AgentExecutor};
use crate::ports::progress::OrchestrationProgress;
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::ports::synthesizer::Synthesizer;
use crate::registry::AgentRegistry;
use conductor_domain::{
    DomainError, PlanResult, Step, StepResult, TaskWithResult, format_plan_result_markup,
    summarize_task_results,
};
use futures::FutureExt;
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Faults that prevent a step from producing a result at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepExecutionError {
    #[error("Task {task} names unknown agent '{agent}'")]
    UnknownAgent { agent: String, task: usize },

    #[error("Task {task} aborted: {message}")]
    TaskAborted { task: usize, message: String },

    #[error("Task join failed: {0}")]
    JoinFailed(String),

    #[error("Step execution cancelled")]
    Cancelled,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<Cancelled> for StepExecutionError {
    fn from(_: Cancelled) -> Self {
        StepExecutionError::Cancelled
    }
}

/// Result text recorded for a task whose agent reported an error.
pub fn task_failure_text(agent: &str, error: &AgentError) -> String {
    format!("[task failed] agent '{}': {}", agent, error)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("agent panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("agent panicked: {}", message)
    } else {
        "agent panicked".to_string()
    }
}

/// Executes the tasks of one step in parallel.
pub struct StepExecutor {
    agents: AgentRegistry,
    max_concurrent_tasks: Option<usize>,
    task_timeout: Option<Duration>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    run_logger: Arc<dyn RunLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl StepExecutor {
    pub fn new(agents: AgentRegistry) -> Self {
        Self {
            agents,
            max_concurrent_tasks: None,
            task_timeout: None,
            synthesizer: None,
            run_logger: Arc::new(NoRunLogger),
            cancellation_token: None,
        }
    }

    pub fn with_max_concurrent_tasks(mut self, max: Option<usize>) -> Self {
        self.max_concurrent_tasks = max;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_synthesizer(mut self, synthesizer: Option<Arc<dyn Synthesizer>>) -> Self {
        self.synthesizer = synthesizer;
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

    /// Execute `step` given the run so far.
    ///
    /// `plan_result` is only read: it supplies the context handed to agents
    /// and to the synthesizer. Appending the returned result is the caller's
    /// job.
    pub async fn execute(
        &self,
        step: &Step,
        plan_result: &PlanResult,
        progress: &dyn OrchestrationProgress,
    ) -> Result<StepResult, StepExecutionError> {
        check_cancelled(&self.cancellation_token)?;

        // Resolve every agent before dispatching anything
        let mut executors: Vec<Arc<dyn AgentExecutor>> = Vec::with_capacity(step.tasks.len());
        for (index, task) in step.tasks.iter().enumerate() {
            let executor =
                self.agents
                    .get(&task.agent)
                    .ok_or_else(|| StepExecutionError::UnknownAgent {
                        agent: task.agent.clone(),
                        task: index + 1,
                    })?;
            executors.push(executor);
        }

        info!(
            "Executing step '{}' ({} task(s))",
            step.description,
            step.tasks.len()
        );

        let context: Arc<str> = Arc::from(format_plan_result_markup(plan_result));
        let semaphore = self
            .max_concurrent_tasks
            .map(|max| Arc::new(Semaphore::new(max.max(1))));

        let mut join_set = JoinSet::new();

        for (index, (task, executor)) in step.tasks.iter().zip(executors).enumerate() {
            let description = task.description.clone();
            let context = Arc::clone(&context);
            let semaphore = semaphore.clone();
            let timeout = self.task_timeout;

            progress.on_task_start(task);
            self.run_logger.log(RunEvent::new(
                "task_dispatch",
                json!({ "agent": task.agent, "task": task.description }),
            ));

            join_set.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                let run = async {
                    let call = executor.execute(&description, &context);
                    match timeout {
                        Some(limit) => match tokio::time::timeout(limit, call).await {
                            Ok(result) => result,
                            Err(_) => Err(AgentError::Timeout(limit)),
                        },
                        None => call.await,
                    }
                };
                (index, AssertUnwindSafe(run).catch_unwind().await)
            });
        }

        // Join in completion order, store in task order
        let mut slots: Vec<Option<TaskWithResult>> = vec![None; step.tasks.len()];

        loop {
            let joined = if let Some(ref token) = self.cancellation_token {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        join_set.abort_all();
                        info!("Step '{}' cancelled", step.description);
                        return Err(StepExecutionError::Cancelled);
                    }
                    joined = join_set.join_next() => joined,
                }
            } else {
                join_set.join_next().await
            };

            let Some(joined) = joined else {
                break;
            };

            let (index, result) = match joined {
                Ok((index, Ok(result))) => (index, result),
                Ok((index, Err(payload))) => {
                    join_set.abort_all();
                    let message = panic_message(payload.as_ref());
                    warn!("Task {} aborted: {}", index + 1, message);
                    return Err(StepExecutionError::TaskAborted {
                        task: index + 1,
                        message,
                    });
                }
                Err(e) => {
                    join_set.abort_all();
                    warn!("Task join error: {}", e);
                    return Err(StepExecutionError::JoinFailed(e.to_string()));
                }
            };

            let task = &step.tasks[index];
            let (text, success) = match result {
                Ok(text) => (text, true),
                Err(e) => {
                    warn!("Task {} failed on agent '{}': {}", index + 1, task.agent, e);
                    (task_failure_text(&task.agent, &e), false)
                }
            };
            debug!("Task {} settled (success: {})", index + 1, success);

            let task_result = TaskWithResult::from_task(task, text);
            self.run_logger.log(RunEvent::new(
                "task_result",
                json!({
                    "agent": task.agent,
                    "task": task.description,
                    "result": task_result.result,
                    "success": success,
                }),
            ));
            progress.on_task_complete(&task_result, success);
            slots[index] = Some(task_result);
        }

        let task_results: Vec<TaskWithResult> = slots.into_iter().flatten().collect();
        let summary = self.summarize(step, &task_results, plan_result).await?;
        let step_result = StepResult::new(step.clone(), task_results, summary)?;

        self.run_logger.log(RunEvent::new(
            "step_result",
            json!({
                "step": step.description,
                "tasks": step.tasks.len(),
                "summary": step_result.result(),
            }),
        ));
        Ok(step_result)
    }

    async fn summarize(
        &self,
        step: &Step,
        task_results: &[TaskWithResult],
        plan_result: &PlanResult,
    ) -> Result<String, StepExecutionError> {
        if let Some(synthesizer) = &self.synthesizer {
            let synthesized = cancellable(
                &self.cancellation_token,
                synthesizer.synthesize_step(step, task_results, plan_result),
            )
            .await?;
            match synthesized {
                Ok(summary) => return Ok(summary),
                Err(e) => warn!("Step synthesis failed, using task results: {}", e),
            }
        }
        Ok(summarize_task_results(task_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::ports::synthesizer::SynthesisError;
    use crate::use_cases::test_support::{
        DelayAgent, FailingAgent, PanickingAgent, RecordingRunLogger, registry,
    };
    use async_trait::async_trait;
    use conductor_domain::AgentTask;

    fn organize_step(count: usize) -> Step {
        Step::new("Organize footage").with_tasks(
            (1..=count).map(|i| AgentTask::new(format!("Move clip{}.mp4", i), "organizer")),
        )
    }

    #[tokio::test]
    async fn test_results_follow_task_order_not_completion_order() {
        // Earlier tasks finish last
        let agent = DelayAgent::new()
            .with_delay("Move clip1.mp4", 60)
            .with_delay("Move clip2.mp4", 30)
            .with_delay("Move clip3.mp4", 0);
        let executor = StepExecutor::new(registry(vec![("organizer", Arc::new(agent))]));

        let step = organize_step(3);
        let result = executor
            .execute(&step, &PlanResult::new("Organize 3 video files"), &NoProgress)
            .await
            .unwrap();

        let descriptions: Vec<_> = result
            .task_results()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Move clip1.mp4", "Move clip2.mp4", "Move clip3.mp4"]
        );
        assert_eq!(result.task_results()[0].result, "done: Move clip1.mp4");
        assert!(
            result
                .task_results()
                .iter()
                .all(|t| t.agent.as_deref() == Some("organizer"))
        );
    }

    #[tokio::test]
    async fn test_failing_task_is_captured() {
        let step = Step::new("Mixed").with_tasks(vec![
            AgentTask::new("works", "good"),
            AgentTask::new("breaks", "bad"),
            AgentTask::new("works too", "good"),
        ]);
        let executor = StepExecutor::new(registry(vec![
            ("good", Arc::new(DelayAgent::new())),
            ("bad", Arc::new(FailingAgent("disk full"))),
        ]));

        let result = executor
            .execute(&step, &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(result.task_results().len(), 3);
        assert_eq!(result.task_results()[0].result, "done: works");
        assert_eq!(
            result.task_results()[1].result,
            "[task failed] agent 'bad': Execution failed: disk full"
        );
        assert_eq!(result.task_results()[2].result, "done: works too");
    }

    #[tokio::test]
    async fn test_empty_step_yields_empty_result() {
        let executor = StepExecutor::new(registry(vec![]));
        let result = executor
            .execute(&Step::new("Think"), &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();
        assert!(result.task_results().is_empty());
        assert_eq!(result.result(), "No tasks were executed");
    }

    #[tokio::test]
    async fn test_unknown_agent_is_fatal_before_dispatch() {
        let agent = Arc::new(DelayAgent::new());
        let executor = StepExecutor::new(registry(vec![("organizer", agent.clone())]));
        let step = Step::new("s").with_tasks(vec![
            AgentTask::new("a", "organizer"),
            AgentTask::new("b", "ghost"),
        ]);

        let err = executor
            .execute(&step, &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StepExecutionError::UnknownAgent {
                agent: "ghost".to_string(),
                task: 2
            }
        );
        assert!(agent.contexts().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_dispatch_is_fatal() {
        let executor = StepExecutor::new(registry(vec![("boom", Arc::new(PanickingAgent))]));
        let step = Step::new("s").with_task(AgentTask::new("a", "boom"));

        let err = executor
            .execute(&step, &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, StepExecutionError::TaskAborted { task: 1, .. }));
    }

    #[tokio::test]
    async fn test_semaphore_bounds_concurrency() {
        let agent = Arc::new(DelayAgent::new().with_default_delay(20));
        let executor = StepExecutor::new(registry(vec![("organizer", agent.clone())]))
            .with_max_concurrent_tasks(Some(2));

        let result = executor
            .execute(&organize_step(5), &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();
        assert_eq!(result.task_results().len(), 5);
        assert!(agent.peak_concurrency() <= 2);
    }

    #[tokio::test]
    async fn test_timeout_is_task_failure() {
        let agent = DelayAgent::new().with_delay("slow", 5_000);
        let executor = StepExecutor::new(registry(vec![("organizer", Arc::new(agent))]))
            .with_task_timeout(Some(Duration::from_millis(20)));
        let step = Step::new("s").with_tasks(vec![
            AgentTask::new("slow", "organizer"),
            AgentTask::new("fast", "organizer"),
        ]);

        let result = executor
            .execute(&step, &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();
        assert!(result.task_results()[0].result.starts_with("[task failed] agent 'organizer': Timed out"));
        assert_eq!(result.task_results()[1].result, "done: fast");
    }

    #[tokio::test]
    async fn test_cancellation_aborts_dispatch() {
        let agent = DelayAgent::new().with_default_delay(5_000);
        let token = CancellationToken::new();
        let executor = StepExecutor::new(registry(vec![("organizer", Arc::new(agent))]))
            .with_cancellation(token.clone());

        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let started = std::time::Instant::now();
        let err = executor
            .execute(&organize_step(3), &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap_err();
        assert_eq!(err, StepExecutionError::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_agents_receive_markup_history() {
        let agent = Arc::new(DelayAgent::new());
        let executor = StepExecutor::new(registry(vec![("organizer", agent.clone())]));

        executor
            .execute(&organize_step(1), &PlanResult::new("Organize"), &NoProgress)
            .await
            .unwrap();

        let contexts = agent.contexts();
        assert_eq!(contexts.len(), 1);
        assert!(contexts[0].contains("<conductor:objective>Organize</conductor:objective>"));
    }

    struct FixedSynthesizer(Result<String, SynthesisError>);

    #[async_trait]
    impl Synthesizer for FixedSynthesizer {
        async fn synthesize_step(
            &self,
            _step: &Step,
            _task_results: &[TaskWithResult],
            _plan_result: &PlanResult,
        ) -> Result<String, SynthesisError> {
            self.0.clone()
        }

        async fn synthesize_plan(&self, _plan_result: &PlanResult) -> Result<String, SynthesisError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn test_synthesizer_summary_used() {
        let executor = StepExecutor::new(registry(vec![("organizer", Arc::new(DelayAgent::new()))]))
            .with_synthesizer(Some(Arc::new(FixedSynthesizer(Ok("All moved".to_string())))));

        let result = executor
            .execute(&organize_step(2), &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();
        assert_eq!(result.result(), "All moved");
    }

    #[tokio::test]
    async fn test_synthesizer_failure_falls_back() {
        let logger = Arc::new(RecordingRunLogger::default());
        let executor = StepExecutor::new(registry(vec![("organizer", Arc::new(DelayAgent::new()))]))
            .with_synthesizer(Some(Arc::new(FixedSynthesizer(Err(SynthesisError(
                "model offline".to_string(),
            ))))))
            .with_run_logger(logger.clone());

        let result = executor
            .execute(&organize_step(1), &PlanResult::new("x"), &NoProgress)
            .await
            .unwrap();
        assert_eq!(result.result(), "Task: Move clip1.mp4\nResult: done: Move clip1.mp4");
        assert_eq!(
            logger.event_types(),
            vec!["task_dispatch", "task_result", "step_result"]
        );
    }
}
