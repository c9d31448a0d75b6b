//! Execution results accumulated by the orchestrator.
//!
//! [`PlanResult`] is the single source of truth for one orchestration run.
//! It is created empty when the run starts and grows one [`StepResult`] at a
//! time; nothing is ever removed or reordered.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::entities::{AgentTask, Described, Plan, Step};
use crate::core::error::DomainError;

/// Placeholder result text for a task whose result was never set.
pub const DEFAULT_TASK_RESULT: &str = "Task completed";

/// Maximum number of auxiliary entries a [`TaskWithResult`] may carry.
pub const MAX_EXTENSIONS: usize = 16;

/// Field names of [`TaskWithResult`]; never usable as extension keys.
const RESERVED_KEYS: [&str; 3] = ["description", "result", "agent"];

fn default_task_result() -> String {
    DEFAULT_TASK_RESULT.to_string()
}

/// A task together with the text its agent produced.
///
/// `agent` is `None` when the executing agent is not known. Auxiliary data
/// that the core does not interpret lives in a bounded extension map; unknown
/// fields encountered during deserialization are collected there as well,
/// subject to the same bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTaskWithResult")]
pub struct TaskWithResult {
    pub description: String,
    pub result: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(flatten)]
    extensions: BTreeMap<String, Value>,
}

#[derive(Deserialize)]
struct RawTaskWithResult {
    description: String,
    #[serde(default = "default_task_result")]
    result: String,
    #[serde(default)]
    agent: Option<String>,
    #[serde(flatten)]
    extensions: BTreeMap<String, Value>,
}

impl TryFrom<RawTaskWithResult> for TaskWithResult {
    type Error = DomainError;

    fn try_from(raw: RawTaskWithResult) -> Result<Self, Self::Error> {
        if let Some(key) = raw.extensions.keys().nth(MAX_EXTENSIONS) {
            return Err(DomainError::ExtensionLimit {
                key: key.clone(),
                limit: MAX_EXTENSIONS,
            });
        }
        let mut task = TaskWithResult::new(raw.description)
            .with_result(raw.result)
            .with_agent(raw.agent.unwrap_or_default());
        task.extensions = raw.extensions;
        Ok(task)
    }
}

impl TaskWithResult {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            result: default_task_result(),
            agent: None,
            extensions: BTreeMap::new(),
        }
    }

    /// Build the result record for a task that an agent executed.
    pub fn from_task(task: &AgentTask, result: impl Into<String>) -> Self {
        Self::new(task.description.clone())
            .with_result(result)
            .with_agent(task.agent.clone())
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = result.into();
        self
    }

    /// Set the executing agent. An empty name clears it.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        let agent = agent.into();
        self.agent = if agent.is_empty() { None } else { Some(agent) };
        self
    }

    /// Agent name, or `""` when unknown.
    pub fn agent_name(&self) -> &str {
        self.agent.as_deref().unwrap_or("")
    }

    /// Attach an auxiliary value.
    ///
    /// Replacing an existing key always succeeds; adding a new key fails once
    /// [`MAX_EXTENSIONS`] entries are present. The built-in field names are
    /// rejected.
    pub fn insert_extension(
        &mut self,
        key: impl Into<String>,
        value: Value,
    ) -> Result<(), DomainError> {
        let key = key.into();
        if RESERVED_KEYS.contains(&key.as_str()) {
            return Err(DomainError::ReservedExtensionKey(key));
        }
        if !self.extensions.contains_key(&key) && self.extensions.len() >= MAX_EXTENSIONS {
            return Err(DomainError::ExtensionLimit {
                key,
                limit: MAX_EXTENSIONS,
            });
        }
        self.extensions.insert(key, value);
        Ok(())
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    pub fn extensions(&self) -> &BTreeMap<String, Value> {
        &self.extensions
    }
}

impl Described for TaskWithResult {
    fn description(&self) -> &str {
        &self.description
    }
}

/// The outcome of executing one [`Step`].
///
/// `task_results[i]` always belongs to `step.tasks[i]`. The only way to build
/// one is [`StepResult::new`], which rejects a length mismatch; there is no
/// empty placeholder value, and deserialization goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStepResult")]
pub struct StepResult {
    step: Step,
    task_results: Vec<TaskWithResult>,
    result: String,
}

#[derive(Deserialize)]
struct RawStepResult {
    step: Step,
    task_results: Vec<TaskWithResult>,
    result: String,
}

impl TryFrom<RawStepResult> for StepResult {
    type Error = DomainError;

    fn try_from(raw: RawStepResult) -> Result<Self, Self::Error> {
        StepResult::new(raw.step, raw.task_results, raw.result)
    }
}

impl StepResult {
    pub fn new(
        step: Step,
        task_results: Vec<TaskWithResult>,
        result: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if step.tasks.len() != task_results.len() {
            return Err(DomainError::TaskResultMismatch {
                tasks: step.tasks.len(),
                results: task_results.len(),
            });
        }
        Ok(Self {
            step,
            task_results,
            result: result.into(),
        })
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn task_results(&self) -> &[TaskWithResult] {
        &self.task_results
    }

    /// Summary of what happened during the step.
    pub fn result(&self) -> &str {
        &self.result
    }
}

/// Accumulated state of one orchestration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    pub objective: String,
    /// The plan that was executed. In iterative mode it is recorded from the
    /// executed steps once the run completes, and absent before that.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    step_results: Vec<StepResult>,
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl PlanResult {
    pub fn new(objective: impl Into<String>) -> Self {
        Self {
            objective: objective.into(),
            plan: None,
            step_results: Vec::new(),
            is_complete: false,
            result: None,
        }
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = Some(plan);
        self
    }

    pub fn step_results(&self) -> &[StepResult] {
        &self.step_results
    }

    /// Append the result of a fully executed step.
    pub fn add_step_result(&mut self, step_result: StepResult) {
        self.step_results.push(step_result);
    }

    pub fn has_started(&self) -> bool {
        !self.step_results.is_empty()
    }

    /// Mark the run finished successfully with a final result text.
    pub fn complete(&mut self, is_complete: bool, result: impl Into<String>) {
        self.is_complete = is_complete;
        self.result = Some(result.into());
    }

    /// Mark the run failed with an explanation. Accumulated steps are kept.
    pub fn fail(&mut self, explanation: impl Into<String>) {
        self.is_complete = false;
        self.result = Some(explanation.into());
    }
}
