//! Scripted collaborators shared by the use case tests.

use crate::ports::agent_executor::{AgentError, AgentExecutor};
use crate::ports::planner_gateway::{PlannerGateway, PlannerGatewayError, PlanningRequest};
use crate::ports::run_logger::{RunEvent, RunLogger};
use crate::registry::AgentRegistry;
use async_trait::async_trait;
use conductor_domain::AgentDescriptor;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Planner that replays scripted replies and records every request.
///
/// Once the script runs out, `fallback` is returned forever (or
/// [`PlannerGatewayError::Exhausted`] without one).
pub struct ScriptedPlanner {
    replies: Mutex<VecDeque<Result<String, PlannerGatewayError>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<PlanningRequest>>,
}

impl ScriptedPlanner {
    pub fn new(replies: Vec<Result<String, PlannerGatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn repeating(text: &str) -> Self {
        let mut planner = Self::new(Vec::new());
        planner.fallback = Some(text.to_string());
        planner
    }

    pub fn requests(&self) -> Vec<PlanningRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PlannerGateway for ScriptedPlanner {
    async fn request(&self, request: &PlanningRequest) -> Result<String, PlannerGatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(reply) = self.replies.lock().unwrap().pop_front() {
            return reply;
        }
        self.fallback.clone().ok_or(PlannerGatewayError::Exhausted)
    }
}

/// Agent that echoes the task after a per-task delay and tracks how many
/// calls were in flight at once.
pub struct DelayAgent {
    delays: HashMap<String, u64>,
    default_delay_ms: u64,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    contexts: Mutex<Vec<String>>,
}

impl DelayAgent {
    pub fn new() -> Self {
        Self {
            delays: HashMap::new(),
            default_delay_ms: 0,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, task: &str, delay_ms: u64) -> Self {
        self.delays.insert(task.to_string(), delay_ms);
        self
    }

    pub fn with_default_delay(mut self, delay_ms: u64) -> Self {
        self.default_delay_ms = delay_ms;
        self
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentExecutor for DelayAgent {
    async fn execute(&self, task: &str, context: &str) -> Result<String, AgentError> {
        self.contexts.lock().unwrap().push(context.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(task).copied().unwrap_or(self.default_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("done: {}", task))
    }
}

/// Agent that always fails.
pub struct FailingAgent(pub &'static str);

#[async_trait]
impl AgentExecutor for FailingAgent {
    async fn execute(&self, _task: &str, _context: &str) -> Result<String, AgentError> {
        Err(AgentError::ExecutionFailed(self.0.to_string()))
    }
}

/// Agent that panics.
pub struct PanickingAgent;

#[async_trait]
impl AgentExecutor for PanickingAgent {
    async fn execute(&self, _task: &str, _context: &str) -> Result<String, AgentError> {
        panic!("agent blew up");
    }
}

/// Run logger that keeps every event in memory.
#[derive(Default)]
pub struct RecordingRunLogger {
    events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingRunLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl RunLogger for RecordingRunLogger {
    fn log(&self, event: RunEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}

/// Registry with one agent per `(name, executor)` pair.
pub fn registry(agents: Vec<(&str, Arc<dyn AgentExecutor>)>) -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    for (name, executor) in agents {
        registry
            .register(AgentDescriptor::new(name, ""), executor)
            .unwrap();
    }
    registry
}
