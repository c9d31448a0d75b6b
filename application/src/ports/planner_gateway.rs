//! Planner Gateway port
//!
//! Defines the interface for reaching the planner collaborator. The gateway
//! only transports text; parsing and validation stay in the application
//! layer.

use async_trait::async_trait;
use conductor_domain::{AgentDescriptor, PlanningMode};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while talking to the planner
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlannerGatewayError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("No more planner replies available")]
    Exhausted,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Everything the planner needs to produce its next answer.
///
/// `system` holds the standing planner instructions and `prompt` the fully
/// rendered turn. Adapters backed by a language model send both as is;
/// structured adapters may use the other fields instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningRequest {
    pub objective: String,
    /// Markup rendering of the run so far.
    pub history: String,
    pub mode: PlanningMode,
    pub agents: Vec<AgentDescriptor>,
    /// Why the previous attempt was rejected, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    /// 1-based attempt number within the current planning round.
    pub attempt: usize,
    pub system: String,
    pub prompt: String,
}

/// Gateway for planner communication
#[async_trait]
pub trait PlannerGateway: Send + Sync {
    async fn request(&self, request: &PlanningRequest) -> Result<String, PlannerGatewayError>;
}
