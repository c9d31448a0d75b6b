//! Use cases (application services)
//!
//! - [`plan_client`]: validated access to the planner
//! - [`execute_step`]: parallel fan-out and ordered join of one step
//! - [`orchestrate`]: the plan-execute-replan state machine
//! - [`synthesize`]: step and final summaries written by an agent

pub mod execute_step;
pub mod orchestrate;
pub mod plan_client;
pub(crate) mod shared;
pub mod synthesize;

#[cfg(test)]
pub(crate) mod test_support;
