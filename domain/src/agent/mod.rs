//! Agent domain module
//!
//! Agents are the external collaborators that execute tasks. The domain only
//! knows their names and instructions; how an agent does its work lives
//! behind the application layer's `AgentExecutor` port.

pub mod descriptor;

pub use descriptor::{AgentDescriptor, AgentLookup};
