//! Agent registry
//!
//! Flat, name-keyed registry of the agents a run may dispatch to. The
//! planner sees the descriptors; the step executor resolves names to
//! executors.

use crate::ports::agent_executor::AgentExecutor;
use conductor_domain::{AgentDescriptor, AgentLookup};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Agent '{0}' is already registered")]
    Duplicate(String),

    #[error("Agent name must not be empty")]
    EmptyName,
}

#[derive(Clone)]
struct RegisteredAgent {
    descriptor: AgentDescriptor,
    executor: Arc<dyn AgentExecutor>,
}

/// Name-keyed set of agents. Iteration order is by name.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<String, RegisteredAgent>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        descriptor: AgentDescriptor,
        executor: Arc<dyn AgentExecutor>,
    ) -> Result<(), RegistryError> {
        if descriptor.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.agents.contains_key(&descriptor.name) {
            return Err(RegistryError::Duplicate(descriptor.name));
        }
        self.agents.insert(
            descriptor.name.clone(),
            RegisteredAgent {
                descriptor,
                executor,
            },
        );
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_agent(
        mut self,
        descriptor: AgentDescriptor,
        executor: Arc<dyn AgentExecutor>,
    ) -> Result<Self, RegistryError> {
        self.register(descriptor, executor)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AgentExecutor>> {
        self.agents.get(name).map(|a| Arc::clone(&a.executor))
    }

    pub fn descriptors(&self) -> Vec<AgentDescriptor> {
        self.agents.values().map(|a| a.descriptor.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl AgentLookup for AgentRegistry {
    fn has_agent(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agents", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::agent_executor::AgentError;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl AgentExecutor for Noop {
        async fn execute(&self, task: &str, _context: &str) -> Result<String, AgentError> {
            Ok(task.to_string())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = AgentRegistry::new()
            .with_agent(AgentDescriptor::new("organizer", "Moves files"), Arc::new(Noop))
            .unwrap()
            .with_agent(AgentDescriptor::new("analyst", ""), Arc::new(Noop))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.has_agent("organizer"));
        assert!(!registry.has_agent("sorter"));
        assert!(registry.get("analyst").is_some());
        assert!(registry.get("sorter").is_none());
        // Sorted by name
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["analyst", "organizer"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = AgentRegistry::new();
        registry
            .register(AgentDescriptor::new("a", ""), Arc::new(Noop))
            .unwrap();
        let err = registry
            .register(AgentDescriptor::new("a", "again"), Arc::new(Noop))
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("a".to_string()));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = AgentRegistry::new()
            .with_agent(AgentDescriptor::new("  ", ""), Arc::new(Noop))
            .unwrap_err();
        assert_eq!(err, RegistryError::EmptyName);
    }
}
