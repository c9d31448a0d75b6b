//! Agent descriptors and name lookup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Public description of an agent, as shown to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub name: String,
    /// What the agent is good at. Rendered into the planner prompt.
    #[serde(default)]
    pub instruction: String,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

/// Resolves agent names against a flat registry.
pub trait AgentLookup {
    fn has_agent(&self, name: &str) -> bool;
}

impl AgentLookup for [AgentDescriptor] {
    fn has_agent(&self, name: &str) -> bool {
        self.iter().any(|a| a.name == name)
    }
}

impl AgentLookup for Vec<AgentDescriptor> {
    fn has_agent(&self, name: &str) -> bool {
        self.as_slice().has_agent(name)
    }
}

impl AgentLookup for BTreeSet<String> {
    fn has_agent(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl AgentLookup for HashSet<String> {
    fn has_agent(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<V> AgentLookup for BTreeMap<String, V> {
    fn has_agent(&self, name: &str) -> bool {
        self.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_lookup() {
        let agents = vec![
            AgentDescriptor::new("organizer", "Moves files"),
            AgentDescriptor::new("writer", "Writes reports"),
        ];
        assert!(agents.has_agent("organizer"));
        assert!(!agents.has_agent("Organizer"));
        assert!(!agents.has_agent(""));
    }

    #[test]
    fn test_set_lookup() {
        let names: BTreeSet<String> = ["fs".to_string()].into_iter().collect();
        assert!(names.has_agent("fs"));
        assert!(!names.has_agent("web"));
    }

    #[test]
    fn test_instruction_defaults_to_empty() {
        let agent: AgentDescriptor = serde_json::from_str(r#"{"name": "fs"}"#).unwrap();
        assert_eq!(agent.instruction, "");
    }
}
