//! Routing table for agent discovery

use dashmap::DashMap;
use std::sync::Arc;

use agent_runtime::AgentInfo;

use crate::{CommsError, Result};

/// Routing table from agent id or name to agent identity
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: Arc<DashMap<String, AgentInfo>>,
    names: Arc<DashMap<String, String>>, // lowercased name -> agent ID
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent; ids and names must both be unique
    ///
    /// Names are compared ignoring case, so "alice" and "Alice" cannot
    /// both be registered.
    pub fn register(&self, info: AgentInfo) -> Result<()> {
        if self.agents.contains_key(&info.id) {
            return Err(CommsError::duplicate(format!("id {}", info.id)));
        }
        let key = name_key(&info.name);
        if self.names.contains_key(&key) {
            return Err(CommsError::duplicate(format!("name {}", info.name)));
        }

        self.names.insert(key, info.id.clone());
        tracing::debug!("Registered agent: {}", info);
        self.agents.insert(info.id.clone(), info);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<AgentInfo> {
        self.agents.get(id).map(|a| a.clone())
    }

    /// Resolve a target given as id or name
    ///
    /// An id wins over a name; names match ignoring case.
    pub fn resolve(&self, target: &str) -> Result<AgentInfo> {
        let target = target.trim();

        if let Some(info) = self.lookup(target) {
            return Ok(info);
        }

        self.names
            .get(&name_key(target))
            .and_then(|id| self.lookup(id.value()))
            .ok_or_else(|| CommsError::unknown_recipient(target))
    }

    /// Every agent, ordered by name
    pub fn list_all(&self) -> Vec<AgentInfo> {
        let mut agents: Vec<AgentInfo> = self.agents.iter().map(|e| e.value().clone()).collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Every agent except the one with this id, ordered by name
    pub fn peers_of(&self, id: &str) -> Vec<AgentInfo> {
        self.list_all().into_iter().filter(|a| a.id != id).collect()
    }
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str) -> AgentInfo {
        AgentInfo {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    fn registry() -> AgentRegistry {
        let registry = AgentRegistry::new();
        registry.register(info("aaaaaa", "Alice")).unwrap();
        registry.register(info("bbbbbb", "Bob")).unwrap();
        registry
    }

    #[test]
    fn test_resolve_by_id_and_name() {
        let registry = registry();
        assert_eq!(registry.resolve("bbbbbb").unwrap().name, "Bob");
        assert_eq!(registry.resolve("Bob").unwrap().id, "bbbbbb");
        assert_eq!(registry.resolve(" bob ").unwrap().id, "bbbbbb");
    }

    #[test]
    fn test_unknown_recipient() {
        let registry = registry();
        assert!(matches!(
            registry.resolve("Zed"),
            Err(CommsError::UnknownRecipient(name)) if name == "Zed"
        ));
    }

    #[test]
    fn test_duplicates_rejected() {
        let registry = registry();
        assert!(matches!(
            registry.register(info("aaaaaa", "Other")),
            Err(CommsError::DuplicateAgent(_))
        ));
        assert!(matches!(
            registry.register(info("cccccc", "Alice")),
            Err(CommsError::DuplicateAgent(_))
        ));
        assert!(matches!(
            registry.register(info("dddddd", "ALICE")),
            Err(CommsError::DuplicateAgent(_))
        ));
        assert_eq!(registry.list_all().len(), 2);
        assert_eq!(registry.resolve("alice").unwrap().id, "aaaaaa");
    }

    #[test]
    fn test_id_wins_over_name() {
        let registry = registry();
        registry.register(info("cccccc", "bbbbbb")).unwrap();
        assert_eq!(registry.resolve("bbbbbb").unwrap().name, "Bob");
        assert_eq!(registry.resolve("BBBBBB").unwrap().id, "cccccc");
    }

    #[test]
    fn test_peers_exclude_self() {
        let registry = registry();
        let peers = registry.peers_of("aaaaaa");
        assert_eq!(peers.len(), 1);
        assert_eq!(peers[0].name, "Bob");
        assert_eq!(registry.list_all()[0].name, "Alice");
    }
}
