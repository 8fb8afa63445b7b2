//! The per-agent path index.

use std::collections::BTreeMap;
use std::sync::Arc;

use ap_core::AgentId;

use crate::ActivityPath;

/// `AgentId → paths`, each agent's list in upstream order.
///
/// A `BTreeMap` keeps iteration (and therefore [`PathIndex::all_paths`])
/// identical across processes, which matters when several clients must
/// agree on round-robin order.
#[derive(Clone, Debug, Default)]
pub struct PathIndex {
    by_agent:   BTreeMap<AgentId, Vec<Arc<ActivityPath>>>,
    path_count: usize,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from paths in upstream order.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = ActivityPath>,
    {
        let mut index = Self::new();
        for path in paths {
            index.insert(path);
        }
        index
    }

    /// Append `path` to its agent's list.  Only used while building; a
    /// published index is never modified.
    pub(crate) fn insert(&mut self, path: ActivityPath) {
        self.by_agent
            .entry(path.agent_id.clone())
            .or_default()
            .push(Arc::new(path));
        self.path_count += 1;
    }

    /// Paths for `agent`, empty if it has none.
    pub fn paths_for(&self, agent: &str) -> &[Arc<ActivityPath>] {
        self.by_agent.get(agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every path, flattened in agent-id order.
    pub fn all_paths(&self) -> Vec<Arc<ActivityPath>> {
        self.by_agent.values().flatten().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AgentId, &[Arc<ActivityPath>])> + '_ {
        self.by_agent.iter().map(|(id, paths)| (id, paths.as_slice()))
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentId> + '_ {
        self.by_agent.keys()
    }

    pub fn contains_agent(&self, agent: &str) -> bool {
        self.by_agent.contains_key(agent)
    }

    pub fn agent_count(&self) -> usize {
        self.by_agent.len()
    }

    pub fn path_count(&self) -> usize {
        self.path_count
    }

    pub fn is_empty(&self) -> bool {
        self.path_count == 0
    }
}
