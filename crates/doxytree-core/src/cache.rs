//! Ownership cache: refid -> node handle

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::model::NodeId;
use crate::tree::Tree;

/// Flat lookup from reference identifier to the node materialized for it.
/// Passed explicitly through every resolver call; there is no global instance.
#[derive(Debug, Default, Clone)]
pub struct NodeCache {
    entries: HashMap<String, NodeId>,
}

impl NodeCache {
    pub fn new() -> Self {
        NodeCache {
            entries: HashMap::new(),
        }
    }

    /// Register a node. Returns the previous entry for `refid`, if any.
    pub fn insert(&mut self, refid: impl Into<String>, id: NodeId) -> Option<NodeId> {
        self.entries.insert(refid.into(), id)
    }

    pub fn get(&self, refid: &str) -> Option<NodeId> {
        self.entries.get(refid).copied()
    }

    pub fn contains(&self, refid: &str) -> bool {
        self.entries.contains_key(refid)
    }

    /// Look up a refid that is expected to exist.
    pub fn find(&self, refid: &str) -> Result<NodeId> {
        self.get(refid)
            .ok_or_else(|| Error::NodeNotFound(refid.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all registered refids.
    pub fn refids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the contents with exactly the nodes reachable from the root.
    pub fn rebuild(&mut self, tree: &Tree) {
        self.entries.clear();
        for id in tree.descendants(tree.root()) {
            if let Some(refid) = tree[id].refid() {
                self.entries.insert(refid.to_string(), id);
            }
        }
        tracing::debug!("Cache rebuilt with {} entries", self.entries.len());
    }
}
