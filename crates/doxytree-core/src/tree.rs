//! Arena-backed documentation tree with non-owning parent links

use crate::model::*;

/// The documentation tree. Nodes live in an arena and are never freed individually;
/// ownership flows through `children`, `parent` is only a back reference.
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl std::fmt::Debug for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tree")
            .field("node_count", &self.nodes.len())
            .field("root_children", &self.nodes[self.root.index()].children.len())
            .finish()
    }
}

/// A broken parent/child link found by [`Tree::ownership_violations`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipViolation {
    /// `child` is listed under `listed_by` but points at another parent.
    StaleListing {
        child: NodeId,
        listed_by: NodeId,
        parent: Option<NodeId>,
    },
    /// `child` is listed more than once across the reachable tree.
    DuplicateListing { child: NodeId },
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::root()],
            root: NodeId(0),
        }
    }

    /// The synthetic `index` node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a detached node. Returns its assigned id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Total number of nodes in the arena, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Record `parent` as the owner of `id`. Does not touch any child list.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.parent = parent;
        }
    }

    /// Append `child` to the child list of `parent`. Does not touch `child.parent`.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
    }

    /// Keep only the children of `parent` for which `keep` returns true.
    /// Returns the removed ids in their original order.
    pub fn retain_children<F>(&mut self, parent: NodeId, mut keep: F) -> Vec<NodeId>
    where
        F: FnMut(&Tree, NodeId) -> bool,
    {
        let Some(node) = self.node_mut(parent) else {
            return Vec::new();
        };
        let children = std::mem::take(&mut node.children);

        let mut kept = Vec::with_capacity(children.len());
        let mut removed = Vec::new();
        for child in children {
            if keep(self, child) {
                kept.push(child);
            } else {
                removed.push(child);
            }
        }

        if let Some(node) = self.node_mut(parent) {
            node.children = kept;
        }
        removed
    }

    /// All nodes below `id` in depth-first order, parents before children.
    /// `id` itself is not included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }

        out
    }

    /// Walk the parent chain from `id` (exclusive) up to the root (inclusive).
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Find a node below the root by name (first match in tree order).
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&id| self.node(id).is_some_and(|n| n.name == name))
    }

    /// Reachable nodes of a specific kind, in tree order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| self.node(id).is_some_and(|n| n.kind == kind))
            .collect()
    }

    /// Check that every reachable child points back at the node listing it and
    /// that no node is listed twice.
    pub fn ownership_violations(&self) -> Vec<OwnershipViolation> {
        let mut violations = Vec::new();
        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            for &child in self.children(current) {
                let parent = self.parent(child);
                if parent != Some(current) {
                    violations.push(OwnershipViolation::StaleListing {
                        child,
                        listed_by: current,
                        parent,
                    });
                }
                if std::mem::replace(&mut seen[child.index()], true) {
                    violations.push(OwnershipViolation::DuplicateListing { child });
                    continue;
                }
                stack.push(child);
            }
        }

        violations
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
