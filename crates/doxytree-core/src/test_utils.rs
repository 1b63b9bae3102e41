//! Test utilities for building small trees by hand

use crate::model::{Node, NodeId, NodeKind, Origin};
use crate::tree::Tree;
use crate::cache::NodeCache;

/// Attach a new compound node below `parent`, registering it in `cache`.
pub fn add_compound(
    tree: &mut Tree,
    cache: &mut NodeCache,
    parent: NodeId,
    refid: &str,
    kind: NodeKind,
    name: &str,
) -> NodeId {
    let id = tree.add_node(Node::new(refid, kind, name, Origin::Compound));
    tree.push_child(parent, id);
    tree.set_parent(id, Some(parent));
    cache.insert(refid, id);
    id
}

/// Attach a new member node below `parent`, declared in the source of `declared_in`.
pub fn add_member(
    tree: &mut Tree,
    cache: &mut NodeCache,
    parent: NodeId,
    refid: &str,
    kind: NodeKind,
    name: &str,
    declared_in: &str,
) -> NodeId {
    let origin = Origin::Member {
        declared_in: declared_in.to_string(),
    };
    let id = tree.add_node(Node::new(refid, kind, name, origin));
    tree.push_child(parent, id);
    tree.set_parent(id, Some(parent));
    cache.insert(refid, id);
    id
}

/// `index -> namespace ui -> class ui::Button -> function press`, plus a top-level group.
pub fn sample_tree() -> (Tree, NodeCache) {
    let mut tree = Tree::new();
    let mut cache = NodeCache::new();
    let root = tree.root();

    let ns = add_compound(&mut tree, &mut cache, root, "namespaceui", NodeKind::Namespace, "ui");
    let class = add_compound(&mut tree, &mut cache, ns, "classui_1_1Button", NodeKind::Class, "ui::Button");
    add_member(
        &mut tree,
        &mut cache,
        class,
        "classui_1_1Button_1press",
        NodeKind::Function,
        "press",
        "classui_1_1Button",
    );
    add_compound(&mut tree, &mut cache, root, "group__widgets", NodeKind::Group, "widgets");

    (tree, cache)
}
