//! Entity resolution: per-compound XML into tree nodes
//!
//! Resolution happens in two steps. Planning reads and parses every source the new
//! subtree needs without touching the tree or the cache, so any failure leaves both
//! untouched. Committing the plan then cannot fail: it allocates the nodes, links
//! children, takes over stray top-level nodes and registers everything in the cache.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use doxytree_core::{Error, Node, NodeCache, NodeId, NodeKind, Origin, Result, Tree};
use roxmltree::Document;
use tracing::debug;

use crate::xml;

/// Inner-compound references a `compounddef` may declare.
const INNER_TAGS: [&str; 5] = ["innernamespace", "innerclass", "innergroup", "innerdir", "innerfile"];

/// `<input_dir>/<name>.xml`. Names come from the XML itself, so anything that could
/// leave `input_dir` is refused.
pub(crate) fn source_path(input_dir: &Path, name: &str) -> std::result::Result<PathBuf, String> {
    if name.is_empty() || name.contains("..") || name.contains(['/', '\\']) {
        return Err(format!("Invalid source name {:?}", name));
    }
    Ok(input_dir.join(format!("{}.xml", name)))
}

/// Materializes the node for a refid.
///
/// Implementations must return the cached node unchanged when `refid` is already in
/// `cache`, register every node they create, and either create the whole subtree or
/// nothing at all.
pub trait EntityResolver {
    fn resolve(
        &mut self,
        tree: &mut Tree,
        cache: &mut NodeCache,
        refid: &str,
        deep: bool,
    ) -> Result<NodeId>;
}

/// Reads `<input_dir>/<refid>.xml` as written by Doxygen.
#[derive(Debug, Clone)]
pub struct XmlResolver {
    input_dir: PathBuf,
}

impl XmlResolver {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        XmlResolver {
            input_dir: input_dir.into(),
        }
    }
}

impl EntityResolver for XmlResolver {
    fn resolve(
        &mut self,
        tree: &mut Tree,
        cache: &mut NodeCache,
        refid: &str,
        deep: bool,
    ) -> Result<NodeId> {
        if let Some(existing) = cache.get(refid) {
            return Ok(existing);
        }

        let plan = Planner::new(&self.input_dir, tree, cache, deep).plan_compound(refid)?;
        let before = tree.len();
        let id = commit(tree, cache, plan);
        debug!("Resolved {} with {} new nodes", refid, tree.len() - before);
        Ok(id)
    }
}

/// A node waiting to be committed.
#[derive(Debug)]
struct Planned {
    node: Node,
    children: Vec<PlannedChild>,
}

#[derive(Debug)]
enum PlannedChild {
    New(Planned),
    /// An existing top-level node the new parent takes over.
    Claim(NodeId),
}

struct Planner<'a> {
    input_dir: &'a Path,
    tree: &'a Tree,
    cache: &'a NodeCache,
    deep: bool,
    planned: HashSet<String>,
    in_progress: Vec<String>,
}

impl<'a> Planner<'a> {
    fn new(input_dir: &'a Path, tree: &'a Tree, cache: &'a NodeCache, deep: bool) -> Self {
        Planner {
            input_dir,
            tree,
            cache,
            deep,
            planned: HashSet::new(),
            in_progress: Vec::new(),
        }
    }

    fn plan_compound(&mut self, refid: &str) -> Result<Planned> {
        let path = source_path(self.input_dir, refid).map_err(|e| Error::resolution(refid, e))?;
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::resolution(refid, format!("{}: {}", path.display(), e)))?;
        let doc = Document::parse(&text)
            .map_err(|e| Error::resolution(refid, format!("{}: {}", path.display(), e)))?;

        let root = doc.root_element();
        if root.tag_name().name() != "doxygen" {
            return Err(Error::resolution(
                refid,
                format!("Element doxygen not found in file {}", path.display()),
            ));
        }
        let def = xml::children(root, "compounddef")
            .find(|d| d.attribute("id") == Some(refid))
            .ok_or_else(|| {
                Error::resolution(
                    refid,
                    format!("No compounddef with id {} in file {}", refid, path.display()),
                )
            })?;
        let kind: NodeKind = def
            .attribute("kind")
            .unwrap_or_default()
            .parse()
            .map_err(|e| Error::resolution(refid, e))?;

        let name = xml::child_text(def, "compoundname").unwrap_or_else(|| refid.to_string());
        let mut node = Node::new(refid, kind, name, Origin::Compound);
        if self.deep {
            node.brief = Some(brief_of(def));
        }

        self.planned.insert(refid.to_string());
        self.in_progress.push(refid.to_string());

        let mut children = Vec::new();
        let result = self.plan_inner(def, refid, &mut children);
        self.in_progress.pop();
        result?;

        Ok(Planned { node, children })
    }

    fn plan_inner(
        &mut self,
        def: roxmltree::Node,
        refid: &str,
        children: &mut Vec<PlannedChild>,
    ) -> Result<()> {
        let inner = def
            .children()
            .filter(|c| c.is_element() && INNER_TAGS.contains(&c.tag_name().name()));
        for element in inner {
            let Some(child_refid) = xml::attr(element, "refid") else {
                continue;
            };
            if let Some(child) = self.plan_reference(child_refid, |p| p.plan_compound(child_refid))? {
                children.push(child);
            }
        }

        for member in xml::children(def, "sectiondef").flat_map(|s| xml::children(s, "memberdef")) {
            if let Some(child) = self.plan_member(member, refid)? {
                children.push(child);
            }
        }
        Ok(())
    }

    fn plan_member(&mut self, member: roxmltree::Node, declared_in: &str) -> Result<Option<PlannedChild>> {
        let Some(member_refid) = xml::attr(member, "id") else {
            return Ok(None);
        };
        let kind_name = member.attribute("kind").unwrap_or_default();
        let Ok(kind) = kind_name.parse::<NodeKind>() else {
            debug!("Skipping member {} of kind {}", member_refid, kind_name);
            return Ok(None);
        };

        self.plan_reference(member_refid, |p| {
            let name = xml::child_text(member, "name").unwrap_or_else(|| member_refid.to_string());
            let mut node = Node::new(member_refid, kind, name, p.member_origin(declared_in));
            if p.deep {
                node.brief = Some(brief_of(member));
            }
            p.planned.insert(member_refid.to_string());

            let mut children = Vec::new();
            for value in xml::children(member, "enumvalue") {
                if let Some(child) = p.plan_enum_value(value, declared_in)? {
                    children.push(child);
                }
            }
            Ok(Planned { node, children })
        })
    }

    fn plan_enum_value(&mut self, value: roxmltree::Node, declared_in: &str) -> Result<Option<PlannedChild>> {
        let Some(value_refid) = xml::attr(value, "id") else {
            return Ok(None);
        };
        self.plan_reference(value_refid, |p| {
            let name = xml::child_text(value, "name").unwrap_or_else(|| value_refid.to_string());
            let mut node = Node::new(value_refid, NodeKind::EnumValue, name, p.member_origin(declared_in));
            if p.deep {
                node.brief = Some(brief_of(value));
            }
            p.planned.insert(value_refid.to_string());
            Ok(Planned {
                node,
                children: Vec::new(),
            })
        })
    }

    /// Decide how a declared child is attached: planned fresh, claimed from the top
    /// level, or skipped because it is owned elsewhere, already handled, or an
    /// ancestor in the current plan.
    fn plan_reference<F>(&mut self, refid: &str, plan: F) -> Result<Option<PlannedChild>>
    where
        F: FnOnce(&mut Self) -> Result<Planned>,
    {
        if self.in_progress.iter().any(|r| r == refid) {
            debug!("Reference cycle through {}", refid);
            return Ok(None);
        }
        if self.planned.contains(refid) {
            return Ok(None);
        }

        if let Some(existing) = self.cache.get(refid) {
            let parent = self.tree.parent(existing);
            if parent.is_none() || parent == Some(self.tree.root()) {
                self.planned.insert(refid.to_string());
                return Ok(Some(PlannedChild::Claim(existing)));
            }
            debug!("{} already owned, not claiming", refid);
            return Ok(None);
        }

        plan(self).map(|p| Some(PlannedChild::New(p)))
    }

    fn member_origin(&self, declared_in: &str) -> Origin {
        Origin::Member {
            declared_in: declared_in.to_string(),
        }
    }
}

fn brief_of(element: roxmltree::Node) -> String {
    xml::child_text(element, "briefdescription").unwrap_or_default()
}

fn commit(tree: &mut Tree, cache: &mut NodeCache, plan: Planned) -> NodeId {
    let Planned { node, children } = plan;
    let refid = node.refid.clone();
    let id = tree.add_node(node);
    if let Some(refid) = refid {
        cache.insert(refid, id);
    }

    for child in children {
        let child_id = match child {
            PlannedChild::New(planned) => commit(tree, cache, planned),
            PlannedChild::Claim(existing) => {
                debug!(
                    "{} takes over {}",
                    tree[id].refid().unwrap_or_default(),
                    tree[existing].refid().unwrap_or_default()
                );
                existing
            }
        };
        tree.push_child(id, child_id);
        tree.set_parent(child_id, Some(id));
    }
    id
}
