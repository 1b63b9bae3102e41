//! Second pass: load full detail for every node of a settled tree

use tracing::{debug, info, warn};

use crate::cache::NodeCache;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{NodeDetail, NodeId};
use crate::text::{PrintContext, TextPrinter};
use crate::tree::Tree;

/// Collaborators handed to every finalize call.
#[derive(Clone, Copy)]
pub struct FinalizeContext<'a> {
    pub config: &'a Config,
    pub printer: &'a dyn TextPrinter,
    pub cache: &'a NodeCache,
}

impl<'a> FinalizeContext<'a> {
    pub fn print_context<'t>(&self, tree: &'t Tree) -> PrintContext<'t>
    where
        'a: 't,
    {
        PrintContext {
            tree,
            cache: self.cache,
            config: self.config,
        }
    }
}

/// Produces the full content of one node. Implementations read whatever source
/// describes the node; cross-references go through `ctx.cache`.
pub trait DetailSource {
    fn detail(&mut self, tree: &Tree, id: NodeId, ctx: &FinalizeContext<'_>) -> Result<NodeDetail>;
}

/// A node whose detail could not be loaded.
#[derive(Debug)]
pub struct FinalizeFailure {
    pub id: NodeId,
    pub refid: Option<String>,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct FinalizeReport {
    pub finalized: usize,
    pub failures: Vec<FinalizeFailure>,
}

impl FinalizeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Finalize every node below the root, parents before children. A failing node is
/// recorded and skipped; its siblings and descendants are still finalized.
pub fn finalize_tree(
    tree: &mut Tree,
    source: &mut dyn DetailSource,
    ctx: &FinalizeContext<'_>,
) -> FinalizeReport {
    let mut report = FinalizeReport::default();

    for id in tree.descendants(tree.root()) {
        match source.detail(tree, id, ctx) {
            Ok(detail) => {
                if let Some(node) = tree.node_mut(id) {
                    debug!("Finalized {}", node.refid().unwrap_or("<root>"));
                    node.detail = Some(detail);
                }
                report.finalized += 1;
            }
            Err(error) => {
                let refid = tree[id].refid.clone();
                warn!(
                    "Failed to finalize {} error: {}",
                    refid.as_deref().unwrap_or("<root>"),
                    error
                );
                report.failures.push(FinalizeFailure { id, refid, error });
            }
        }
    }

    info!(
        "Finalized {} nodes, {} failed",
        report.finalized,
        report.failures.len()
    );
    report
}
