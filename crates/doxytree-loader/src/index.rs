//! Staged index loading, cleanup and lookup

use std::path::{Path, PathBuf};

use doxytree_core::{
    Config, DetailSource, Error, FinalizeContext, FinalizeReport, Node, NodeCache, NodeId,
    OwnershipViolation, Result, TextPrinter, Tree, finalize_tree,
};
use tracing::{debug, info, warn};

use crate::detail::XmlDetailSource;
use crate::manifest::{RefMap, read_manifest};
use crate::resolver::{EntityResolver, XmlResolver};
use crate::stage::Stage;

/// A manifest entry that could not be materialized.
#[derive(Debug)]
pub struct LoadFailure {
    pub kind: String,
    pub refid: String,
    pub error: Error,
}

/// Outcome of one stage.
#[derive(Debug)]
pub struct StageReport {
    pub stage: Stage,
    /// Entries materialized by this stage.
    pub resolved: usize,
    /// Entries skipped because they were already cached.
    pub skipped: usize,
    /// Top-level entries removed by cleanup because another node claimed them.
    pub reparented: usize,
    pub failures: Vec<LoadFailure>,
}

impl StageReport {
    fn new(stage: Stage) -> Self {
        StageReport {
            stage,
            resolved: 0,
            skipped: 0,
            reparented: 0,
            failures: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadReport {
    pub stages: Vec<StageReport>,
    /// Ownership problems left in the final tree. Empty for any well-behaved resolver.
    pub violations: Vec<OwnershipViolation>,
}

impl LoadReport {
    pub fn failures(&self) -> impl Iterator<Item = &LoadFailure> {
        self.stages.iter().flat_map(|s| s.failures.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.stages.iter().map(|s| s.failures.len()).sum()
    }

    pub fn resolved(&self) -> usize {
        self.stages.iter().map(|s| s.resolved).sum()
    }
}

/// The loaded documentation index: the tree and its ownership cache, kept in step.
pub struct Index {
    input_dir: PathBuf,
    tree: Tree,
    cache: NodeCache,
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Index")
            .field("input_dir", &self.input_dir)
            .field("node_count", &self.tree.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl Index {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Index {
            input_dir: input_dir.into(),
            tree: Tree::new(),
            cache: NodeCache::new(),
        }
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Load the manifest and every compound from the input directory.
    /// Only manifest errors are returned; per-entity failures are in the report.
    pub fn load(&mut self) -> Result<LoadReport> {
        let mut resolver = XmlResolver::new(&self.input_dir);
        self.load_with(&mut resolver)
    }

    /// Like [`Index::load`], with a caller-supplied resolver.
    pub fn load_with<R: EntityResolver + ?Sized>(&mut self, resolver: &mut R) -> Result<LoadReport> {
        let refs = read_manifest(&self.input_dir)?;
        Ok(self.load_refs(&refs, resolver))
    }

    /// Run every stage over an already decoded reference map, then rebuild the cache
    /// from the final tree.
    pub fn load_refs<R: EntityResolver + ?Sized>(&mut self, refs: &RefMap, resolver: &mut R) -> LoadReport {
        let mut report = LoadReport::default();

        for stage in Stage::ALL {
            report.stages.push(self.run_stage(stage, refs, resolver));
        }

        self.cache.rebuild(&self.tree);

        report.violations = self.tree.ownership_violations();
        for violation in &report.violations {
            warn!("Ownership violation after load: {:?}", violation);
        }

        info!(
            "Loaded {} nodes ({} top-level), {} entries failed",
            self.cache.len(),
            self.tree.children(self.tree.root()).len(),
            report.failure_count()
        );
        report
    }

    /// One pass over `refs` restricted to the kinds `stage` admits, followed by cleanup.
    pub(crate) fn run_stage<R: EntityResolver + ?Sized>(
        &mut self,
        stage: Stage,
        refs: &RefMap,
        resolver: &mut R,
    ) -> StageReport {
        let mut report = StageReport::new(stage);
        let root = self.tree.root();

        for entry in refs.iter().filter(|e| stage.allows(&e.kind)) {
            if self.cache.contains(&entry.refid) {
                report.skipped += 1;
                continue;
            }

            match resolver.resolve(&mut self.tree, &mut self.cache, &entry.refid, stage.deep()) {
                Ok(id) => {
                    self.tree.push_child(root, id);
                    if self.tree.parent(id).is_none() {
                        self.tree.set_parent(id, Some(root));
                    }
                    report.resolved += 1;
                }
                Err(error) => {
                    warn!("Failed to parse member {} error: {}", entry.refid, error);
                    report.failures.push(LoadFailure {
                        kind: entry.kind.clone(),
                        refid: entry.refid.clone(),
                        error,
                    });
                }
            }
        }

        report.reparented = self.cleanup();
        debug!(
            "Stage {}: {} resolved, {} skipped, {} reparented, {} failed",
            stage,
            report.resolved,
            report.skipped,
            report.reparented,
            report.failures.len()
        );
        report
    }

    /// Drop top-level entries whose parent has since been set to another node.
    pub(crate) fn cleanup(&mut self) -> usize {
        let root = self.tree.root();
        self.tree
            .retain_children(root, |tree, child| tree.parent(child) == Some(root))
            .len()
    }

    /// The node materialized for `refid`.
    pub fn find(&self, refid: &str) -> Result<&Node> {
        let id = self.find_id(refid)?;
        self.tree
            .node(id)
            .ok_or_else(|| Error::NodeNotFound(refid.to_string()))
    }

    pub fn find_id(&self, refid: &str) -> Result<NodeId> {
        self.cache.find(refid)
    }

    /// Load full detail for every node from the input directory.
    pub fn finalize(&mut self, config: &Config, printer: &dyn TextPrinter) -> FinalizeReport {
        let mut source = XmlDetailSource::new(&self.input_dir);
        self.finalize_with(&mut source, config, printer)
    }

    pub fn finalize_with(
        &mut self,
        source: &mut dyn DetailSource,
        config: &Config,
        printer: &dyn TextPrinter,
    ) -> FinalizeReport {
        let ctx = FinalizeContext {
            config,
            printer,
            cache: &self.cache,
        };
        finalize_tree(&mut self.tree, source, &ctx)
    }
}
