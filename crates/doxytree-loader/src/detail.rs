//! Full detail loading from Doxygen XML for the finalize pass

use std::collections::HashMap;
use std::path::PathBuf;

use doxytree_core::{
    DetailSource, Error, FinalizeContext, Location, NodeDetail, NodeId, Origin, PrintContext,
    Reference, Result, TextPrinter, Tree,
};
use roxmltree::Document;
use tracing::debug;

use crate::resolver::source_path;
use crate::xml;

/// Re-reads the source each node was declared in. Every file is read and parsed
/// once, on the first node that needs it; the detail of every definition in it is
/// extracted then and handed out as nodes ask for it.
///
/// Extracted detail depends on the tree and cache of the finalize run, so use one
/// value per run.
#[derive(Debug)]
pub struct XmlDetailSource {
    input_dir: PathBuf,
    files: HashMap<String, HashMap<String, Result<NodeDetail>>>,
}

impl XmlDetailSource {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        XmlDetailSource {
            input_dir: input_dir.into(),
            files: HashMap::new(),
        }
    }

    /// Number of source files parsed so far.
    pub fn files_parsed(&self) -> usize {
        self.files.len()
    }

    fn load(&mut self, refid: &str, file: &str, ctx: &PrintContext<'_>, printer: &dyn TextPrinter) -> Result<()> {
        if self.files.contains_key(file) {
            return Ok(());
        }

        let path = source_path(&self.input_dir, file).map_err(|e| Error::resolution(refid, e))?;
        let text = std::fs::read_to_string(&path)
            .map_err(|e| Error::resolution(refid, format!("{}: {}", path.display(), e)))?;
        let doc = Document::parse(&text)
            .map_err(|e| Error::resolution(refid, format!("{}: {}", path.display(), e)))?;

        let mut details = HashMap::new();
        let definitions = doc.descendants().filter(|n| {
            n.is_element() && matches!(n.tag_name().name(), "compounddef" | "memberdef" | "enumvalue")
        });
        for element in definitions {
            if let Some(id) = xml::attr(element, "id") {
                details
                    .entry(id.to_string())
                    .or_insert_with(|| extract(element, ctx, printer));
            }
        }

        debug!("Parsed {} with {} definitions", path.display(), details.len());
        self.files.insert(file.to_string(), details);
        Ok(())
    }
}

impl DetailSource for XmlDetailSource {
    fn detail(&mut self, tree: &Tree, id: NodeId, ctx: &FinalizeContext<'_>) -> Result<NodeDetail> {
        let node = &tree[id];
        let Some(refid) = node.refid() else {
            return Ok(NodeDetail::default());
        };
        let file = match &node.origin {
            Origin::Synthetic => return Ok(NodeDetail::default()),
            Origin::Compound => refid,
            Origin::Member { declared_in } => declared_in.as_str(),
        };

        let print = ctx.print_context(tree);
        self.load(refid, file, &print, ctx.printer)?;

        self.files
            .get_mut(file)
            .and_then(|details| details.remove(refid))
            .unwrap_or_else(|| Err(Error::resolution(refid, format!("No definition in {}.xml", file))))
    }
}

fn extract(element: roxmltree::Node, ctx: &PrintContext<'_>, printer: &dyn TextPrinter) -> Result<NodeDetail> {
    let print = |name: &str| -> Result<String> {
        match xml::child(element, name) {
            Some(desc) => printer.print(&xml::description(desc), ctx),
            None => Ok(String::new()),
        }
    };

    let location = xml::child(element, "location").and_then(|l| {
        let file = xml::attr(l, "file")?;
        Some(Location {
            file: file.to_string(),
            line: l.attribute("line").and_then(|n| n.parse().ok()),
        })
    });

    Ok(NodeDetail {
        title: xml::child_text(element, "title"),
        brief: print("briefdescription")?,
        details: print("detaileddescription")?,
        location,
        type_name: xml::child_text(element, "type"),
        definition: xml::child_text(element, "definition"),
        argsstring: xml::child_text(element, "argsstring"),
        base_classes: references(element, "basecompoundref", ctx)?,
        derived_classes: references(element, "derivedcompoundref", ctx)?,
    })
}

/// Resolve `basecompoundref`-style elements. A refid that is not in the cache is a
/// broken link and fails the node.
fn references(element: roxmltree::Node, tag: &'static str, ctx: &PrintContext<'_>) -> Result<Vec<Reference>> {
    xml::children(element, tag)
        .map(|r| -> Result<Reference> {
            let refid = xml::attr(r, "refid");
            let url = match refid {
                Some(refid) => {
                    let target = ctx.cache.find(refid)?;
                    Some(ctx.config.url_for(ctx.tree, target))
                }
                None => None,
            };
            Ok(Reference {
                name: xml::flat_text(r),
                refid: refid.map(str::to_string),
                url,
            })
        })
        .collect()
}
