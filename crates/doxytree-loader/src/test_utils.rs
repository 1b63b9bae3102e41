//! Test utilities: Doxygen XML fixtures on disk

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use doxytree_core::{NodeCache, NodeId, Result, Tree, Error};
use tempfile::TempDir;

use crate::index::Index;
use crate::resolver::EntityResolver;

/// A temporary Doxygen XML output directory.
pub struct Fixture {
    dir: TempDir,
    records: Vec<String>,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            dir: TempDir::new().unwrap(),
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Declare a compound in the manifest without writing its source.
    pub fn entry(&mut self, kind: &str, refid: &str) -> &mut Self {
        self.records.push(format!(
            r#"<compound refid="{refid}" kind="{kind}"><name>{refid}</name></compound>"#
        ));
        self
    }

    /// Append a raw manifest record, e.g. a malformed one.
    pub fn raw_record(&mut self, record: &str) -> &mut Self {
        self.records.push(record.to_string());
        self
    }

    /// Declare a compound in the manifest and write its source.
    pub fn compound(&mut self, kind: &str, refid: &str, name: &str, body: &str) -> &mut Self {
        self.entry(kind, refid);
        self.source(kind, refid, name, body)
    }

    /// Write `<refid>.xml` without declaring it in the manifest.
    pub fn source(&mut self, kind: &str, refid: &str, name: &str, body: &str) -> &mut Self {
        self.file(&format!("{refid}.xml"), &compound_xml(kind, refid, name, body));
        self
    }

    pub fn file(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).unwrap();
    }

    pub fn write_manifest(&self) {
        let manifest = format!(
            "<?xml version='1.0' encoding='UTF-8' standalone='no'?>\n\
             <doxygenindex version=\"1.9.8\">\n{}\n</doxygenindex>\n",
            self.records.join("\n")
        );
        self.file("index.xml", &manifest);
    }

    /// Write the manifest and return an index over the directory.
    pub fn index(&self) -> Index {
        self.write_manifest();
        Index::new(self.path())
    }
}

pub fn compound_xml(kind: &str, refid: &str, name: &str, body: &str) -> String {
    format!(
        "<?xml version='1.0' encoding='UTF-8' standalone='no'?>\n\
         <doxygen version=\"1.9.8\">\n\
         <compounddef id=\"{refid}\" kind=\"{kind}\">\n\
         <compoundname>{name}</compoundname>\n\
         <briefdescription><para>{name} brief</para></briefdescription>\n\
         {body}\n\
         </compounddef>\n\
         </doxygen>\n"
    )
}

/// `<innerclass refid="...">` and friends.
pub fn inner(tag: &str, refid: &str) -> String {
    format!(r#"<{tag} refid="{refid}">{refid}</{tag}>"#)
}

pub fn member(kind: &str, id: &str, name: &str) -> String {
    format!(
        r#"<memberdef kind="{kind}" id="{id}"><name>{name}</name><briefdescription><para>{name} brief</para></briefdescription></memberdef>"#
    )
}

pub fn section(members: &[String]) -> String {
    format!(r#"<sectiondef kind="func">{}</sectiondef>"#, members.concat())
}

/// Wraps a resolver, recording every call and failing the refids in `fail`.
pub struct Recording<R> {
    pub inner: R,
    pub calls: Vec<String>,
    pub fail: HashSet<String>,
}

impl<R> Recording<R> {
    pub fn new(inner: R) -> Self {
        Recording {
            inner,
            calls: Vec::new(),
            fail: HashSet::new(),
        }
    }
}

impl<R: EntityResolver> EntityResolver for Recording<R> {
    fn resolve(&mut self, tree: &mut Tree, cache: &mut NodeCache, refid: &str, deep: bool) -> Result<NodeId> {
        self.calls.push(refid.to_string());
        if self.fail.contains(refid) {
            return Err(Error::resolution(refid, "injected failure"));
        }
        self.inner.resolve(tree, cache, refid, deep)
    }
}

/// Names of the children of `id`, in order.
pub fn child_names(tree: &Tree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .map(|&c| tree[c].name.clone())
        .collect()
}
