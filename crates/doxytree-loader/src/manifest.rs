//! Reference map reader for Doxygen's `index.xml`

use std::path::Path;

use doxytree_core::{Error, Result};
use tracing::{debug, warn};

use crate::xml;

/// File name of the manifest inside the input directory.
pub const MANIFEST_FILE: &str = "index.xml";

/// One declared compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: String,
    pub refid: String,
    pub name: Option<String>,
}

/// Multi-valued kind -> refid mapping that keeps declaration order.
#[derive(Debug, Default, Clone)]
pub struct RefMap {
    entries: Vec<ManifestEntry>,
}

impl RefMap {
    pub fn new() -> Self {
        RefMap { entries: Vec::new() }
    }

    pub fn push(&mut self, kind: impl Into<String>, refid: impl Into<String>) {
        self.entries.push(ManifestEntry {
            kind: kind.into(),
            refid: refid.into(),
            name: None,
        });
    }

    /// Every entry in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter()
    }

    /// All refids declared with `kind`, in declaration order.
    pub fn refids<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.refid.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, String)> for RefMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = RefMap::new();
        for (kind, refid) in iter {
            map.push(kind, refid);
        }
        map
    }
}

/// Read `<input_dir>/index.xml`.
pub fn read_manifest(input_dir: &Path) -> Result<RefMap> {
    let path = input_dir.join(MANIFEST_FILE);
    let text = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
        std::io::ErrorKind::InvalidData => Error::ManifestMalformed {
            path: path.clone(),
            reason: source.to_string(),
        },
        _ => Error::ManifestNotFound {
            path: path.clone(),
            source,
        },
    })?;
    parse_manifest(&text, &path)
}

/// Decode manifest text. `path` is only used in errors.
pub fn parse_manifest(text: &str, path: &Path) -> Result<RefMap> {
    let malformed = |reason: String| Error::ManifestMalformed {
        path: path.to_path_buf(),
        reason,
    };

    let doc = roxmltree::Document::parse(text).map_err(|e| malformed(e.to_string()))?;
    let root = doc.root_element();
    if root.tag_name().name() != "doxygenindex" {
        return Err(malformed(format!(
            "Unable to find root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let mut compounds = xml::children(root, "compound").peekable();
    if compounds.peek().is_none() {
        return Err(malformed("No <compound> element".to_string()));
    }

    let mut map = RefMap::new();
    for (position, compound) in compounds.enumerate() {
        let kind = xml::attr(compound, "kind");
        let refid = xml::attr(compound, "refid");
        match (kind, refid) {
            (Some(kind), Some(refid)) => map.entries.push(ManifestEntry {
                kind: kind.to_string(),
                refid: refid.to_string(),
                name: xml::child_text(compound, "name"),
            }),
            _ => warn!(
                "compound error in {}: record {} lacks kind or refid",
                path.display(),
                position
            ),
        }
    }

    debug!("Manifest {} declares {} compounds", path.display(), map.len());
    Ok(map)
}
