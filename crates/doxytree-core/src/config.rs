//! Generator configuration and link computation

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{NodeId, Origin};
use crate::tree::Tree;

/// Settings shared by finalizing and rendering. Every field has a default, so a
/// config file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory holding Doxygen's `index.xml` and per-compound XML.
    pub input_dir: PathBuf,
    /// Directory rendered pages are written to.
    pub output_dir: PathBuf,
    /// Directory of `*.tmpl` templates.
    pub templates_dir: Option<PathBuf>,
    /// Prefix for every generated link.
    pub base_url: String,
    /// Suffix for every generated page link.
    pub link_suffix: String,
    pub link_lowercase: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input_dir: PathBuf::from("xml"),
            output_dir: PathBuf::from("docs"),
            templates_dir: None,
            base_url: String::new(),
            link_suffix: ".md".to_string(),
            link_lowercase: false,
        }
    }
}

impl Config {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config: Config = serde_json::from_str(&text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Link to the page documenting a node. Members link to an anchor on the page of
    /// their nearest compound ancestor.
    pub fn url_for(&self, tree: &Tree, id: NodeId) -> String {
        let node = &tree[id];
        match &node.origin {
            Origin::Synthetic => self.page_url("index"),
            Origin::Compound => self.page_url(node.refid().unwrap_or("index")),
            Origin::Member { declared_in } => {
                let page = tree
                    .ancestors(id)
                    .find(|&a| tree[a].origin != Origin::Synthetic && tree[a].kind.is_compound())
                    .map(|a| self.url_for(tree, a))
                    .unwrap_or_else(|| self.page_url(declared_in));
                format!("{}#{}", page, anchor(node.kind.as_str(), &node.name))
            }
        }
    }

    fn page_url(&self, refid: &str) -> String {
        let refid = if self.link_lowercase {
            refid.to_lowercase()
        } else {
            refid.to_string()
        };
        format!("{}{}{}", self.base_url, refid, self.link_suffix)
    }
}

fn anchor(kind: &str, name: &str) -> String {
    let raw = format!("{}-{}", kind, name).to_lowercase();
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_alphanumeric() { c } else { '-' };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_end_matches('-').to_string()
}
