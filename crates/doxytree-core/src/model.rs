//! Core data structures for the documentation tree

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Handle of a node inside a [`crate::Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Discriminates what kind of documentable entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    // ── Synthetic ───────────────────────────────────────────
    Index,

    // ── Language entities ───────────────────────────────────
    Namespace,
    Class,
    Struct,
    Union,
    Interface,
    Function,
    Variable,
    Typedef,
    Enum,
    EnumValue,
    Define,
    Friend,

    // ── Organisational ──────────────────────────────────────
    Group,
    Dir,
    File,
    Page,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Index => "index",
            NodeKind::Namespace => "namespace",
            NodeKind::Class => "class",
            NodeKind::Struct => "struct",
            NodeKind::Union => "union",
            NodeKind::Interface => "interface",
            NodeKind::Function => "function",
            NodeKind::Variable => "variable",
            NodeKind::Typedef => "typedef",
            NodeKind::Enum => "enum",
            NodeKind::EnumValue => "enumvalue",
            NodeKind::Define => "define",
            NodeKind::Friend => "friend",
            NodeKind::Group => "group",
            NodeKind::Dir => "dir",
            NodeKind::File => "file",
            NodeKind::Page => "page",
        }
    }

    /// Kinds that own a source document of their own.
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            NodeKind::Namespace
                | NodeKind::Class
                | NodeKind::Struct
                | NodeKind::Union
                | NodeKind::Interface
                | NodeKind::Group
                | NodeKind::Dir
                | NodeKind::File
                | NodeKind::Page
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for NodeKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "index" => NodeKind::Index,
            "namespace" => NodeKind::Namespace,
            "class" => NodeKind::Class,
            "struct" => NodeKind::Struct,
            "union" => NodeKind::Union,
            "interface" => NodeKind::Interface,
            "function" => NodeKind::Function,
            "variable" => NodeKind::Variable,
            "typedef" => NodeKind::Typedef,
            "enum" => NodeKind::Enum,
            "enumvalue" => NodeKind::EnumValue,
            "define" => NodeKind::Define,
            "friend" => NodeKind::Friend,
            "group" => NodeKind::Group,
            "dir" => NodeKind::Dir,
            "file" => NodeKind::File,
            "page" => NodeKind::Page,
            other => return Err(UnknownKind(other.to_string())),
        };
        Ok(kind)
    }
}

/// Where the content of a node is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// The synthetic root; has no source.
    Synthetic,
    /// Described by its own `<refid>.xml`.
    Compound,
    /// A member declared inside the source of another compound.
    Member { declared_in: String },
}

/// A source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}

/// A reference to another entity, e.g. a base class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    /// Absent for entities outside the documented code (e.g. `std::exception`).
    pub refid: Option<String>,
    /// Link to the resolved node, when `refid` is present.
    pub url: Option<String>,
}

/// Full content of a node, filled in by the finalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDetail {
    pub title: Option<String>,
    pub brief: String,
    pub details: String,
    pub location: Option<Location>,
    pub type_name: Option<String>,
    pub definition: Option<String>,
    pub argsstring: Option<String>,
    pub base_classes: Vec<Reference>,
    pub derived_classes: Vec<Reference>,
}

/// A documentable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// `None` only for the synthetic root.
    pub refid: Option<String>,
    pub kind: NodeKind,
    pub name: String,
    /// Plain-text summary; only present after deep discovery.
    pub brief: Option<String>,
    pub origin: Origin,
    /// Non-owning back reference.
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub detail: Option<NodeDetail>,
}

impl Node {
    pub fn new(refid: impl Into<String>, kind: NodeKind, name: impl Into<String>, origin: Origin) -> Self {
        Node {
            refid: Some(refid.into()),
            kind,
            name: name.into(),
            brief: None,
            origin,
            parent: None,
            children: Vec::new(),
            detail: None,
        }
    }

    pub(crate) fn root() -> Self {
        Node {
            refid: None,
            kind: NodeKind::Index,
            name: "index".to_string(),
            brief: None,
            origin: Origin::Synthetic,
            parent: None,
            children: Vec::new(),
            detail: None,
        }
    }

    pub fn refid(&self) -> Option<&str> {
        self.refid.as_deref()
    }

    pub fn is_finalized(&self) -> bool {
        self.detail.is_some()
    }
}

/// One piece of description markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Text(String),
    Bold(Vec<TextSegment>),
    Emphasis(Vec<TextSegment>),
    Code(String),
    Ref { refid: String, text: String },
    Link { url: String, text: String },
    LineBreak,
    ParagraphBreak,
}
