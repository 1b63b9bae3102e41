//! Doxytree Core — documentation tree, ownership cache and finalize pass

pub mod model;
pub mod tree;
pub mod cache;
pub mod config;
pub mod error;
pub mod text;
pub mod finalize;
pub mod data;
pub mod outline;


#[cfg(test)]
pub mod test_utils;

pub use model::{NodeId, NodeKind, Node, NodeDetail, Origin, Location, Reference, TextSegment, UnknownKind};
pub use tree::{Tree, OwnershipViolation};
pub use cache::NodeCache;
pub use config::Config;
pub use error::{Error, Result};
pub use text::{TextPrinter, PlainPrinter, MarkdownPrinter, PrintContext};
pub use finalize::{DetailSource, FinalizeContext, FinalizeReport, FinalizeFailure, finalize_tree};
pub use data::{node_data, node_summary, index_data};
pub use outline::outline;
