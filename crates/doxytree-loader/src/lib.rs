//! Doxygen XML loading: manifest, staged resolution and detail

pub mod xml;
pub mod manifest;
pub mod stage;
pub mod resolver;
pub mod detail;
pub mod index;


#[cfg(test)]
pub mod test_utils;

pub use manifest::{ManifestEntry, RefMap, MANIFEST_FILE, read_manifest, parse_manifest};
pub use stage::Stage;
pub use resolver::{EntityResolver, XmlResolver};
pub use detail::XmlDetailSource;
pub use index::{Index, LoadReport, StageReport, LoadFailure};
