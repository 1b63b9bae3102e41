//! Error taxonomy for loading, lookup and configuration

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The manifest could not be read at all. Aborts the load.
    #[error("manifest not found at {}: {source}", path.display())]
    ManifestNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest lacks its root or any compound record. Aborts the load.
    #[error("malformed manifest {}: {reason}", path.display())]
    ManifestMalformed { path: PathBuf, reason: String },

    /// One entity could not be materialized; the load skips it.
    #[error("failed to resolve {refid}: {reason}")]
    EntityResolutionFailed { refid: String, reason: String },

    #[error("failed to find node from cache by refid {0}")]
    NodeNotFound(String),

    #[error("invalid config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    pub fn resolution(refid: impl Into<String>, reason: impl ToString) -> Self {
        Error::EntityResolutionFailed {
            refid: refid.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors that abort a load entirely.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ManifestNotFound { .. } | Error::ManifestMalformed { .. }
        )
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
