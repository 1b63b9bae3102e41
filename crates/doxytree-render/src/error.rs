//! Rendering errors

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {0} not found")]
    TemplateNotFound(String),

    #[error("failed to parse template '{name}' error {reason}")]
    TemplateInvalid { name: String, reason: String },

    #[error("failed to render template '{name}' error {reason}")]
    RenderFailed { name: String, reason: String },

    #[error("failed to open file for writing {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template {}: {source}", path.display())]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
