//! Doxytree Render — Markdown pages from node data through named templates

pub mod error;
pub mod helpers;
pub mod renderer;


pub use error::{RenderError, Result};
pub use renderer::{HELPERS, Renderer, TEMPLATE_EXTENSION};
