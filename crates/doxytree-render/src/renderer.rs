//! Named templates rendered against node data

use std::error::Error as _;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use doxytree_core::Config;
use minijinja::value::{Object, Value, ValueKind};
use minijinja::{AutoEscape, Environment, ErrorKind, Output, State, escape_formatter};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::helpers;

/// File extension of templates picked up by [`Renderer::load_dir`].
pub const TEMPLATE_EXTENSION: &str = "tmpl";

/// Global functions available to every template. Data keys with these names are
/// hidden at the top level of the context so the functions stay callable.
pub const HELPERS: [&str; 9] = [
    "isEmpty",
    "title",
    "date",
    "stripNamespace",
    "countProperty",
    "countProperty2",
    "queryProperty",
    "queryProperty2",
    "render",
];

pub struct Renderer {
    config: Config,
    env: Environment<'static>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("output_dir", &self.config.output_dir)
            .field("templates", &self.template_names())
            .finish()
    }
}

impl Renderer {
    pub fn new(config: Config) -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(false);
        env.set_lstrip_blocks(false);
        env.set_keep_trailing_newline(true);
        env.set_formatter(format_value);

        env.add_function("isEmpty", |s: &str| s.is_empty());
        env.add_function("title", helpers::title);
        env.add_function("date", helpers::date);
        env.add_function("stripNamespace", helpers::strip_namespace);
        env.add_function("countProperty", helpers::count_property);
        env.add_function("countProperty2", helpers::count_property2);
        env.add_function("queryProperty", helpers::query_property);
        env.add_function("queryProperty2", helpers::query_property2);
        env.add_function("render", render_nested);

        Renderer { config, env }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register (or replace) a template under `name`.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<()> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
            .map_err(|e| RenderError::TemplateInvalid {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Register every `*.tmpl` file in `dir`, named by file stem. Returns how many
    /// were added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        let unreadable = |path: &Path, source| RenderError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| unreadable(dir, e))? {
            let path = entry.map_err(|e| unreadable(dir, e))?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == TEMPLATE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let source = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
            self.add_template(name, &source)?;
            debug!("Loaded template {} from {}", name, path.display());
        }
        Ok(paths.len())
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Registered template names, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.env.templates().map(|(name, _)| name.to_string()).collect();
        names.sort();
        names
    }

    pub fn render<S: Serialize + ?Sized>(&self, name: &str, data: &S) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => RenderError::TemplateNotFound(name.to_string()),
            _ => RenderError::RenderFailed {
                name: name.to_string(),
                reason: e.to_string(),
            },
        })?;

        template.render(page_context(Value::from_serialize(data))).map_err(|e| RenderError::RenderFailed {
            name: name.to_string(),
            reason: describe(&e),
        })
    }

    /// Render `name` into `<output_dir>/<path>`, creating parent directories.
    /// Returns the written path.
    pub fn render_to_file<S: Serialize + ?Sized>(&self, name: &str, path: &Path, data: &S) -> Result<PathBuf> {
        let out = self.config.output_dir.join(path);
        let rendered = self.render(name, data)?;

        info!("Rendering {}", out.display());
        let unwritable = |source| RenderError::OutputUnwritable {
            path: out.clone(),
            source,
        };
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(unwritable)?;
        }
        fs::write(&out, rendered).map_err(unwritable)?;
        Ok(out)
    }
}

/// `render(name, data)` inside a template.
fn render_nested(state: &State, name: &str, data: Value) -> std::result::Result<String, minijinja::Error> {
    state.env().get_template(name)?.render(page_context(data))
}

/// Top-level template context over node data.
#[derive(Debug)]
struct PageContext {
    data: Value,
}

impl Object for PageContext {
    fn get_value(self: &Arc<Self>, key: &Value) -> Option<Value> {
        if key.as_str().is_some_and(|k| HELPERS.contains(&k)) {
            return None;
        }
        self.data.get_item(key).ok().filter(|v| !v.is_undefined())
    }
}

fn page_context(data: Value) -> Value {
    Value::from_object(PageContext { data })
}

/// Booleans print as `true`/`false`; everything else as usual.
fn format_value(out: &mut Output, state: &State, value: &Value) -> std::result::Result<(), minijinja::Error> {
    if value.kind() == ValueKind::Bool {
        let text = if value.is_true() { "true" } else { "false" };
        return out
            .write_str(text)
            .map_err(|_| minijinja::Error::new(ErrorKind::WriteFailure, "failed to write output"));
    }
    escape_formatter(out, state, value)
}

/// The error with its chain of causes on one line.
fn describe(error: &minijinja::Error) -> String {
    let mut reason = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = cause.source();
    }
    reason
}
