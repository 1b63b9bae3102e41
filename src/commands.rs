//! CLI command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use doxytree_core::{Config, MarkdownPrinter, index_data, node_data, outline};
use doxytree_loader::{Index, LoadReport};
use doxytree_render::Renderer;

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load(path)?),
        None => Ok(Config::default()),
    }
}

pub fn override_input(config: &mut Config, input: Option<PathBuf>) {
    if let Some(input) = input {
        config.input_dir = input;
    }
}

pub fn index(config: &Config) -> anyhow::Result<()> {
    let (index, report) = load(config)?;

    for stage in &report.stages {
        println!(
            "{:<10} {} resolved, {} skipped, {} reparented, {} failed",
            stage.stage.name(),
            stage.resolved,
            stage.skipped,
            stage.reparented,
            stage.failures.len()
        );
    }
    for failure in report.failures() {
        println!("  {} {}: {}", failure.kind, failure.refid, failure.error);
    }
    println!();
    print!("{}", outline(index.tree()));

    Ok(())
}

pub fn json(config: &Config, output: Option<&Path>, strict: bool) -> anyhow::Result<()> {
    let (mut index, _) = load(config)?;
    finalize(&mut index, config, strict)?;

    let data = index_data(index.tree(), config);
    let text = serde_json::to_string_pretty(&data)?;

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn render(
    config: &Config,
    template: &str,
    refid: Option<&str>,
    out: &Path,
    strict: bool,
) -> anyhow::Result<()> {
    let Some(templates_dir) = config.templates_dir.as_deref() else {
        bail!("No templates directory configured (set \"templatesDir\" in the config file)");
    };

    let mut renderer = Renderer::new(config.clone());
    let loaded = renderer
        .load_dir(templates_dir)
        .with_context(|| format!("Failed to load templates from {}", templates_dir.display()))?;
    tracing::debug!("Loaded {} templates", loaded);
    if !renderer.has_template(template) {
        bail!(
            "Template {} not found in {} (available: {})",
            template,
            templates_dir.display(),
            renderer.template_names().join(", ")
        );
    }

    let (mut index, _) = load(config)?;
    finalize(&mut index, config, strict)?;

    let data = match refid {
        Some(refid) => {
            let id = index.find_id(refid)?;
            node_data(index.tree(), id, config)
        }
        None => index_data(index.tree(), config),
    };

    let written = renderer
        .render_to_file(template, out, &data)
        .with_context(|| format!("Failed to render {}", out.display()))?;
    println!("{}", written.display());
    Ok(())
}

fn load(config: &Config) -> anyhow::Result<(Index, LoadReport)> {
    tracing::info!("Loading index from {}", config.input_dir.display());

    let mut index = Index::new(&config.input_dir);
    let report = index
        .load()
        .with_context(|| format!("Failed to load {}", config.input_dir.display()))?;
    Ok((index, report))
}

fn finalize(index: &mut Index, config: &Config, strict: bool) -> anyhow::Result<()> {
    let report = index.finalize(config, &MarkdownPrinter);
    if strict && !report.is_clean() {
        bail!("{} nodes could not be finalized", report.failures.len());
    }
    Ok(())
}
