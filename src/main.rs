//! Doxytree CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "doxytree")]
#[command(about = "Build a documentation tree from Doxygen XML and render it to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON config file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the index and print its outline
    Index {
        /// Doxygen XML directory (overrides the config)
        input: Option<PathBuf>,
    },
    /// Load and finalize the index, then print it as JSON
    Json {
        /// Doxygen XML directory (overrides the config)
        input: Option<PathBuf>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail if any node could not be finalized
        #[arg(long)]
        strict: bool,
    },
    /// Render one node, or the whole index, through a template
    Render {
        /// Doxygen XML directory (overrides the config)
        input: Option<PathBuf>,

        /// Template name (file stem in the templates directory)
        #[arg(short, long)]
        template: String,

        /// Node to render; the whole index when omitted
        #[arg(long)]
        refid: Option<String>,

        /// Output path, relative to the output directory
        #[arg(long)]
        out: PathBuf,

        /// Output directory (overrides the config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Fail if any node could not be finalized
        #[arg(long)]
        strict: bool,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = ["doxytree", "doxytree_core", "doxytree_loader", "doxytree_render"]
        .map(|target| format!("{}={}", target, log_level))
        .join(",");
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Commands::Version = cli.command {
        println!("Doxytree v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Index { input } => {
            commands::override_input(&mut config, input);
            commands::index(&config)
        }
        Commands::Json { input, output, strict } => {
            commands::override_input(&mut config, input);
            commands::json(&config, output.as_deref(), strict)
        }
        Commands::Render {
            input,
            template,
            refid,
            out,
            output_dir,
            strict,
        } => {
            commands::override_input(&mut config, input);
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            commands::render(&config, &template, refid.as_deref(), &out, strict)
        }
        Commands::Version => Ok(()),
    }
}
