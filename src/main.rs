//! mdlinks: validate and repair relative links in markdown document trees.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod classifiers;
mod commands;
mod config;
mod document;
mod error;
mod fence;
mod graph;
mod headers;
mod inventory;
mod myst;
mod pipeline;
mod report;
mod stats;
mod validate;

#[derive(Parser)]
#[command(
    name = "mdlinks",
    version,
    about = "Validate and repair relative links in markdown document trees"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every relative link and image reference against files on disk.
    Validate {
        /// Root of the markdown tree.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Rewrite broken references that have exactly one correction.
    Repair {
        #[command(subcommand)]
        target: RepairTarget,
    },
    /// Estimate word and page counts across the tree.
    Stats {
        /// Root of the markdown tree.
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// Show the link graph between markdown documents.
    Graph {
        /// Root of the markdown tree.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Emit DOT instead of a summary.
        #[arg(long)]
        dot: bool,
    },
}

#[derive(Subcommand)]
enum RepairTarget {
    /// Relative links and image references with one candidate path.
    Links {
        /// Root of the markdown tree.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Headers missing `{#id}` attribute blocks.
    Headers {
        /// Root of the markdown tree.
        #[arg(default_value = ".")]
        root: PathBuf,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { root, json } => commands::validate(&root, json),
        Commands::Repair { target } => match target {
            RepairTarget::Links { root, dry_run } => commands::repair_links(&root, dry_run),
            RepairTarget::Headers { root, dry_run } => commands::repair_headers(&root, dry_run),
        },
        Commands::Stats { root } => commands::stats(&root),
        Commands::Graph { root, dot } => commands::graph(&root, dot),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
