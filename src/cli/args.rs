//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Compile structured research data into markdown reports
#[derive(Parser, Debug)]
#[command(name = "dossier")]
#[command(about = "Compile structured research data into markdown reports")]
#[command(version)]
pub struct Args {
    /// Config file path (defaults to ./dossier.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Project root that manifest paths are resolved against
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every compilation job, then every report, then the diagram
    Build {
        /// Skip diagram generation
        #[arg(long)]
        no_diagram: bool,
    },

    /// Run a single compilation job
    Compile {
        /// Job name from the manifest
        job: String,
    },

    /// Assemble a single compiled report
    Assemble {
        /// Report name from the manifest
        report: String,
    },

    /// Write the architecture diagram
    Diagram,

    /// List jobs, reports and rendering policies
    List,

    /// Show version information
    Version,
}
