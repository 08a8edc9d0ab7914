//! CLI module for Dossier

mod args;

pub use args::{Args, Command};

use crate::compiler::CompileSummary;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::pipeline::Pipeline;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_logging(args.verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install the fmt subscriber; `RUST_LOG` overrides the default level
fn init_logging(verbose: bool) {
    let default = if verbose { "dossier=debug" } else { "dossier=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Explicit `--config`, else `dossier.toml` under `--root`, else the built-in manifest
fn read_config(args: &Args) -> Result<Config> {
    match (&args.config, &args.root) {
        (Some(path), _) => Config::load(path),
        (None, Some(root)) => Config::load_or_default(&root.join(DEFAULT_CONFIG_FILE)),
        (None, None) => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

fn load_config(args: &Args, no_diagram: bool) -> Result<Config> {
    let mut cfg = read_config(args)?;
    cfg.merge_cli(args.root.clone(), no_diagram);

    if !cfg.project.root.exists() {
        return Err(Error::PathNotFound(cfg.project.root));
    }
    Ok(cfg)
}

fn execute(args: Args) -> Result<()> {
    let no_diagram = matches!(args.command, Command::Build { no_diagram: true });

    match &args.command {
        Command::Version => {
            println!("dossier {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Command::List => {
            print_manifest(&read_config(&args)?);
            return Ok(());
        }
        _ => {}
    }

    let cfg = load_config(&args, no_diagram)?;
    if args.verbose {
        println!("Project: {}", cfg.project.name);
        println!("Root: {}", cfg.project.root.display());
        println!("Jobs: {}", cfg.jobs.len());
        println!("Reports: {}", cfg.reports.len());
        println!("Diagram: {}", cfg.diagram.enabled);
    }
    let pipeline = Pipeline::new(cfg)?;

    match args.command {
        Command::Build { .. } => {
            println!("Compiling {} jobs...", pipeline.config().jobs.len());
            let build = pipeline.run()?;

            for (name, path, summary) in &build.jobs {
                println!("  {}: {} ({})", name, path.display(), summary.summary());
                print_failures(summary);
            }
            for (name, path, summary) in &build.reports {
                println!("  {}: {} ({})", name, path.display(), summary.summary());
            }
            if let Some(path) = &build.diagram {
                println!("  diagram: {}", path.display());
            }

            let failed = build.failed_sources();
            if failed > 0 {
                println!("\nBuild finished with {} undecodable source(s)", failed);
            } else {
                println!("\nBuild finished");
            }
        }

        Command::Compile { job } => {
            let (job, summary) = pipeline.compile_job(&job)?;
            println!("{} ({})", job.destination.display(), summary.summary());
            print_failures(&summary);
        }

        Command::Assemble { report } => {
            let (report, summary) = pipeline.assemble_report(&report)?;
            println!("{} ({})", report.destination.display(), summary.summary());
        }

        Command::Diagram => match pipeline.emit_diagram()? {
            Some(path) => println!("Diagram written to: {}", path.display()),
            None => println!("Diagram disabled in config"),
        },

        Command::List | Command::Version => {}
    }

    Ok(())
}

fn print_failures(summary: &CompileSummary) {
    if summary.failed.is_empty() {
        return;
    }
    println!("    Decode errors ({}):", summary.failed.len());
    for failure in &summary.failed {
        println!("      {}", failure.message);
    }
}

fn print_manifest(cfg: &Config) {
    println!("Jobs:");
    for job in &cfg.jobs {
        println!("  {} -> {} ({} sources)", job.name, job.output.display(), job.sources.len());
        for entry in &job.sources {
            println!("    {} [{}]", entry.file, job.policy_for(entry));
        }
    }

    println!("Reports:");
    for report in &cfg.reports {
        println!("  {} -> {} ({} inputs)", report.name, report.output.display(), report.inputs.len());
    }

    println!("Diagram:");
    if cfg.diagram.enabled {
        println!("  {}", cfg.diagram.output.display());
    } else {
        println!("  disabled");
    }

    let registry = cfg.policy_registry();
    println!("Policies: {}", registry.names().collect::<Vec<_>>().join(", "));
}
