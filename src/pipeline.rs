// Build pipeline
//
// Runs the manifest end to end: every compilation job, then every compiled
// report (which read the jobs' outputs), then the architecture diagram.
// Everything is sequential and reprocessed from scratch on each run.

use crate::assembler::{assemble, AssemblySummary, CompiledReport};
use crate::compiler::{compile, CompilationJob, CompileSummary};
use crate::config::Config;
use crate::error::Result;
use crate::output::DiagramGenerator;
use crate::render::PolicyRegistry;
use std::path::PathBuf;
use tracing::info;

/// Outcome of a full build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Per job: (name, destination, summary)
    pub jobs: Vec<(String, PathBuf, CompileSummary)>,
    /// Per report: (name, destination, summary)
    pub reports: Vec<(String, PathBuf, AssemblySummary)>,
    pub diagram: Option<PathBuf>,
}

impl BuildReport {
    /// Number of sources that failed to load across all jobs
    pub fn failed_sources(&self) -> usize {
        self.jobs.iter().map(|(_, _, s)| s.failed.len()).sum()
    }
}

/// The manifest plus the policies it can use
pub struct Pipeline {
    config: Config,
    registry: PolicyRegistry,
}

impl Pipeline {
    /// Validate the config and prepare its policy registry
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let registry = config.policy_registry();
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve a named compilation job
    pub fn job(&self, name: &str) -> Result<CompilationJob> {
        CompilationJob::from_config(self.config.job(name)?, &self.config, &self.registry)
    }

    /// Resolve a named compiled report
    pub fn report(&self, name: &str) -> Result<CompiledReport> {
        Ok(CompiledReport::from_config(self.config.report(name)?, &self.config))
    }

    /// Compile one job by name
    pub fn compile_job(&self, name: &str) -> Result<(CompilationJob, CompileSummary)> {
        let job = self.job(name)?;
        let summary = compile(&job)?;
        Ok((job, summary))
    }

    /// Assemble one report by name
    pub fn assemble_report(&self, name: &str) -> Result<(CompiledReport, AssemblySummary)> {
        let report = self.report(name)?;
        let summary = assemble(&report)?;
        Ok((report, summary))
    }

    /// Write the architecture diagram; `None` when diagrams are disabled
    pub fn emit_diagram(&self) -> Result<Option<PathBuf>> {
        if !self.config.diagram.enabled {
            return Ok(None);
        }
        let path = self.config.resolve(&self.config.diagram.output);
        DiagramGenerator::new()
            .with_direction(&self.config.diagram.direction)
            .emit(&path)?;
        info!(output = %path.display(), "diagram written");
        Ok(Some(path))
    }

    /// Run every job, then every report, then the diagram
    pub fn run(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();

        for job in &self.config.jobs {
            let (job, summary) = self.compile_job(&job.name)?;
            report.jobs.push((job.name, job.destination, summary));
        }

        for compiled in &self.config.reports {
            let (compiled, summary) = self.assemble_report(&compiled.name)?;
            report.reports.push((compiled.name, compiled.destination, summary));
        }

        report.diagram = self.emit_diagram()?;
        Ok(report)
    }
}
