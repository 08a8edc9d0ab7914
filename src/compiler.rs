// Document compiler
//
// Runs the record loader and section renderer over a job's sources, in
// manifest order, and writes everything to one freshly truncated file.

use crate::config::{Config, JobConfig};
use crate::error::{Error, Result};
use crate::output::create_parent;
use crate::record::{display_name, load_record, Loaded};
use crate::render::{render_record, MarkdownBlock, PolicyRegistry, RenderingPolicy};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A resolved source within a compilation job
#[derive(Debug, Clone)]
pub struct JobSource {
    pub path: PathBuf,
    pub policy: RenderingPolicy,
    /// Heading text for the source
    pub title: String,
    pub group: Option<String>,
}

/// One ordered batch of (source, policy) pairs producing one document
#[derive(Debug, Clone)]
pub struct CompilationJob {
    pub name: String,
    pub title: String,
    pub destination: PathBuf,
    pub sources: Vec<JobSource>,
}

/// A source that failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub path: PathBuf,
    pub message: String,
}

/// What happened to each source during a compile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileSummary {
    pub rendered: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<SourceFailure>,
}

impl CompileSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} rendered, {} missing, {} failed",
            self.rendered.len(),
            self.missing.len(),
            self.failed.len()
        )
    }
}

impl CompilationJob {
    /// Build a job from its manifest entry, resolving paths and policies
    pub fn from_config(job: &JobConfig, config: &Config, registry: &PolicyRegistry) -> Result<Self> {
        let sources_dir = config.resolve(&job.sources_dir);
        let sources = job
            .sources
            .iter()
            .map(|entry| -> Result<JobSource> {
                let policy = registry.get(job.policy_for(entry))?.with_feature_overrides(
                    entry.features_heading.as_deref(),
                    entry.feature_style,
                );
                let title = match &entry.title {
                    Some(title) => title.clone(),
                    None => source_title(&entry.file, policy.trim_suffix.as_deref()),
                };
                Ok(JobSource {
                    path: sources_dir.join(&entry.file),
                    policy,
                    title,
                    group: entry.group.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: job.name.clone(),
            title: job.title.clone(),
            destination: config.resolve(&job.output),
            sources,
        })
    }
}

/// Display name of a source file: `stripe_api.json` -> `Stripe Api`,
/// or `Stripe` with `_api` trimmed
pub fn source_title(file: &str, trim_suffix: Option<&str>) -> String {
    let stem = Path::new(file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file);
    let stem = trim_suffix
        .and_then(|suffix| stem.strip_suffix(suffix))
        .unwrap_or(stem);
    display_name(stem)
}

/// Compile a job to its destination file, truncating any previous contents.
///
/// The destination is held open for the whole job and released on return,
/// whether or not compilation succeeded. Missing and undecodable sources are
/// skipped; any write failure aborts the job.
pub fn compile(job: &CompilationJob) -> Result<CompileSummary> {
    create_parent(&job.destination)?;
    let file = File::create(&job.destination).map_err(|e| Error::write(&job.destination, e))?;
    let mut out = BufWriter::new(file);

    let summary = compile_to(job, &mut out).map_err(|e| match e {
        Error::Io(e) => Error::write(&job.destination, e),
        other => other,
    })?;
    out.flush().map_err(|e| Error::write(&job.destination, e))?;

    info!(
        job = %job.name,
        output = %job.destination.display(),
        "{}",
        summary.summary()
    );
    Ok(summary)
}

/// Compile a job into any writer
pub fn compile_to<W: Write>(job: &CompilationJob, out: &mut W) -> Result<CompileSummary> {
    let mut summary = CompileSummary::default();

    write_block(out, &MarkdownBlock::heading(1, &job.title))?;

    let mut current_group: Option<&str> = None;
    let mut group_written = false;

    for source in &job.sources {
        if source.group.as_deref() != current_group {
            current_group = source.group.as_deref();
            group_written = false;
        }

        let record = match load_record(&source.path) {
            Ok(Loaded::Record(record)) => record,
            Ok(Loaded::Missing) => {
                debug!(source = %source.path.display(), "source not found, skipping");
                summary.missing.push(source.path.clone());
                continue;
            }
            Err(e) if e.is_per_source() => {
                warn!(source = %source.path.display(), "{}", e);
                summary.failed.push(SourceFailure {
                    path: source.path.clone(),
                    message: e.to_string(),
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let blocks = render_record(&record, &source.policy, &source.title);
        if blocks.iter().all(MarkdownBlock::is_empty) {
            debug!(source = %source.path.display(), "nothing to render");
            summary.rendered.push(source.path.clone());
            continue;
        }

        if let (Some(group), false) = (current_group, group_written) {
            write_block(out, &MarkdownBlock::heading(2, group))?;
            group_written = true;
        }

        for block in &blocks {
            write_block(out, block)?;
        }
        summary.rendered.push(source.path.clone());
    }

    Ok(summary)
}

fn write_block<W: Write>(out: &mut W, block: &MarkdownBlock) -> Result<()> {
    out.write_all(block.render().as_bytes())?;
    Ok(())
}
