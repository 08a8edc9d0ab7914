//! Dossier - Compile structured research data into markdown reports
//!
//! Reads JSON research extracts, renders each one into markdown sections
//! under a named rendering policy, concatenates the results into topic
//! documents, assembles those into larger reports and writes a Mermaid
//! architecture diagram.

pub mod assembler;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod render;

// Re-export main types
pub use assembler::{append, assemble, AssemblySummary, CompiledReport};
pub use compiler::{compile, CompilationJob, CompileSummary, JobSource};
pub use config::Config;
pub use error::{Error, Result};
pub use output::{ArchitectureDiagram, DiagramGenerator};
pub use pipeline::{BuildReport, Pipeline};
pub use record::{load_record, Loaded, Record};
pub use render::{render_record, MarkdownBlock, PolicyRegistry, RenderingPolicy};
