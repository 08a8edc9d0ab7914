// Report assembler
//
// Joins already-produced markdown files into one larger document. Inputs are
// copied byte for byte apart from trailing newlines, which are normalized so
// every section is followed by exactly one blank line.

use crate::config::{Config, ReportConfig};
use crate::error::{Error, Result};
use crate::output::create_parent;
use crate::render::MarkdownBlock;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SEPARATOR: &[u8] = b"\n\n";

/// An ordered list of markdown files joined under one title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledReport {
    pub name: String,
    pub title: String,
    pub destination: PathBuf,
    pub inputs: Vec<PathBuf>,
}

/// Which inputs made it into the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub included: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
}

impl AssemblySummary {
    pub fn summary(&self) -> String {
        format!("{} included, {} missing", self.included.len(), self.missing.len())
    }
}

impl CompiledReport {
    pub fn from_config(report: &ReportConfig, config: &Config) -> Self {
        let inputs_dir = config.resolve(&report.inputs_dir);
        Self {
            name: report.name.clone(),
            title: report.title.clone(),
            destination: config.resolve(&report.output),
            inputs: report.inputs.iter().map(|f| inputs_dir.join(f)).collect(),
        }
    }
}

/// Assemble a report into its destination, truncating any previous contents
pub fn assemble(report: &CompiledReport) -> Result<AssemblySummary> {
    create_parent(&report.destination)?;
    let file = File::create(&report.destination).map_err(|e| Error::write(&report.destination, e))?;
    let mut out = BufWriter::new(file);

    let summary = assemble_to(report, &mut out).map_err(|e| match e {
        Error::Io(e) => Error::write(&report.destination, e),
        other => other,
    })?;
    out.flush().map_err(|e| Error::write(&report.destination, e))?;

    info!(
        report = %report.name,
        output = %report.destination.display(),
        "{}",
        summary.summary()
    );
    Ok(summary)
}

/// Assemble a report into any writer
pub fn assemble_to<W: Write>(report: &CompiledReport, out: &mut W) -> Result<AssemblySummary> {
    let mut summary = AssemblySummary::default();
    out.write_all(MarkdownBlock::heading(1, &report.title).render().as_bytes())?;

    for input in &report.inputs {
        match read_input(input)? {
            Some(contents) => {
                write_section(out, &contents)?;
                summary.included.push(input.clone());
            }
            None => {
                debug!(input = %input.display(), "input not found, skipping");
                summary.missing.push(input.clone());
            }
        }
    }

    Ok(summary)
}

/// Append one more input to an existing assembled document.
///
/// Returns `false` if the input doesn't exist. Appending `C` to the assembly
/// of `[A, B]` produces the same bytes as assembling `[A, B, C]`.
pub fn append(destination: &Path, input: &Path) -> Result<bool> {
    let Some(contents) = read_input(input)? else {
        return Ok(false);
    };

    let mut file = OpenOptions::new()
        .append(true)
        .open(destination)
        .map_err(|e| Error::write(destination, e))?;
    write_section(&mut file, &contents).map_err(|e| match e {
        Error::Io(e) => Error::write(destination, e),
        other => other,
    })?;
    Ok(true)
}

fn read_input(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::read(path, e)),
    }
}

fn write_section<W: Write>(out: &mut W, contents: &[u8]) -> Result<()> {
    let end = contents
        .iter()
        .rposition(|b| !matches!(b, b'\n' | b'\r'))
        .map_or(0, |i| i + 1);
    if end == 0 {
        return Ok(());
    }
    out.write_all(&contents[..end])?;
    out.write_all(SEPARATOR)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(dir: &Path, inputs: &[&str], output: &str) -> CompiledReport {
        CompiledReport {
            name: "test".to_string(),
            title: "Compiled".to_string(),
            destination: dir.join(output),
            inputs: inputs.iter().map(|f| dir.join(f)).collect(),
        }
    }

    #[test]
    fn test_assemble_concatenates_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "# A\n\nalpha\n\n").unwrap();
        fs::write(dir.path().join("b.md"), "# B\n\nbeta").unwrap();

        let report = report(dir.path(), &["a.md", "b.md"], "all.md");
        let summary = assemble(&report).unwrap();
        assert_eq!(summary.included.len(), 2);

        let out = fs::read_to_string(&report.destination).unwrap();
        assert_eq!(out, "# Compiled\n\n# A\n\nalpha\n\n# B\n\nbeta\n\n");
    }

    #[test]
    fn test_missing_inputs_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.md"), "beta\n").unwrap();

        let report = report(dir.path(), &["a.md", "b.md", "c.md"], "nested/dir/all.md");
        let summary = assemble(&report).unwrap();
        assert_eq!(summary.included, vec![dir.path().join("b.md")]);
        assert_eq!(summary.missing.len(), 2);
        assert_eq!(
            fs::read_to_string(&report.destination).unwrap(),
            "# Compiled\n\nbeta\n\n"
        );
    }

    #[test]
    fn test_inner_content_is_verbatim() {
        let dir = TempDir::new().unwrap();
        let body = "## Section\r\n\r\n*   **x**: <y> | `z`\n\n\n\nafter gap\n";
        fs::write(dir.path().join("a.md"), body).unwrap();

        let mut out = Vec::new();
        assemble_to(&report(dir.path(), &["a.md"], "all.md"), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "# Compiled\n\n## Section\r\n\r\n*   **x**: <y> | `z`\n\n\n\nafter gap\n\n"
        );
    }

    #[test]
    fn test_append_is_associative_with_assemble() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "alpha\n").unwrap();
        fs::write(dir.path().join("b.md"), "beta\n\n\n").unwrap();
        fs::write(dir.path().join("c.md"), "gamma").unwrap();

        let staged = report(dir.path(), &["a.md", "b.md"], "staged.md");
        assemble(&staged).unwrap();
        assert!(append(&staged.destination, &dir.path().join("c.md")).unwrap());

        let direct = report(dir.path(), &["a.md", "b.md", "c.md"], "direct.md");
        assemble(&direct).unwrap();

        assert_eq!(
            fs::read(&staged.destination).unwrap(),
            fs::read(&direct.destination).unwrap()
        );
    }

    #[test]
    fn test_append_missing_input() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("all.md");
        fs::write(&dest, "# Compiled\n\n").unwrap();
        assert!(!append(&dest, &dir.path().join("absent.md")).unwrap());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "# Compiled\n\n");
    }

    #[test]
    fn test_from_config_resolves_paths() {
        let mut config = Config::default();
        config.project.root = PathBuf::from("/research");
        let report = CompiledReport::from_config(config.report("design").unwrap(), &config);
        assert_eq!(
            report.destination,
            PathBuf::from("/research/design/comprehensive_billing_system_design.md")
        );
        assert_eq!(report.inputs[0], PathBuf::from("/research/design/system_architecture.md"));
        assert_eq!(report.inputs.len(), 9);
    }
}
