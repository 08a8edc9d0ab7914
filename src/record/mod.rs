// Record loading
//
// A source record is whatever JSON tree a research extract happens to hold.
// Nothing about its shape is trusted; see `value` for the defensive accessors.

pub mod value;

pub use value::*;

use crate::error::{Error, Result};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One parsed source document
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// File the record was read from
    pub path: PathBuf,
    /// Parsed JSON tree
    pub root: Value,
}

impl Record {
    pub fn new(path: impl Into<PathBuf>, root: Value) -> Self {
        Self {
            path: path.into(),
            root,
        }
    }

    /// Look up a top-level key, treating empty values as absent
    pub fn field(&self, key: &str) -> Option<&Value> {
        field(&self.root, key)
    }

    /// File stem of the source, e.g. `stripe_api` for `stripe_api.json`
    pub fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }
}

/// Outcome of loading a source that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    Record(Record),
    /// The source file does not exist
    Missing,
}

/// Load and parse a single source file.
///
/// A missing file is `Ok(Loaded::Missing)`. Unreadable or undecodable files
/// return per-source errors (`Error::Read` / `Error::Decode`) that callers
/// are expected to report and skip.
pub fn load_record(path: &Path) -> Result<Loaded> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Loaded::Missing),
        Err(e) => return Err(Error::read(path, e)),
    };

    let root: Value = serde_json::from_str(&contents).map_err(|e| Error::decode(path, e))?;
    Ok(Loaded::Record(Record::new(path, root)))
}
