// Output helpers shared by the writers

pub mod diagrams;

pub use diagrams::*;

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Create the parent directory of an output file if needed
pub fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::write(parent, e))?;
        }
    }
    Ok(())
}

/// Write a whole output file, replacing whatever was there
pub fn write_output(path: &Path, contents: &str) -> Result<()> {
    create_parent(path)?;
    fs::write(path, contents).map_err(|e| Error::write(path, e))
}
