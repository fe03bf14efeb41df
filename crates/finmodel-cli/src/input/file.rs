use finmodel_core::assumptions::{load, AssumptionSet};
use log::debug;
use std::path::{Path, PathBuf};

/// Read an assumption file; the extension picks YAML or JSON.
pub fn read_assumptions(path: &str) -> Result<AssumptionSet, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    debug!("reading assumptions from {}", canonical.display());
    Ok(load::from_path(&canonical)?)
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
