//! Filesystem utilities

use std::fs;
use std::path::Path;

use log::debug;

/// Create an output directory (and its parents) unless it is already there.
pub fn create_dir_all(path: &Path) -> std::io::Result<()> {
    if !path.is_dir() {
        fs::create_dir_all(path)?;
        debug!("Created directory: {}", path.display());
    }
    Ok(())
}
