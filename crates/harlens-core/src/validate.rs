//! Input and environment checks run around an analysis.

use crate::har::HarReader;
use crate::{Error, Result};
use std::fs;
use std::path::Path;

/// Validate a HAR file's existence, extension and structure without
/// building any rows.
pub fn validate_har_file(path: &Path) -> Result<()> {
    HarReader::from_file(path).map(|_| ())
}

/// Create the output directory if needed and make sure it is writable.
pub fn validate_output_directory(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| {
        Error::Validation(format!(
            "Cannot create output directory: {} - {}",
            output_dir.display(),
            e
        ))
    })?;

    if !output_dir.is_dir() {
        return Err(Error::Validation(format!(
            "Output path is not a directory: {}",
            output_dir.display()
        )));
    }

    let probe = output_dir.join(".harlens_write_test");
    fs::write(&probe, b"")
        .and_then(|_| fs::remove_file(&probe))
        .map_err(|e| {
            Error::Validation(format!(
                "No write permission in output directory: {} - {}",
                output_dir.display(),
                e
            ))
        })?;

    Ok(())
}

/// Fail when the measured memory usage is above the ceiling.
pub fn check_memory(current_mb: f64, limit_mb: u64) -> Result<()> {
    if current_mb > limit_mb as f64 {
        return Err(Error::ResourceExceeded {
            used_mb: current_mb,
            limit_mb,
        });
    }
    Ok(())
}
