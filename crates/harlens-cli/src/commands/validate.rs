use anyhow::{Context, Result};
use console::style;
use harlens_core::validate::validate_har_file;
use std::path::Path;

pub fn execute(file: &Path) -> Result<()> {
    tracing::info!("Validating HAR file: {}", file.display());

    validate_har_file(file).context("HAR file validation failed")?;

    println!("{} HAR file is valid: {}", style("✅").green(), file.display());
    Ok(())
}
