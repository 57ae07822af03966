use anyhow::{Result, bail};
use console::style;
use harlens_core::config::AnalyzerConfig;
use std::path::Path;

/// Write the default configuration to `output`. An existing file is only
/// replaced with `force`.
pub fn execute(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    AnalyzerConfig::default().to_file(output)?;

    println!(
        "{} Default configuration saved to: {}",
        style("✅").green(),
        output.display()
    );
    Ok(())
}
