use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Response-time boundaries, in milliseconds, used for grading.
///
/// `a_plus`, `b` and `c` bound the mean response time; the `p95_*` fields
/// bound the 95th percentile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub a_plus: f64,
    pub b: f64,
    pub c: f64,
    pub p95_a_plus: f64,
    pub p95_b: f64,
    pub p95_c: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            a_plus: 200.0,
            b: 400.0,
            c: 800.0,
            p95_a_plus: 500.0,
            p95_b: 1000.0,
            p95_c: 2000.0,
        }
    }
}

impl Thresholds {
    fn named(&self) -> [(&'static str, f64); 6] {
        [
            ("a_plus", self.a_plus),
            ("b", self.b),
            ("c", self.c),
            ("p95_a_plus", self.p95_a_plus),
            ("p95_b", self.p95_b),
            ("p95_c", self.p95_c),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Default output format of the CLI (`pretty`, `json` or `csv`)
    pub format: String,
    pub include_percentiles: bool,
    /// Print the per-phase timing breakdown after the summary
    pub include_timeline: bool,
    /// Number of top resources kept per type in rankings
    pub top_n_resources: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
            include_percentiles: true,
            include_timeline: true,
            top_n_resources: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub output_dir: PathBuf,
    pub debug: bool,
    pub max_memory_mb: u64,
    pub thresholds: Thresholds,
    pub report: ReportConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            debug: false,
            max_memory_mb: 1024,
            thresholds: Thresholds::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::Configuration(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize config: {e}")))
    }

    /// Save configuration as TOML, creating parent directories.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        let write_failed = |e: std::io::Error| {
            Error::Configuration(format!(
                "Failed to write config file {}: {e}",
                path.display()
            ))
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_failed)?;
        }
        fs::write(path, content).map_err(write_failed)?;
        tracing::info!("Configuration saved to: {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.thresholds.named() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Configuration(format!(
                    "Threshold '{name}' must be a non-negative number, got {value}"
                )));
            }
        }

        if self.max_memory_mb == 0 {
            return Err(Error::Configuration(
                "max_memory_mb must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
