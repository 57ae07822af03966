use crate::OutputFormat;
use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use console::style;
use harlens_core::analysis::{AnalysisReport, Severity, TimingPhase};
use harlens_core::config::AnalyzerConfig;
use harlens_core::validate::validate_output_directory;
use harlens_core::{Analysis, HarAnalyzer};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File stem of the exported rows, e.g. `har_analysis.csv`.
pub const EXPORT_STEM: &str = "har_analysis";

/// File name of the full JSON report.
pub const REPORT_FILE: &str = "har_report.json";

/// Command-line overrides for one `analyze` run.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub memory_limit: Option<u64>,
    pub no_report: bool,
    pub debug: bool,
}

/// Location of the per-user configuration file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("harlens").join("config.toml"))
}

/// Load configuration from `--config`, else the per-user file, else defaults,
/// then apply command-line overrides.
pub fn resolve_config(options: &AnalyzeOptions) -> Result<AnalyzerConfig> {
    let mut config = match &options.config {
        Some(path) => {
            if !path.is_file() {
                bail!("Configuration file not found: {}", path.display());
            }
            tracing::info!("Loading configuration from: {}", path.display());
            AnalyzerConfig::from_file(path)?
        }
        None => match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::info!("Loading configuration from: {}", path.display());
                AnalyzerConfig::from_file(&path)?
            }
            _ => AnalyzerConfig::default(),
        },
    };

    if let Some(dir) = &options.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(limit) = options.memory_limit {
        config.max_memory_mb = limit;
    }
    if options.debug {
        config.debug = true;
    }

    config.validate()?;
    Ok(config)
}

/// Analyze a HAR file and return the report together with its rows
pub fn analyze_har(file: &Path, config: &AnalyzerConfig) -> Result<Analysis> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let analyzer = HarAnalyzer::new(config.clone());
    let analysis = analyzer.analyze(file)?;
    Ok(analysis)
}

/// Serialize the full report as pretty JSON.
pub fn write_report(report: &AnalysisReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)?;
    Ok(())
}

pub fn execute(file: &Path, options: &AnalyzeOptions) -> Result<()> {
    let config = resolve_config(options)?;
    let format = match options.format {
        Some(format) => format,
        None => OutputFormat::from_str(&config.report.format, true).unwrap_or_else(|_| {
            tracing::warn!(
                "Unknown report format '{}' in configuration, using pretty",
                config.report.format
            );
            OutputFormat::Pretty
        }),
    };

    tracing::info!("Analyzing: {}", file.display());
    tracing::info!("Output directory: {}", config.output_dir.display());
    tracing::info!("Memory limit: {}MB", config.max_memory_mb);

    println!("🚀 Starting HAR analysis...");

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Analyzing {}", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = analyze_har(file, &config);
    spinner.finish_and_clear();
    let analysis = result?;

    println!("\n{}", analysis.summary_text());

    if config.report.include_percentiles {
        output_percentiles(analysis.report());
    }
    if config.report.include_timeline {
        output_timeline(analysis.report());
    }

    let export = format.export_format();
    let writes_files = export.is_some() || !options.no_report;
    if writes_files {
        validate_output_directory(&config.output_dir)?;
    }

    if let Some(export) = export {
        let path = config
            .output_dir
            .join(format!("{}.{}", EXPORT_STEM, export.extension()));
        println!("💾 Exporting data to: {}", path.display());
        analysis.export(&path, export)?;
    }

    if !options.no_report {
        let path = config.output_dir.join(REPORT_FILE);
        write_report(analysis.report(), &path)?;
        println!("{} Report generated: {}", style("✅").green(), path.display());
    }

    output_issues(analysis.report());

    if writes_files {
        println!(
            "\n🎉 Analysis complete! Check {} for outputs.",
            config.output_dir.display()
        );
    } else {
        println!("\n🎉 Analysis complete!");
    }

    Ok(())
}

fn output_percentiles(report: &AnalysisReport) {
    let p = &report.percentiles;

    println!("{}", style("Response Time Percentiles:").bold());
    println!("  p50: {:.0}ms", p.p50);
    println!("  p75: {:.0}ms", p.p75);
    println!("  p90: {:.0}ms", p.p90);
    println!("  p95: {:.0}ms", p.p95);
    println!("  p99: {:.0}ms", p.p99);

    println!("\n{}", style("By Resource Type:").bold());
    for summary in &report.summary_by_type {
        println!(
            "  {:<6} {:>5} requests  avg {:>8.2}ms  p95 {:>8.2}ms  {:>10.2}KB  {:>6.2}% ok",
            summary.resource_type.as_str(),
            summary.requests_count,
            summary.avg_response_time_ms,
            summary.p95_response_time_ms,
            summary.total_size_kb,
            summary.success_rate_percent
        );
    }
    println!();
}

fn output_timeline(report: &AnalysisReport) {
    let timing = &report.timing_breakdown;

    println!("{}", style("Timing Breakdown:").bold());
    for phase in TimingPhase::ALL {
        println!(
            "  {:<8} avg {:>8.2}ms  median {:>8.2}ms  p95 {:>8.2}ms",
            phase.as_str(),
            timing.averages.get(phase),
            timing.medians.get(phase),
            timing.p95.get(phase)
        );
    }
    println!();
}

fn output_issues(report: &AnalysisReport) {
    let issues = &report.performance_issues;
    if issues.is_empty() {
        return;
    }

    println!("\n{}", style("🚨 Performance Issues Detected:").red().bold());
    for issue in issues {
        let icon = match issue.severity {
            Severity::High => "🔴",
            Severity::Medium => "🟡",
        };
        println!("{} {}", icon, issue.description);
        println!("   💡 {}", style(&issue.recommendation).dim());
    }
}
