use crate::analysis::{
    AnalysisReport, Analyzer, BasicStats, BreakdownAnalyzer, GradeAnalyzer, IssueDetector,
    PercentileAnalyzer, TimingAnalyzer, TopResources, TopResourcesAnalyzer, TypeSummaryAnalyzer,
    WebVitalsAnalyzer,
};
use crate::config::AnalyzerConfig;
use crate::dataset::{CaptureLoader, Dataset, ExportFormat, Metadata};
use crate::{Error, Result};
use std::path::Path;

/// Runs the whole pipeline: load a capture, compute every metric, and
/// assemble the report.
pub struct HarAnalyzer {
    config: AnalyzerConfig,
    loader: CaptureLoader,
}

impl HarAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let loader = CaptureLoader::new(config.max_memory_mb);
        Self { config, loader }
    }

    /// Use a custom loader, e.g. one with a fake memory probe.
    pub fn with_loader(config: AnalyzerConfig, loader: CaptureLoader) -> Self {
        Self { config, loader }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, path: &Path) -> Result<Analysis> {
        tracing::info!("Starting analysis of HAR file: {}", path.display());

        self.loader
            .load(path)
            .and_then(|(dataset, metadata)| self.analyze_dataset(dataset, metadata))
            .map_err(|e| {
                tracing::error!("Analysis failed: {}", e);
                Error::analysis_failed(e)
            })
    }

    pub fn analyze_str(&self, content: &str) -> Result<Analysis> {
        self.loader
            .load_str(content)
            .and_then(|(dataset, metadata)| self.analyze_dataset(dataset, metadata))
            .map_err(|e| {
                tracing::error!("Analysis failed: {}", e);
                Error::analysis_failed(e)
            })
    }

    /// Compute the report for rows that are already loaded.
    pub fn analyze_dataset(&self, dataset: Dataset, metadata: Metadata) -> Result<Analysis> {
        tracing::info!("Calculating performance metrics...");

        let basic_stats = BasicStats::from_dataset(&dataset, self.loader.current_memory_mb());
        tracing::debug!(
            "Basic stats: {} requests, {:.1}s total time, {:.1}MB total size",
            basic_stats.total_requests,
            basic_stats.total_time_ms / 1000.0,
            basic_stats.total_size_kb / 1024.0
        );

        let top_n = self.config.report.top_n_resources;
        let report = AnalysisReport {
            metadata,
            basic_stats,
            performance_grade: GradeAnalyzer::new(self.config.thresholds.clone())
                .analyze(&dataset)?,
            summary_by_type: TypeSummaryAnalyzer.analyze(&dataset)?,
            percentiles: PercentileAnalyzer.analyze(&dataset)?,
            top_resources: TopResources {
                slowest: TopResourcesAnalyzer::slowest(top_n).analyze(&dataset)?,
                largest: TopResourcesAnalyzer::largest(top_n).analyze(&dataset)?,
            },
            core_web_vitals: WebVitalsAnalyzer.analyze(&dataset)?,
            timing_breakdown: TimingAnalyzer.analyze(&dataset)?,
            performance_issues: IssueDetector::default().analyze(&dataset)?,
            resource_breakdown: BreakdownAnalyzer.analyze(&dataset)?,
        };

        tracing::info!("Analysis completed successfully");
        Ok(Analysis { report, dataset })
    }
}

/// The outcome of one run: the report plus the rows it was computed from.
#[derive(Debug, Clone)]
pub struct Analysis {
    report: AnalysisReport,
    dataset: Dataset,
}

impl Analysis {
    pub fn report(&self) -> &AnalysisReport {
        &self.report
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_parts(self) -> (AnalysisReport, Dataset) {
        (self.report, self.dataset)
    }

    /// Write the normalized rows to `path`.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<()> {
        self.dataset.export(path, format)
    }

    /// Short human readable digest of the report.
    pub fn summary_text(&self) -> String {
        let basic = &self.report.basic_stats;
        let grade = &self.report.performance_grade;

        let mut out = format!(
            "HAR Analysis Summary\n\
             ===================\n\
             \n\
             📊 Total Requests: {}\n\
             ⏱️ Total Load Time: {:.1} seconds\n\
             📦 Total Data Size: {:.1} MB\n\
             🎯 Average Response: {:.0}ms\n\
             \n\
             {} Overall Grade: {}\n\
             {}\n",
            group_thousands(basic.total_requests),
            basic.total_time_ms / 1000.0,
            basic.total_size_kb / 1024.0,
            basic.avg_response_time_ms,
            grade.emoji,
            grade.label,
            grade.explanation,
        );

        let issues = &self.report.performance_issues;
        if !issues.is_empty() {
            out.push_str("\n🚨 Performance Issues Detected:\n");
            for issue in issues {
                out.push_str(&format!("• {} - {}\n", issue.description, issue.recommendation));
            }
        }

        out
    }
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
