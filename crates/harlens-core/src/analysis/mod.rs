mod breakdown;
mod grade;
mod issues;
mod performance;
pub mod stats;
mod summary;
mod timing;
mod vitals;

pub use breakdown::{BreakdownAnalyzer, ResourceBreakdown, TIME_BUCKETS, TimeBucket, TypeBreakdown};
pub use grade::{Grade, GradeAnalyzer, PerformanceGrade};
pub use issues::{Issue, IssueDetector, IssueKind, Severity};
pub use performance::{
    PercentileAnalyzer, Percentiles, RankMetric, RankedResource, TopResourceGroup,
    TopResourcesAnalyzer,
};
pub use summary::{TypeSummary, TypeSummaryAnalyzer};
pub use timing::{PhaseTimings, TimingAnalyzer, TimingBreakdown, TimingPhase};
pub use vitals::{CoreWebVitals, WebVitalsAnalyzer};

use crate::dataset::{Dataset, Metadata};
use serde::{Deserialize, Serialize};

/// Everything one analysis run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: Metadata,
    pub basic_stats: BasicStats,
    pub performance_grade: PerformanceGrade,
    pub summary_by_type: Vec<TypeSummary>,
    pub percentiles: Percentiles,
    pub top_resources: TopResources,
    pub core_web_vitals: CoreWebVitals,
    pub timing_breakdown: TimingBreakdown,
    pub performance_issues: Vec<Issue>,
    pub resource_breakdown: ResourceBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_requests: usize,
    pub total_time_ms: f64,
    pub total_size_kb: f64,
    pub avg_response_time_ms: f64,
    /// Process memory after loading; absent when it cannot be measured
    pub memory_usage_mb: Option<f64>,
}

impl BasicStats {
    pub fn from_dataset(data: &Dataset, memory_usage_mb: Option<f64>) -> Self {
        let times = data.response_times();
        let total_time_ms = stats::sum(&times);
        Self {
            total_requests: data.len(),
            total_time_ms,
            total_size_kb: data.iter().map(|r| r.size_kb).sum(),
            avg_response_time_ms: stats::mean(&times).unwrap_or(0.0),
            memory_usage_mb,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopResources {
    pub slowest: Vec<TopResourceGroup>,
    pub largest: Vec<TopResourceGroup>,
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, data: &Dataset) -> crate::Result<Self::Output>;
}

/// Fails with an analysis error when there is nothing to aggregate.
pub(crate) fn require_rows(data: &Dataset, what: &str) -> crate::Result<()> {
    if data.is_empty() {
        return Err(crate::Error::Analysis(format!(
            "Cannot compute {what} without any requests"
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::dataset::{Dataset, Row};

    /// A script and a stylesheet, both fast and successful.
    pub fn sample_dataset() -> Dataset {
        let mut script = Row::new("https://example.com/script.js").with_size_bytes(1024.0);
        script.status_code = 200;
        script.mime_type = "application/javascript".to_string();
        script.response_time_ms = 150.0;
        script.timing_blocked = 10.0;
        script.timing_dns = 20.0;
        script.timing_connect = 30.0;
        script.timing_send = 5.0;
        script.timing_wait = 75.0;
        script.timing_receive = 10.0;

        let mut style = Row::new("https://example.com/style.css").with_size_bytes(512.0);
        style.status_code = 200;
        style.mime_type = "text/css".to_string();
        style.response_time_ms = 100.0;
        style.timing_blocked = 5.0;
        style.timing_send = 3.0;
        style.timing_wait = 85.0;
        style.timing_receive = 7.0;

        Dataset::new(vec![script, style])
    }

    pub fn row(url: &str, response_time_ms: f64, size_kb: f64, status_code: i64) -> Row {
        let mut row = Row::new(url).with_size_bytes(size_kb * 1024.0);
        row.response_time_ms = response_time_ms;
        row.status_code = status_code;
        row
    }
}
