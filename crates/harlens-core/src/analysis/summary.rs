use super::{Analyzer, stats};
use crate::Result;
use crate::dataset::{Dataset, ResourceType, Row};
use serde::{Deserialize, Serialize};

/// Per resource type statistics, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub requests_count: usize,
    pub avg_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub min_response_time_ms: f64,
    /// Undefined for a single request
    pub std_response_time_ms: Option<f64>,
    pub p90_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub total_size_kb: f64,
    pub avg_size_kb: f64,
    pub max_size_kb: f64,
    pub min_size_kb: f64,
    /// Share of requests answered with HTTP 200, in percent
    pub success_rate_percent: f64,
}

/// Groups rows by resource type and summarizes each group.
pub struct TypeSummaryAnalyzer;

impl TypeSummaryAnalyzer {
    fn summarize(resource_type: ResourceType, rows: &[&Row]) -> TypeSummary {
        let times: Vec<f64> = rows.iter().map(|r| r.response_time_ms).collect();
        let sizes: Vec<f64> = rows.iter().map(|r| r.size_kb).collect();
        let successes = rows.iter().filter(|r| r.status_code == 200).count();

        let mut sorted_times = times.clone();
        sorted_times.sort_by(f64::total_cmp);

        // Groups are never empty, so the fallbacks below are unreachable.
        let rounded = |value: Option<f64>| stats::round2(value.unwrap_or(0.0));

        TypeSummary {
            resource_type,
            requests_count: rows.len(),
            avg_response_time_ms: rounded(stats::mean(&times)),
            max_response_time_ms: rounded(stats::max(&times)),
            min_response_time_ms: rounded(stats::min(&times)),
            std_response_time_ms: stats::sample_std(&times).map(stats::round2),
            p90_response_time_ms: rounded(stats::quantile_sorted(&sorted_times, 0.90)),
            p95_response_time_ms: rounded(stats::quantile_sorted(&sorted_times, 0.95)),
            total_size_kb: stats::round2(stats::sum(&sizes)),
            avg_size_kb: rounded(stats::mean(&sizes)),
            max_size_kb: rounded(stats::max(&sizes)),
            min_size_kb: rounded(stats::min(&sizes)),
            success_rate_percent: stats::round2(successes as f64 / rows.len() as f64 * 100.0),
        }
    }
}

impl Analyzer for TypeSummaryAnalyzer {
    type Output = Vec<TypeSummary>;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        tracing::debug!("Calculating performance summary by type");

        let mut summaries: Vec<TypeSummary> = data
            .group_by_type()
            .into_iter()
            .map(|(resource_type, rows)| Self::summarize(resource_type, &rows))
            .collect();
        summaries.sort_by(|a, b| a.resource_type.as_str().cmp(b.resource_type.as_str()));

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample_dataset;

    #[test]
    fn test_summary_by_type() {
        let summary = TypeSummaryAnalyzer.analyze(&sample_dataset()).unwrap();

        assert_eq!(summary.len(), 2);
        // Sorted by type name
        assert_eq!(summary[0].resource_type, ResourceType::Css);
        assert_eq!(summary[1].resource_type, ResourceType::Js);

        let js = &summary[1];
        assert_eq!(js.requests_count, 1);
        assert_eq!(js.avg_response_time_ms, 150.0);
        assert_eq!(js.total_size_kb, 1.0);
        assert_eq!(js.std_response_time_ms, None);
        assert_eq!(js.success_rate_percent, 100.0);

        let css = &summary[0];
        assert_eq!(css.requests_count, 1);
        assert_eq!(css.avg_response_time_ms, 100.0);
        assert_eq!(css.total_size_kb, 0.5);
    }

    #[test]
    fn test_group_statistics() {
        let rows = [(100.0, 200), (300.0, 404), (200.0, 200), (400.0, 500)]
            .into_iter()
            .enumerate()
            .map(|(i, (time, status))| {
                let mut row = Row::new(format!("https://example.com/{i}.png"))
                    .with_size_bytes(1024.0 * (i as f64 + 1.0));
                row.response_time_ms = time;
                row.status_code = status;
                row
            })
            .collect::<Dataset>();

        let summary = TypeSummaryAnalyzer.analyze(&rows).unwrap();
        assert_eq!(summary.len(), 1);

        let image = &summary[0];
        assert_eq!(image.resource_type, ResourceType::Image);
        assert_eq!(image.requests_count, 4);
        assert_eq!(image.avg_response_time_ms, 250.0);
        assert_eq!(image.max_response_time_ms, 400.0);
        assert_eq!(image.min_response_time_ms, 100.0);
        assert_eq!(image.std_response_time_ms, Some(129.1));
        assert_eq!(image.p90_response_time_ms, 370.0);
        assert_eq!(image.p95_response_time_ms, 385.0);
        assert_eq!(image.total_size_kb, 10.0);
        assert_eq!(image.avg_size_kb, 2.5);
        assert_eq!(image.max_size_kb, 4.0);
        assert_eq!(image.min_size_kb, 1.0);
        assert_eq!(image.success_rate_percent, 50.0);
    }

    #[test]
    fn test_empty_dataset_has_no_groups() {
        let summary = TypeSummaryAnalyzer.analyze(&Dataset::default()).unwrap();
        assert!(summary.is_empty());
    }
}
