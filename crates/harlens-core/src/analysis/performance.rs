use super::{Analyzer, require_rows, stats};
use crate::Result;
use crate::dataset::{Dataset, ResourceType, Row};
use serde::{Deserialize, Serialize};

/// Global response time percentiles, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

pub struct PercentileAnalyzer;

impl Analyzer for PercentileAnalyzer {
    type Output = Percentiles;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        require_rows(data, "percentiles")?;

        let mut times = data.response_times();
        times.sort_by(f64::total_cmp);
        let at = |q: f64| stats::quantile_sorted(&times, q).unwrap_or(0.0);

        let percentiles = Percentiles {
            p50: at(0.50),
            p75: at(0.75),
            p90: at(0.90),
            p95: at(0.95),
            p99: at(0.99),
        };

        tracing::debug!(
            "Percentiles: p50={:.2}ms, p95={:.2}ms",
            percentiles.p50,
            percentiles.p95
        );

        Ok(percentiles)
    }
}

/// Column a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMetric {
    #[serde(rename = "response_time_ms")]
    ResponseTime,
    #[serde(rename = "size_kb")]
    Size,
}

impl RankMetric {
    pub fn value(&self, row: &Row) -> f64 {
        match self {
            RankMetric::ResponseTime => row.response_time_ms,
            RankMetric::Size => row.size_kb,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResource {
    pub url: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub method: String,
    pub status_code: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopResourceGroup {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub metric: RankMetric,
    pub resources: Vec<RankedResource>,
}

/// Finds the top N rows per resource type for a metric.
pub struct TopResourcesAnalyzer {
    metric: RankMetric,
    top_n: usize,
}

impl TopResourcesAnalyzer {
    pub fn new(metric: RankMetric, top_n: usize) -> Self {
        Self { metric, top_n }
    }

    pub fn slowest(top_n: usize) -> Self {
        Self::new(RankMetric::ResponseTime, top_n)
    }

    pub fn largest(top_n: usize) -> Self {
        Self::new(RankMetric::Size, top_n)
    }
}

impl Analyzer for TopResourcesAnalyzer {
    type Output = Vec<TopResourceGroup>;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        tracing::debug!("Ranking top {} resources by {:?}", self.top_n, self.metric);

        let groups = data
            .group_by_type()
            .into_iter()
            .map(|(resource_type, mut rows)| {
                // Stable sort: equal values keep capture order
                rows.sort_by(|a, b| self.metric.value(b).total_cmp(&self.metric.value(a)));
                rows.truncate(self.top_n);

                TopResourceGroup {
                    resource_type,
                    metric: self.metric,
                    resources: rows
                        .into_iter()
                        .map(|row| RankedResource {
                            url: row.url.clone(),
                            value: self.metric.value(row),
                            resource_type: row.resource_type,
                            method: row.method.clone(),
                            status_code: row.status_code,
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{row, sample_dataset};

    #[test]
    fn test_percentiles() {
        let percentiles = PercentileAnalyzer.analyze(&sample_dataset()).unwrap();

        // With two data points (100, 150), the median sits halfway
        assert_eq!(percentiles.p50, 125.0);
        assert_eq!(percentiles.p95, 147.5);
        assert!(percentiles.p75 <= percentiles.p90);
        assert!(percentiles.p99 <= 150.0);
    }

    #[test]
    fn test_percentiles_require_rows() {
        assert!(PercentileAnalyzer.analyze(&Dataset::default()).is_err());
    }

    #[test]
    fn test_top_resources_per_type() {
        let top = TopResourcesAnalyzer::slowest(1)
            .analyze(&sample_dataset())
            .unwrap();

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].resource_type, ResourceType::Js);
        assert_eq!(top[0].resources.len(), 1);
        assert_eq!(top[0].resources[0].value, 150.0);
        assert_eq!(top[1].resource_type, ResourceType::Css);
    }

    #[test]
    fn test_top_n_larger_than_group_returns_whole_group() {
        let top = TopResourcesAnalyzer::largest(50)
            .analyze(&sample_dataset())
            .unwrap();

        assert!(top.iter().all(|group| group.resources.len() == 1));
        assert_eq!(top[0].metric, RankMetric::Size);
        assert_eq!(top[0].resources[0].value, 1.0);
    }

    #[test]
    fn test_ties_keep_capture_order() {
        let data = Dataset::new(vec![
            row("https://example.com/first.js", 300.0, 1.0, 200),
            row("https://example.com/slow.js", 900.0, 1.0, 200),
            row("https://example.com/second.js", 300.0, 1.0, 200),
            row("https://example.com/third.js", 300.0, 1.0, 200),
        ]);

        let top = TopResourcesAnalyzer::slowest(3).analyze(&data).unwrap();
        let urls: Vec<&str> = top[0].resources.iter().map(|r| r.url.as_str()).collect();

        assert_eq!(
            urls,
            [
                "https://example.com/slow.js",
                "https://example.com/first.js",
                "https://example.com/second.js"
            ]
        );
    }
}
