use super::Analyzer;
use crate::Result;
use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response time histogram labels, fastest first.
pub const TIME_BUCKETS: [&str; 5] = ["<100ms", "100-500ms", "500ms-1s", "1s-2s", ">2s"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    pub counts: BTreeMap<String, usize>,
    pub sizes_kb: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBreakdown {
    pub by_type: TypeBreakdown,
    pub by_status: BTreeMap<i64, usize>,
    pub by_method: BTreeMap<String, usize>,
    pub time_distribution: Vec<TimeBucket>,
}

pub struct BreakdownAnalyzer;

impl BreakdownAnalyzer {
    /// Buckets are closed on the right; anything at or under 100ms, zero and
    /// negative times included, lands in the first one.
    pub fn bucket_index(response_time_ms: f64) -> usize {
        match response_time_ms {
            t if t <= 100.0 => 0,
            t if t <= 500.0 => 1,
            t if t <= 1000.0 => 2,
            t if t <= 2000.0 => 3,
            _ => 4,
        }
    }
}

impl Analyzer for BreakdownAnalyzer {
    type Output = ResourceBreakdown;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        let mut by_type = TypeBreakdown::default();
        let mut by_status = BTreeMap::new();
        let mut by_method = BTreeMap::new();
        let mut histogram = [0usize; TIME_BUCKETS.len()];

        for row in data {
            let key = row.resource_type.as_str().to_string();
            *by_type.counts.entry(key.clone()).or_default() += 1;
            *by_type.sizes_kb.entry(key).or_default() += row.size_kb;
            *by_status.entry(row.status_code).or_default() += 1;
            *by_method.entry(row.method.clone()).or_default() += 1;
            histogram[Self::bucket_index(row.response_time_ms)] += 1;
        }

        let time_distribution = TIME_BUCKETS
            .iter()
            .zip(histogram)
            .map(|(label, count)| TimeBucket {
                label: label.to_string(),
                count,
            })
            .collect();

        Ok(ResourceBreakdown {
            by_type,
            by_status,
            by_method,
            time_distribution,
        })
    }
}
