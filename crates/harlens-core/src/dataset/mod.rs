//! The uniform row model the metrics engine works on.

mod export;
mod loader;
mod normalize;
mod resource_type;

pub use export::ExportFormat;
pub use loader::{CaptureLoader, MEMORY_CHECK_INTERVAL, Metadata};
pub use normalize::{EntryNormalizer, parse_start_time};
pub use resource_type::ResourceType;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized capture entry.
///
/// Timing fields are kept raw, so they may carry HAR's `-1` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub url: String,
    pub method: String,
    pub status_code: i64,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub mime_type: String,
    pub response_time_ms: f64,
    pub size_bytes: f64,
    pub size_kb: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub timing_blocked: f64,
    pub timing_dns: f64,
    pub timing_connect: f64,
    pub timing_send: f64,
    pub timing_wait: f64,
    pub timing_receive: f64,
}

impl Row {
    /// A row with the given url and defaults everywhere else.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            resource_type: ResourceType::categorize("", &url),
            url,
            method: "GET".to_string(),
            status_code: 0,
            mime_type: String::new(),
            response_time_ms: 0.0,
            size_bytes: 0.0,
            size_kb: 0.0,
            start_time: None,
            timing_blocked: 0.0,
            timing_dns: 0.0,
            timing_connect: 0.0,
            timing_send: 0.0,
            timing_wait: 0.0,
            timing_receive: 0.0,
        }
    }

    /// Set the size in bytes, keeping `size_kb` in step.
    pub fn with_size_bytes(mut self, size_bytes: f64) -> Self {
        self.size_bytes = size_bytes;
        self.size_kb = size_bytes / 1024.0;
        self
    }
}

/// Ordered collection of rows, in capture entry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn response_times(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.response_time_ms).collect()
    }

    /// Rows grouped by resource type, groups in order of first appearance
    /// and rows in capture order within each group.
    pub fn group_by_type(&self) -> Vec<(ResourceType, Vec<&Row>)> {
        let mut groups: Vec<(ResourceType, Vec<&Row>)> = Vec::new();
        for row in &self.rows {
            match groups.iter_mut().find(|(t, _)| *t == row.resource_type) {
                Some((_, members)) => members.push(row),
                None => groups.push((row.resource_type, vec![row])),
            }
        }
        groups
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
