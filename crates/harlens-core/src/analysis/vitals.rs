use super::Analyzer;
use crate::Result;
use crate::dataset::{Dataset, ResourceType, Row};
use serde::{Deserialize, Serialize};

pub const APPROXIMATION_NOTE: &str = "These are approximations based on HAR data. \
     Real Core Web Vitals require browser performance APIs.";

/// Rough stand-ins for Core Web Vitals, derived from network timings only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreWebVitals {
    /// Fastest HTML response; 0 when the capture has no HTML document.
    pub fcp_approximation_ms: f64,
    /// Response time of the largest image, falling back to the FCP value.
    pub lcp_approximation_ms: f64,
    /// Layout shift cannot be observed from network data, so this stays null.
    pub cls_approximation: Option<f64>,
    pub note: String,
}

pub struct WebVitalsAnalyzer;

impl Analyzer for WebVitalsAnalyzer {
    type Output = CoreWebVitals;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        let fcp = data
            .iter()
            .filter(|r| r.resource_type == ResourceType::Html)
            .map(|r| r.response_time_ms)
            .reduce(f64::min)
            .unwrap_or(0.0);

        // First of equally large images wins
        let largest_image = data
            .iter()
            .filter(|r| r.resource_type == ResourceType::Image)
            .fold(None, |best: Option<&Row>, row| match best {
                Some(b) if b.size_kb >= row.size_kb => Some(b),
                _ => Some(row),
            });
        let lcp = largest_image.map_or(fcp, |row| row.response_time_ms);

        Ok(CoreWebVitals {
            fcp_approximation_ms: fcp,
            lcp_approximation_ms: lcp,
            cls_approximation: None,
            note: APPROXIMATION_NOTE.to_string(),
        })
    }
}
