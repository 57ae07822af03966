use super::Analyzer;
use crate::Result;
use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    SlowResources,
    LargeResources,
    TooManyRequests,
    FailedRequests,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub count: usize,
    pub description: String,
    pub recommendation: String,
}

/// Heuristic checks over the whole capture. Each check fires on its own, and
/// findings are reported in a fixed order.
#[derive(Debug, Clone)]
pub struct IssueDetector {
    pub slow_threshold_ms: f64,
    pub large_threshold_kb: f64,
    pub max_requests: usize,
}

impl Default for IssueDetector {
    fn default() -> Self {
        Self {
            slow_threshold_ms: 2000.0,
            large_threshold_kb: 1024.0,
            max_requests: 100,
        }
    }
}

impl Analyzer for IssueDetector {
    type Output = Vec<Issue>;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        let mut issues = Vec::new();

        let slow = data
            .iter()
            .filter(|r| r.response_time_ms > self.slow_threshold_ms)
            .count();
        if slow > 0 {
            issues.push(Issue {
                kind: IssueKind::SlowResources,
                severity: Severity::High,
                count: slow,
                description: format!(
                    "{slow} resources taking over {}ms",
                    self.slow_threshold_ms
                ),
                recommendation: "Optimize slow-loading resources, consider CDN, compression"
                    .to_string(),
            });
        }

        let large = data
            .iter()
            .filter(|r| r.size_kb > self.large_threshold_kb)
            .count();
        if large > 0 {
            issues.push(Issue {
                kind: IssueKind::LargeResources,
                severity: Severity::Medium,
                count: large,
                description: format!("{large} resources over {}KB", self.large_threshold_kb),
                recommendation: "Optimize file sizes, use compression, lazy loading".to_string(),
            });
        }

        let total = data.len();
        if total > self.max_requests {
            issues.push(Issue {
                kind: IssueKind::TooManyRequests,
                severity: Severity::Medium,
                count: total,
                description: format!("High number of requests ({total})"),
                recommendation: "Combine files, use sprite sheets, reduce dependencies"
                    .to_string(),
            });
        }

        let failed = data.iter().filter(|r| r.status_code >= 400).count();
        if failed > 0 {
            issues.push(Issue {
                kind: IssueKind::FailedRequests,
                severity: Severity::High,
                count: failed,
                description: format!("{failed} failed requests (4xx/5xx status)"),
                recommendation: "Fix broken links and server errors".to_string(),
            });
        }

        if !issues.is_empty() {
            tracing::info!("Detected {} performance issue(s)", issues.len());
        }

        Ok(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{row, sample_dataset};

    #[test]
    fn test_clean_capture_has_no_issues() {
        let issues = IssueDetector::default().analyze(&sample_dataset()).unwrap();
        assert!(issues.is_empty());
    }

    #[test]
    fn test_slow_and_failed_requests() {
        let data = Dataset::new(vec![
            row("https://example.com/slow.js", 3000.0, 10.0, 200),
            row("https://example.com/edge.js", 2000.0, 10.0, 200),
            row("https://example.com/missing.png", 50.0, 1.0, 404),
            row("https://example.com/api/boom", 80.0, 1.0, 503),
        ]);

        let issues = IssueDetector::default().analyze(&data).unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, IssueKind::SlowResources);
        assert_eq!(issues[0].severity, Severity::High);
        assert_eq!(issues[0].count, 1);
        assert_eq!(issues[0].description, "1 resources taking over 2000ms");

        assert_eq!(issues[1].kind, IssueKind::FailedRequests);
        assert_eq!(issues[1].count, 2);
        assert_eq!(issues[1].description, "2 failed requests (4xx/5xx status)");
    }

    #[test]
    fn test_large_resources_and_request_count() {
        let mut rows: Vec<_> = (0..101)
            .map(|i| row(&format!("https://example.com/{i}.js"), 10.0, 1.0, 200))
            .collect();
        rows.push(row("https://example.com/video.mp4", 10.0, 2048.0, 200));

        let issues = IssueDetector::default()
            .analyze(&Dataset::new(rows))
            .unwrap();

        let kinds: Vec<IssueKind> = issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            [IssueKind::LargeResources, IssueKind::TooManyRequests]
        );
        assert_eq!(issues[0].description, "1 resources over 1024KB");
        assert_eq!(issues[1].description, "High number of requests (102)");
        assert_eq!(issues[1].severity, Severity::Medium);
    }

    #[test]
    fn test_issue_serialization() {
        let issue = Issue {
            kind: IssueKind::TooManyRequests,
            severity: Severity::Medium,
            count: 120,
            description: String::new(),
            recommendation: String::new(),
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "too_many_requests");
        assert_eq!(json["severity"], "medium");
    }
}
