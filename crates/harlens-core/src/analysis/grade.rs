use super::{Analyzer, require_rows, stats};
use crate::Result;
use crate::config::Thresholds;
use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+ EXCELLENT",
            Grade::B => "B GOOD",
            Grade::C => "C NEEDS IMPROVEMENT",
            Grade::D => "D POOR - URGENT ACTION NEEDED",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Grade::APlus => "🟢",
            Grade::B => "🟡",
            Grade::C => "🟠",
            Grade::D => "🔴",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            Grade::APlus => "Outstanding performance! Fast loading times across all resources.",
            Grade::B => {
                "Good performance with room for optimization. Some resources may be slower."
            }
            Grade::C => {
                "Moderate performance issues. Optimization recommended for better user experience."
            }
            Grade::D => {
                "Poor performance affecting user experience. Immediate optimization required."
            }
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceGrade {
    pub grade: Grade,
    pub label: String,
    pub emoji: String,
    pub explanation: String,
    pub avg_response_time_ms: f64,
    pub p95_response_time_ms: f64,
}

/// Grades a capture from its mean and 95th percentile response times.
pub struct GradeAnalyzer {
    thresholds: Thresholds,
}

impl GradeAnalyzer {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    /// A tier is awarded only when both the mean and the p95 are under that
    /// tier's pair of limits; the best such tier wins.
    pub fn grade_for(&self, avg_response_ms: f64, p95_response_ms: f64) -> Grade {
        let t = &self.thresholds;
        let tiers = [
            (Grade::APlus, t.a_plus, t.p95_a_plus),
            (Grade::B, t.b, t.p95_b),
            (Grade::C, t.c, t.p95_c),
        ];

        tiers
            .into_iter()
            .find(|(_, mean_limit, p95_limit)| {
                avg_response_ms < *mean_limit && p95_response_ms < *p95_limit
            })
            .map(|(grade, _, _)| grade)
            .unwrap_or(Grade::D)
    }
}

impl Analyzer for GradeAnalyzer {
    type Output = PerformanceGrade;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        require_rows(data, "a performance grade")?;

        let times = data.response_times();
        let avg = stats::mean(&times).unwrap_or(0.0);
        let p95 = stats::quantile(&times, 0.95).unwrap_or(0.0);
        let grade = self.grade_for(avg, p95);

        tracing::info!(
            "Performance grade {} (avg={:.2}ms, p95={:.2}ms)",
            grade,
            avg,
            p95
        );

        Ok(PerformanceGrade {
            grade,
            label: grade.label().to_string(),
            emoji: grade.emoji().to_string(),
            explanation: grade.explanation().to_string(),
            avg_response_time_ms: avg,
            p95_response_time_ms: p95,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample_dataset;

    #[test]
    fn test_grade_excellent() {
        let thresholds = Thresholds {
            a_plus: 300.0,
            p95_a_plus: 1000.0,
            ..Thresholds::default()
        };

        let result = GradeAnalyzer::new(thresholds)
            .analyze(&sample_dataset())
            .unwrap();

        assert_eq!(result.grade, Grade::APlus);
        assert_eq!(result.emoji, "🟢");
        assert!(result.explanation.contains("Outstanding"));
        assert_eq!(result.avg_response_time_ms, 125.0);
    }

    #[test]
    fn test_grade_poor() {
        let thresholds = Thresholds {
            a_plus: 50.0,
            b: 75.0,
            c: 100.0,
            ..Thresholds::default()
        };

        let result = GradeAnalyzer::new(thresholds)
            .analyze(&sample_dataset())
            .unwrap();

        assert_eq!(result.grade, Grade::D);
        assert_eq!(result.emoji, "🔴");
        assert!(result.explanation.contains("Poor"));
    }

    #[test]
    fn test_grade_is_conjunctive() {
        let thresholds = Thresholds {
            a_plus: 300.0,
            p95_a_plus: 1000.0,
            ..Thresholds::default()
        };
        let analyzer = GradeAnalyzer::new(thresholds);
        assert_eq!(analyzer.grade_for(150.0, 150.0), Grade::APlus);

        let strict = GradeAnalyzer::new(Thresholds {
            a_plus: 50.0,
            b: 75.0,
            c: 100.0,
            ..Thresholds::default()
        });
        assert_eq!(strict.grade_for(150.0, 150.0), Grade::D);

        // A fast mean does not rescue a slow tail
        let defaults = GradeAnalyzer::new(Thresholds::default());
        assert_eq!(defaults.grade_for(100.0, 1500.0), Grade::C);
        assert_eq!(defaults.grade_for(100.0, 2500.0), Grade::D);
        assert_eq!(defaults.grade_for(350.0, 100.0), Grade::B);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let analyzer = GradeAnalyzer::new(Thresholds::default());
        assert_eq!(analyzer.grade_for(200.0, 100.0), Grade::B);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
    }
}
