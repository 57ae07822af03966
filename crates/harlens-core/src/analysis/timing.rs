use super::{Analyzer, stats};
use crate::Result;
use crate::dataset::{Dataset, Row};
use serde::{Deserialize, Serialize};

/// One phase of a request's network lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingPhase {
    Blocked,
    Dns,
    Connect,
    Send,
    Wait,
    Receive,
}

impl TimingPhase {
    pub const ALL: [TimingPhase; 6] = [
        TimingPhase::Blocked,
        TimingPhase::Dns,
        TimingPhase::Connect,
        TimingPhase::Send,
        TimingPhase::Wait,
        TimingPhase::Receive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimingPhase::Blocked => "blocked",
            TimingPhase::Dns => "dns",
            TimingPhase::Connect => "connect",
            TimingPhase::Send => "send",
            TimingPhase::Wait => "wait",
            TimingPhase::Receive => "receive",
        }
    }

    /// Phase duration for a row, with "not applicable" markers clamped to 0.
    pub fn value(&self, row: &Row) -> f64 {
        let raw = match self {
            TimingPhase::Blocked => row.timing_blocked,
            TimingPhase::Dns => row.timing_dns,
            TimingPhase::Connect => row.timing_connect,
            TimingPhase::Send => row.timing_send,
            TimingPhase::Wait => row.timing_wait,
            TimingPhase::Receive => row.timing_receive,
        };
        raw.max(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub blocked: f64,
    pub dns: f64,
    pub connect: f64,
    pub send: f64,
    pub wait: f64,
    pub receive: f64,
}

impl PhaseTimings {
    pub fn get(&self, phase: TimingPhase) -> f64 {
        match phase {
            TimingPhase::Blocked => self.blocked,
            TimingPhase::Dns => self.dns,
            TimingPhase::Connect => self.connect,
            TimingPhase::Send => self.send,
            TimingPhase::Wait => self.wait,
            TimingPhase::Receive => self.receive,
        }
    }

    fn get_mut(&mut self, phase: TimingPhase) -> &mut f64 {
        match phase {
            TimingPhase::Blocked => &mut self.blocked,
            TimingPhase::Dns => &mut self.dns,
            TimingPhase::Connect => &mut self.connect,
            TimingPhase::Send => &mut self.send,
            TimingPhase::Wait => &mut self.wait,
            TimingPhase::Receive => &mut self.receive,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingBreakdown {
    pub averages: PhaseTimings,
    pub medians: PhaseTimings,
    pub p95: PhaseTimings,
    pub totals: PhaseTimings,
}

pub struct TimingAnalyzer;

impl Analyzer for TimingAnalyzer {
    type Output = TimingBreakdown;

    fn analyze(&self, data: &Dataset) -> Result<Self::Output> {
        let mut breakdown = TimingBreakdown::default();

        for phase in TimingPhase::ALL {
            let mut values: Vec<f64> = data.iter().map(|row| phase.value(row)).collect();
            values.sort_by(f64::total_cmp);

            *breakdown.averages.get_mut(phase) = stats::mean(&values).unwrap_or(0.0);
            *breakdown.medians.get_mut(phase) = stats::quantile_sorted(&values, 0.5).unwrap_or(0.0);
            *breakdown.p95.get_mut(phase) = stats::quantile_sorted(&values, 0.95).unwrap_or(0.0);
            *breakdown.totals.get_mut(phase) = stats::sum(&values);
        }

        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::sample_dataset;

    #[test]
    fn test_timing_breakdown() {
        let timing = TimingAnalyzer.analyze(&sample_dataset()).unwrap();

        assert_eq!(timing.averages.wait, 80.0);
        assert_eq!(timing.averages.blocked, 7.5);
        assert_eq!(timing.totals.dns, 20.0);
        assert_eq!(timing.totals.receive, 17.0);
        assert_eq!(timing.medians.connect, 15.0);
    }

    #[test]
    fn test_negative_timings_are_clamped() {
        let mut row = Row::new("https://example.com/app.js");
        row.timing_dns = -1.0;
        row.timing_connect = -1.0;
        row.timing_wait = 40.0;
        let mut other = Row::new("https://example.com/lib.js");
        other.timing_dns = 10.0;
        other.timing_wait = -1.0;

        let timing = TimingAnalyzer.analyze(&Dataset::new(vec![row, other])).unwrap();

        assert_eq!(timing.totals.dns, 10.0);
        assert_eq!(timing.averages.dns, 5.0);
        assert_eq!(timing.totals.connect, 0.0);
        assert_eq!(timing.averages.wait, 20.0);
        for phase in TimingPhase::ALL {
            assert!(timing.p95.get(phase) >= 0.0);
        }
    }

    #[test]
    fn test_phase_names_match_serialized_keys() {
        let totals = serde_json::to_value(PhaseTimings::default()).unwrap();
        for phase in TimingPhase::ALL {
            assert!(totals.get(phase.as_str()).is_some(), "{}", phase.as_str());
        }
    }

    #[test]
    fn test_empty_dataset_is_all_zero() {
        let timing = TimingAnalyzer.analyze(&Dataset::default()).unwrap();
        assert_eq!(timing, TimingBreakdown::default());
    }
}
