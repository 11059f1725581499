//! Period indicators, deltas against the prior year, and target bands.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
/// Occupancy indicators for one filter selection.
pub struct PeriodMetrics {
    /// Percent of staffed bed-days occupied by patients.
    pub occupancy_rate: f64,
    /// Patient-days per discharge.
    pub average_length_of_stay: f64,
    /// Discharges per average operational bed.
    pub bed_turnover: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
/// Signed differences `current - prior` for each indicator.
pub struct MetricDeltas {
    pub occupancy_rate: f64,
    pub average_length_of_stay: f64,
    pub bed_turnover: f64,
}

impl MetricDeltas {
    pub fn between(current: &PeriodMetrics, prior: &PeriodMetrics) -> Self {
        Self {
            occupancy_rate: current.occupancy_rate - prior.occupancy_rate,
            average_length_of_stay: current.average_length_of_stay
                - prior.average_length_of_stay,
            bed_turnover: current.bed_turnover - prior.bed_turnover,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Safe operating interval for occupancy, inclusive on both ends.
pub struct TargetRange {
    pub lower: f64,
    pub upper: f64,
}

impl Default for TargetRange {
    fn default() -> Self {
        Self {
            lower: 85.0,
            upper: 98.0,
        }
    }
}

impl TargetRange {
    pub fn classify(&self, occupancy_rate: f64) -> TargetBand {
        if occupancy_rate > self.upper {
            TargetBand::Above
        } else if occupancy_rate >= self.lower {
            TargetBand::OnTarget
        } else {
            TargetBand::Below
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Status of the current occupancy against the target range.
pub enum TargetBand {
    Below,
    OnTarget,
    Above,
}

impl fmt::Display for TargetBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TargetBand::Below => "Below target",
            TargetBand::OnTarget => "On target",
            TargetBand::Above => "Above target",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Current period metrics set against the same month of the prior year.
pub struct Comparison {
    pub current: PeriodMetrics,
    pub prior: PeriodMetrics,
    pub deltas: MetricDeltas,
    pub band: TargetBand,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A current-year day paired with the same day of the prior year.
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub current: f64,
    pub prior: f64,
}
