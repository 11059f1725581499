//! Descriptive and prescriptive view models.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Daily inflow versus outflow alongside the day's occupancy.
pub struct MovementBalance {
    pub date: NaiveDate,
    pub admissions: u64,
    pub discharges: u64,
    pub occupancy_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Patient-day load carried by one sector.
pub struct SectorLoad {
    pub sector: String,
    pub patient_days: f64,
    /// Fraction of the selection's patient-days, between 0 and 1.
    pub share: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Five-number summary of row patient-days for one weekday.
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Occupancy estimate after raising discharge orders by a percentage.
pub struct SimulationOutcome {
    pub increase_percent: u32,
    pub current_discharges: u64,
    pub projected_discharges: u64,
    /// Beds freed over the period, equal to the added discharges.
    pub extra_discharges: u64,
    pub current_rate: f64,
    pub simulated_rate: f64,
    pub rate_delta: f64,
}
