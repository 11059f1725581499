//! Movement records as read from the sector movement table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::ratio_or_zero;

/// Origin label of rows that feed inpatient occupancy analysis.
pub const INPATIENT_ORIGIN: &str = "Internação";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One row of daily bed movement for a sector and origin category.
pub struct MovementRecord {
    pub date: NaiveDate,
    pub sector: String,
    pub origin: String,
    pub admissions: u32,
    pub discharges: u32,
    /// Discharges by medical release, a subtype of `discharges`.
    pub discharge_orders: u32,
    pub patient_days: f64,
    pub bed_days: f64,
    pub active_beds: f64,
}

impl MovementRecord {
    /// Builds an inpatient row with zero movement counts.
    pub fn inpatient(
        date: NaiveDate,
        sector: impl Into<String>,
        patient_days: f64,
        bed_days: f64,
    ) -> Self {
        Self {
            date,
            sector: sector.into(),
            origin: INPATIENT_ORIGIN.to_string(),
            admissions: 0,
            discharges: 0,
            discharge_orders: 0,
            patient_days,
            bed_days,
            active_beds: 0.0,
        }
    }

    pub fn with_movement(mut self, admissions: u32, discharges: u32) -> Self {
        self.admissions = admissions;
        self.discharges = discharges;
        self
    }

    pub fn with_discharge_orders(mut self, discharge_orders: u32) -> Self {
        self.discharge_orders = discharge_orders;
        self
    }

    pub fn with_active_beds(mut self, active_beds: f64) -> Self {
        self.active_beds = active_beds;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn is_inpatient(&self) -> bool {
        self.origin == INPATIENT_ORIGIN
    }

    /// Occupancy of this row in percent, 0 when no bed-days were staffed.
    pub fn occupancy_rate(&self) -> f64 {
        100.0 * ratio_or_zero(self.patient_days, self.bed_days)
    }
}
