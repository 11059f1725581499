//! Aggregated movement sums per day, per sector and per period.

use std::ops::AddAssign;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{common::ratio_or_zero, record::MovementRecord};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
/// Grouping applied by the period aggregator.
pub enum GroupKey {
    #[default]
    Date,
    DateSector,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Sums of movement quantities for one date (and optionally one sector).
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub sector: Option<String>,
    pub patient_days: f64,
    pub bed_days: f64,
    pub admissions: u64,
    pub discharges: u64,
}

impl DailyAggregate {
    pub fn empty(date: NaiveDate, sector: Option<String>) -> Self {
        Self {
            date,
            sector,
            patient_days: 0.0,
            bed_days: 0.0,
            admissions: 0,
            discharges: 0,
        }
    }

    pub fn add_record(&mut self, record: &MovementRecord) {
        self.patient_days += record.patient_days;
        self.bed_days += record.bed_days;
        self.admissions += u64::from(record.admissions);
        self.discharges += u64::from(record.discharges);
    }

    pub fn occupancy_rate(&self) -> f64 {
        100.0 * ratio_or_zero(self.patient_days, self.bed_days)
    }

    pub fn key(&self) -> (NaiveDate, Option<&str>) {
        (self.date, self.sector.as_deref())
    }
}

impl AddAssign<&DailyAggregate> for DailyAggregate {
    fn add_assign(&mut self, other: &DailyAggregate) {
        self.patient_days += other.patient_days;
        self.bed_days += other.bed_days;
        self.admissions += other.admissions;
        self.discharges += other.discharges;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
/// Whole-selection sums used by the metric calculator.
pub struct PeriodTotals {
    pub patient_days: f64,
    pub bed_days: f64,
    pub admissions: u64,
    pub discharges: u64,
    pub discharge_orders: u64,
    pub active_beds_sum: f64,
    pub rows: usize,
}

impl PeriodTotals {
    pub fn add_record(&mut self, record: &MovementRecord) {
        self.patient_days += record.patient_days;
        self.bed_days += record.bed_days;
        self.admissions += u64::from(record.admissions);
        self.discharges += u64::from(record.discharges);
        self.discharge_orders += u64::from(record.discharge_orders);
        self.active_beds_sum += record.active_beds;
        self.rows += 1;
    }

    /// Mean of `active_beds` across rows, `None` for an empty period.
    pub fn mean_active_beds(&self) -> Option<f64> {
        if self.rows == 0 {
            None
        } else {
            Some(self.active_beds_sum / self.rows as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

impl<'a> FromIterator<&'a MovementRecord> for PeriodTotals {
    fn from_iter<I: IntoIterator<Item = &'a MovementRecord>>(iter: I) -> Self {
        let mut totals = PeriodTotals::default();
        for record in iter {
            totals.add_record(record);
        }
        totals
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Occupancy rate observed on one date.
pub struct DailyRate {
    pub date: NaiveDate,
    pub rate: f64,
}

impl DailyRate {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}
