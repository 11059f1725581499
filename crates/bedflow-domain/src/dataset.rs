//! Immutable record collection published once per successful load.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::record::MovementRecord;

/// Validated, read-only collection of movement records.
///
/// Records are kept sorted by date (then sector) and shared behind an `Arc`,
/// so cloning a store is cheap and never copies rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Arc<[MovementRecord]>,
}

impl RecordStore {
    pub fn new(mut records: Vec<MovementRecord>) -> Self {
        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.sector.cmp(&b.sector))
                .then_with(|| a.origin.cmp(&b.origin))
        });
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn inpatient(&self) -> impl Iterator<Item = &MovementRecord> + '_ {
        self.records.iter().filter(|record| record.is_inpatient())
    }

    /// First and last record date across every origin.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        let last = self.records.last()?.date;
        Some((first, last))
    }

    /// Years with inpatient data, most recent first.
    pub fn years(&self) -> Vec<i32> {
        let years: BTreeSet<i32> = self.inpatient().map(|record| record.date.year()).collect();
        years.into_iter().rev().collect()
    }

    /// Months with inpatient data in `year`, ascending.
    pub fn months_in(&self, year: i32) -> Vec<u32> {
        let months: BTreeSet<u32> = self
            .inpatient()
            .filter(|record| record.date.year() == year)
            .map(|record| record.date.month())
            .collect();
        months.into_iter().collect()
    }

    /// Inpatient sectors reporting in `year`, sorted by name.
    pub fn sectors_in(&self, year: i32) -> Vec<String> {
        let sectors: BTreeSet<&str> = self
            .inpatient()
            .filter(|record| record.date.year() == year)
            .map(|record| record.sector.as_str())
            .collect();
        sectors.into_iter().map(str::to_string).collect()
    }

    pub fn origins(&self) -> Vec<String> {
        let origins: BTreeSet<&str> = self
            .records
            .iter()
            .map(|record| record.origin.as_str())
            .collect();
        origins.into_iter().map(str::to_string).collect()
    }
}
