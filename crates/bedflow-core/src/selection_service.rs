//! Filters over the record store that feed each analysis step.

use chrono::NaiveDate;

use bedflow_domain::{MovementRecord, RecordStore, SectorScope, Selection};

pub struct SelectionService;

impl SelectionService {
    /// Inpatient rows of the selected month and sectors.
    pub fn current<'a>(store: &'a RecordStore, selection: &Selection) -> Vec<&'a MovementRecord> {
        store
            .records()
            .iter()
            .filter(|record| selection.matches(record))
            .collect()
    }

    /// Inpatient rows of the same month one year earlier, same sectors.
    pub fn prior_year<'a>(
        store: &'a RecordStore,
        selection: &Selection,
    ) -> Vec<&'a MovementRecord> {
        Self::current(store, &selection.prior_year())
    }

    /// Every inpatient row in scope, regardless of date.
    pub fn history<'a>(store: &'a RecordStore, scope: &SectorScope) -> Vec<&'a MovementRecord> {
        store
            .inpatient()
            .filter(|record| scope.includes(&record.sector))
            .collect()
    }

    /// Rows dated within `[start, end]` whose origin is listed; an empty list keeps every origin.
    pub fn within_range<'a>(
        store: &'a RecordStore,
        start: NaiveDate,
        end: NaiveDate,
        origins: &[String],
    ) -> Vec<&'a MovementRecord> {
        store
            .records()
            .iter()
            .filter(|record| record.date >= start && record.date <= end)
            .filter(|record| origins.is_empty() || origins.iter().any(|o| *o == record.origin))
            .collect()
    }
}
