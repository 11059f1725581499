use std::{
    collections::HashMap,
    io::Read,
    path::Path,
};

use bedflow_domain::RecordStore;
use chrono::NaiveDate;

use crate::CoreError;

/// Abstraction over table readers capable of producing a validated record store.
///
/// Implementations must either return a complete store or an error; a failed
/// read never yields partially populated records.
pub trait DatasetReader: Send + Sync {
    fn read_path(&self, path: &Path) -> Result<RecordStore, CoreError>;
    fn read_from(&self, source: &mut dyn Read) -> Result<RecordStore, CoreError>;
}

/// Detects duplicated keys and inconsistent quantities within a record store.
pub fn dataset_warnings(store: &RecordStore) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen: HashMap<(NaiveDate, &str, &str), usize> = HashMap::new();

    for record in store.records() {
        *seen
            .entry((record.date, record.sector.as_str(), record.origin.as_str()))
            .or_default() += 1;
        if record.bed_days <= 0.0 && record.patient_days > 0.0 {
            warnings.push(format!(
                "{} {}: {} patient-days recorded with no bed-days",
                record.date, record.sector, record.patient_days
            ));
        }
    }

    let mut duplicates: Vec<_> = seen.into_iter().filter(|(_, count)| *count > 1).collect();
    duplicates.sort();
    for ((date, sector, origin), count) in duplicates {
        warnings.push(format!(
            "{date} {sector} ({origin}) appears {count} times; rows are summed and turnover averages beds per row"
        ));
    }

    if !store.is_empty() && store.inpatient().next().is_none() {
        warnings.push("no inpatient rows found; occupancy views will be empty".to_string());
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedflow_domain::MovementRecord;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn clean_store_has_no_warnings() {
        let store = RecordStore::new(vec![
            MovementRecord::inpatient(date(1), "Ward A", 9.0, 10.0),
            MovementRecord::inpatient(date(2), "Ward A", 9.0, 10.0),
        ]);
        assert!(dataset_warnings(&store).is_empty());
    }

    #[test]
    fn flags_duplicates_and_missing_beds() {
        let store = RecordStore::new(vec![
            MovementRecord::inpatient(date(1), "Ward A", 9.0, 10.0),
            MovementRecord::inpatient(date(1), "Ward A", 3.0, 0.0),
        ]);
        let warnings = dataset_warnings(&store);
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("appears 2 times")));
        assert!(warnings.iter().any(|w| w.contains("no bed-days")));
    }

    #[test]
    fn flags_missing_inpatient_rows() {
        let store = RecordStore::new(vec![
            MovementRecord::inpatient(date(1), "ER", 2.0, 4.0).with_origin("Pronto Socorro")
        ]);
        let warnings = dataset_warnings(&store);
        assert_eq!(warnings, vec!["no inpatient rows found; occupancy views will be empty"]);
    }
}
