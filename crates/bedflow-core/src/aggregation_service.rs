//! Reduction of movement records into daily and period sums.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use bedflow_domain::{DailyAggregate, DailyRate, GroupKey, MovementRecord, PeriodTotals};

type AggregateKey = (NaiveDate, Option<String>);

pub struct AggregationService;

impl AggregationService {
    /// Sums records per group, ascending by date then sector. No filtering is applied.
    pub fn aggregate<'a, I>(records: I, group: GroupKey) -> Vec<DailyAggregate>
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        let mut groups: BTreeMap<AggregateKey, DailyAggregate> = BTreeMap::new();
        for record in records {
            let sector = match group {
                GroupKey::Date => None,
                GroupKey::DateSector => Some(record.sector.clone()),
            };
            groups
                .entry((record.date, sector.clone()))
                .or_insert_with(|| DailyAggregate::empty(record.date, sector))
                .add_record(record);
        }
        groups.into_values().collect()
    }

    pub fn totals<'a, I>(records: I) -> PeriodTotals
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        records.into_iter().collect()
    }

    /// Combines two aggregate sets built with the same group key.
    pub fn merge(left: &[DailyAggregate], right: &[DailyAggregate]) -> Vec<DailyAggregate> {
        let mut groups: BTreeMap<AggregateKey, DailyAggregate> = BTreeMap::new();
        for aggregate in left.iter().chain(right) {
            groups
                .entry((aggregate.date, aggregate.sector.clone()))
                .and_modify(|existing| *existing += aggregate)
                .or_insert_with(|| aggregate.clone());
        }
        groups.into_values().collect()
    }

    pub fn daily_rates(aggregates: &[DailyAggregate]) -> Vec<DailyRate> {
        aggregates
            .iter()
            .map(|aggregate| DailyRate::new(aggregate.date, aggregate.occupancy_rate()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn groups_by_date_and_sector() {
        let records = vec![
            MovementRecord::inpatient(date(2), "Ward B", 5.0, 6.0).with_movement(1, 2),
            MovementRecord::inpatient(date(1), "Ward A", 8.0, 10.0).with_movement(3, 1),
            MovementRecord::inpatient(date(1), "Ward B", 4.0, 5.0),
        ];

        let by_date = AggregationService::aggregate(&records, GroupKey::Date);
        assert_eq!(by_date.len(), 2);
        assert_eq!(by_date[0].date, date(1));
        assert_eq!(by_date[0].patient_days, 12.0);
        assert_eq!(by_date[0].bed_days, 15.0);
        assert_eq!(by_date[0].admissions, 3);
        assert!(by_date[0].sector.is_none());

        let by_sector = AggregationService::aggregate(&records, GroupKey::DateSector);
        assert_eq!(by_sector.len(), 3);
        assert_eq!(by_sector[0].key(), (date(1), Some("Ward A")));
        assert_eq!(by_sector[1].key(), (date(1), Some("Ward B")));
        assert_eq!(by_sector[2].discharges, 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let records: Vec<MovementRecord> = Vec::new();
        assert!(AggregationService::aggregate(&records, GroupKey::Date).is_empty());
        assert!(AggregationService::totals(&records).is_empty());
    }

    #[test]
    fn merge_matches_single_pass() {
        let records = vec![
            MovementRecord::inpatient(date(1), "Ward A", 8.0, 10.0),
            MovementRecord::inpatient(date(1), "Ward B", 4.0, 5.0),
            MovementRecord::inpatient(date(3), "Ward A", 7.0, 10.0),
        ];
        let (left, right) = records.split_at(1);
        let merged = AggregationService::merge(
            &AggregationService::aggregate(left, GroupKey::Date),
            &AggregationService::aggregate(right, GroupKey::Date),
        );
        assert_eq!(merged, AggregationService::aggregate(&records, GroupKey::Date));
    }

    #[test]
    fn zero_bed_days_rate_is_zero() {
        let records = vec![MovementRecord::inpatient(date(1), "Ward A", 3.0, 0.0)];
        let rates =
            AggregationService::daily_rates(&AggregationService::aggregate(&records, GroupKey::Date));
        assert_eq!(rates, vec![DailyRate::new(date(1), 0.0)]);
    }
}
