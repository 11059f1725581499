use bedflow_core::{AggregationService, CompareService, MetricsService};
use bedflow_domain::{GroupKey, MetricDeltas, MovementRecord, PeriodMetrics, TargetRange};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = MovementRecord> {
    (
        0i64..20,
        prop::sample::select(vec!["Ward A", "Ward B", "ICU"]),
        0u32..40,
        0u32..40,
        0u32..400,
        0u32..400,
    )
        .prop_map(|(offset, sector, admissions, discharges, patient_days, bed_days)| {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset);
            MovementRecord::inpatient(date, sector, f64::from(patient_days), f64::from(bed_days))
                .with_movement(admissions, discharges)
        })
}

proptest! {
    #[test]
    fn aggregation_is_associative_over_partitions(
        records in prop::collection::vec(record_strategy(), 0..60),
        split in 0usize..60,
    ) {
        let split = split.min(records.len());
        let (left, right) = records.split_at(split);
        for group in [GroupKey::Date, GroupKey::DateSector] {
            let whole = AggregationService::aggregate(&records, group);
            let merged = AggregationService::merge(
                &AggregationService::aggregate(left, group),
                &AggregationService::aggregate(right, group),
            );
            prop_assert_eq!(whole, merged);
        }
    }

    #[test]
    fn comparing_metrics_with_themselves_yields_zero(
        occupancy in 0.0f64..150.0,
        stay in 0.0f64..30.0,
        turnover in 0.0f64..20.0,
    ) {
        let metrics = PeriodMetrics {
            occupancy_rate: occupancy,
            average_length_of_stay: stay,
            bed_turnover: turnover,
        };
        let comparison = CompareService::compare(&metrics, &metrics, &TargetRange::default());
        prop_assert_eq!(comparison.deltas, MetricDeltas::default());
    }

    #[test]
    fn rows_without_bed_days_have_zero_occupancy(
        records in prop::collection::vec(record_strategy(), 1..30),
    ) {
        let records: Vec<_> = records
            .into_iter()
            .map(|mut record| {
                record.bed_days = 0.0;
                record
            })
            .collect();
        prop_assert_eq!(MetricsService::compute(&records).occupancy_rate, 0.0);
        for rate in AggregationService::daily_rates(&AggregationService::aggregate(&records, GroupKey::Date)) {
            prop_assert_eq!(rate.rate, 0.0);
        }
    }
}
