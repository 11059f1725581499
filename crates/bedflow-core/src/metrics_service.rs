use bedflow_domain::{ratio_or_zero, MovementRecord, PeriodMetrics, PeriodTotals};

use crate::aggregation_service::AggregationService;

pub struct MetricsService;

impl MetricsService {
    /// Occupancy rate, length of stay and turnover for a set of records.
    pub fn compute<'a, I>(records: I) -> PeriodMetrics
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        Self::from_totals(&AggregationService::totals(records))
    }

    pub fn from_totals(totals: &PeriodTotals) -> PeriodMetrics {
        let discharges = totals.discharges as f64;
        PeriodMetrics {
            occupancy_rate: 100.0 * ratio_or_zero(totals.patient_days, totals.bed_days),
            average_length_of_stay: ratio_or_zero(totals.patient_days, discharges),
            bed_turnover: ratio_or_zero(discharges, totals.mean_active_beds().unwrap_or(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn steady_month_matches_formulae() {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let records: Vec<_> = (0..30)
            .map(|offset| {
                MovementRecord::inpatient(start + Duration::days(offset), "Ward A", 95.0, 100.0)
                    .with_movement(2, 3)
                    .with_active_beds(100.0)
            })
            .collect();

        let metrics = MetricsService::compute(&records);
        assert!((metrics.occupancy_rate - 95.0).abs() < 1e-9);
        assert!((metrics.average_length_of_stay - 2850.0 / 90.0).abs() < 1e-9);
        assert!((metrics.bed_turnover - 0.9).abs() < 1e-9);
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let records: Vec<MovementRecord> = Vec::new();
        assert_eq!(MetricsService::compute(&records), PeriodMetrics::default());
    }

    #[test]
    fn zero_denominators_yield_zero() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let records = vec![MovementRecord::inpatient(date, "Ward A", 12.0, 0.0)];
        let metrics = MetricsService::compute(&records);
        assert_eq!(metrics.occupancy_rate, 0.0);
        assert_eq!(metrics.average_length_of_stay, 0.0);
        assert_eq!(metrics.bed_turnover, 0.0);
    }
}
