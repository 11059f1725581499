use bedflow_domain::{MovementRecord, SimulationOutcome};

use crate::{aggregation_service::AggregationService, metrics_service::MetricsService, CoreError};

pub const MAX_INCREASE_PERCENT: u32 = 100;

pub struct SimulationService;

impl SimulationService {
    /// Estimates occupancy if discharge orders rose by `increase_percent`.
    ///
    /// Every extra discharge frees one patient-day over the period.
    pub fn discharge_increase<'a, I>(
        records: I,
        increase_percent: u32,
    ) -> Result<SimulationOutcome, CoreError>
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        if increase_percent > MAX_INCREASE_PERCENT {
            return Err(CoreError::Validation(format!(
                "discharge increase must be between 0 and {MAX_INCREASE_PERCENT}%, got {increase_percent}%"
            )));
        }

        let totals = AggregationService::totals(records);
        let current_rate = MetricsService::from_totals(&totals).occupancy_rate;
        let current = totals.discharge_orders;
        let projected = current * u64::from(100 + increase_percent) / 100;
        let extra = projected - current;

        let simulated_rate = if totals.bed_days > 0.0 {
            100.0 * (totals.patient_days - extra as f64) / totals.bed_days
        } else {
            0.0
        };

        Ok(SimulationOutcome {
            increase_percent,
            current_discharges: current,
            projected_discharges: projected,
            extra_discharges: extra,
            current_rate,
            simulated_rate,
            rate_delta: simulated_rate - current_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn records() -> Vec<MovementRecord> {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        vec![
            MovementRecord::inpatient(date, "Ward A", 450.0, 500.0).with_discharge_orders(25),
            MovementRecord::inpatient(date, "Ward B", 450.0, 500.0).with_discharge_orders(15),
        ]
    }

    #[test]
    fn ten_percent_frees_four_bed_days() {
        let outcome = SimulationService::discharge_increase(&records(), 10).expect("simulate");
        assert_eq!(outcome.current_discharges, 40);
        assert_eq!(outcome.projected_discharges, 44);
        assert_eq!(outcome.extra_discharges, 4);
        assert!((outcome.current_rate - 90.0).abs() < 1e-9);
        assert!((outcome.simulated_rate - 89.6).abs() < 1e-9);
        assert!(outcome.rate_delta < 0.0);
    }

    #[test]
    fn projected_discharges_round_down() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let records =
            vec![MovementRecord::inpatient(date, "Ward A", 90.0, 100.0).with_discharge_orders(7)];
        let outcome = SimulationService::discharge_increase(&records, 15).expect("simulate");
        assert_eq!(outcome.projected_discharges, 8);
        assert_eq!(outcome.extra_discharges, 1);
    }

    #[test]
    fn zero_increase_changes_nothing() {
        let outcome = SimulationService::discharge_increase(&records(), 0).expect("simulate");
        assert_eq!(outcome.extra_discharges, 0);
        assert_eq!(outcome.rate_delta, 0.0);
    }

    #[test]
    fn rejects_out_of_range_percentages() {
        let err = SimulationService::discharge_increase(&records(), 150).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
