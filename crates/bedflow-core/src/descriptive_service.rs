//! Descriptive views over the current selection.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use bedflow_domain::{
    ratio_or_zero, GroupKey, MonthRef, MovementBalance, MovementRecord, SectorLoad, WeekdayStats,
};

use crate::aggregation_service::AggregationService;

pub struct DescriptiveService;

impl DescriptiveService {
    /// Admissions, discharges and occupancy per date.
    pub fn movement_balance<'a, I>(records: I) -> Vec<MovementBalance>
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        AggregationService::aggregate(records, GroupKey::Date)
            .into_iter()
            .map(|daily| MovementBalance {
                date: daily.date,
                admissions: daily.admissions,
                discharges: daily.discharges,
                occupancy_rate: daily.occupancy_rate(),
            })
            .collect()
    }

    /// Patient-days per sector with each sector's share of the total, largest first.
    pub fn sector_load<'a, I>(records: I) -> Vec<SectorLoad>
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        let mut per_sector: BTreeMap<&str, f64> = BTreeMap::new();
        for record in records {
            *per_sector.entry(record.sector.as_str()).or_default() += record.patient_days;
        }
        let total: f64 = per_sector.values().sum();

        let mut loads: Vec<SectorLoad> = per_sector
            .into_iter()
            .map(|(sector, patient_days)| SectorLoad {
                sector: sector.to_string(),
                patient_days,
                share: ratio_or_zero(patient_days, total),
            })
            .collect();
        loads.sort_by(|a, b| {
            b.patient_days
                .total_cmp(&a.patient_days)
                .then_with(|| a.sector.cmp(&b.sector))
        });
        loads
    }

    /// Spread of row patient-days per weekday, Monday first; weekdays without rows are omitted.
    pub fn weekday_profile<'a, I>(records: I) -> Vec<WeekdayStats>
    where
        I: IntoIterator<Item = &'a MovementRecord>,
    {
        let mut buckets: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for record in records {
            buckets
                .entry(record.date.weekday().num_days_from_monday())
                .or_default()
                .push(record.patient_days);
        }

        buckets
            .into_iter()
            .map(|(index, mut values)| {
                values.sort_by(f64::total_cmp);
                let count = values.len();
                WeekdayStats {
                    weekday: weekday_from_index(index),
                    count,
                    min: values[0],
                    q1: quantile(&values, 0.25),
                    median: quantile(&values, 0.5),
                    q3: quantile(&values, 0.75),
                    max: values[count - 1],
                    mean: values.iter().sum::<f64>() / count as f64,
                }
            })
            .collect()
    }

    /// Calendar days left until the month closes, 0 once it is no longer open.
    pub fn days_to_close(month: MonthRef, today: NaiveDate) -> u32 {
        if !month.is_open(today) {
            return 0;
        }
        u32::try_from((month.last_day() - today).num_days().max(0)).unwrap_or(0)
    }
}

/// Linear interpolation between closest ranks over sorted, non-empty values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn weekday_from_index(index: u32) -> Weekday {
    match index {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}
