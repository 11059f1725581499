//! Current versus prior-year comparison and day alignment of the daily series.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use bedflow_domain::{AlignedPoint, Comparison, DailyRate, MetricDeltas, PeriodMetrics, TargetRange};

pub struct CompareService;

impl CompareService {
    pub fn compare(
        current: &PeriodMetrics,
        prior: &PeriodMetrics,
        targets: &TargetRange,
    ) -> Comparison {
        Comparison {
            current: *current,
            prior: *prior,
            deltas: MetricDeltas::between(current, prior),
            band: targets.classify(current.occupancy_rate),
        }
    }

    /// Moves each point to the same month and day of `year`, dropping days that do not exist there.
    pub fn remap_to_year(series: &[DailyRate], year: i32) -> Vec<DailyRate> {
        series
            .iter()
            .filter_map(|point| {
                point
                    .date
                    .with_year(year)
                    .map(|date| DailyRate::new(date, point.rate))
            })
            .collect()
    }

    /// Pairs current days with the prior-year value of the same month and day.
    ///
    /// The target year is taken from the first current point; days missing on either side are dropped.
    pub fn align_prior_year(current: &[DailyRate], prior: &[DailyRate]) -> Vec<AlignedPoint> {
        let Some(year) = current.first().map(|point| point.date.year()) else {
            return Vec::new();
        };
        let prior_by_date: BTreeMap<NaiveDate, f64> = Self::remap_to_year(prior, year)
            .into_iter()
            .map(|point| (point.date, point.rate))
            .collect();

        let mut aligned: Vec<AlignedPoint> = current
            .iter()
            .filter_map(|point| {
                prior_by_date.get(&point.date).map(|prior| AlignedPoint {
                    date: point.date,
                    current: point.rate,
                    prior: *prior,
                })
            })
            .collect();
        aligned.sort_by_key(|point| point.date);
        aligned.dedup_by_key(|point| point.date);
        aligned
    }
}
