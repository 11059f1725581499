//! Forecast requests, results, and the typed failure taxonomy.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::MonthRef;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Tuning knobs for the seasonal occupancy model.
pub struct ForecastOptions {
    /// Days projected by the trend overlay.
    pub trend_horizon_days: u32,
    pub trend_interval_width: f64,
    pub closing_interval_width: f64,
    /// Adds the yearly period once the history covers two full years.
    pub yearly_seasonality: bool,
    /// `None` enables the weekly period once two weeks of dates are observed.
    pub weekly_seasonality: Option<bool>,
    /// Minimum number of distinct observed dates required to fit.
    pub min_history_days: usize,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            trend_horizon_days: 7,
            trend_interval_width: 0.8,
            closing_interval_width: 0.8,
            yearly_seasonality: true,
            weekly_seasonality: None,
            min_history_days: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// How far past the last observation a forecast reaches.
pub enum ForecastHorizon {
    Days(u32),
    EndOfMonth(MonthRef),
}

impl ForecastHorizon {
    /// Number of days after `last_observed` covered by the horizon, never negative.
    pub fn days_after(&self, last_observed: NaiveDate) -> u32 {
        match self {
            ForecastHorizon::Days(days) => *days,
            ForecastHorizon::EndOfMonth(month) => {
                let remaining = (month.last_day() - last_observed).num_days();
                u32::try_from(remaining.max(0)).unwrap_or(u32::MAX)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Forecast points strictly after the last observed date.
pub struct ForecastSeries {
    pub last_observed: NaiveDate,
    pub interval_width: f64,
    pub points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Reasons a model fit could not produce a forecast.
pub enum ForecastFailure {
    InsufficientHistory { observed: usize, required: usize },
    ConstantSeries,
    Numerical(String),
    InvalidOptions(String),
    /// The forecasting library rejected the series.
    Model(String),
}

impl fmt::Display for ForecastFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastFailure::InsufficientHistory { observed, required } => write!(
                f,
                "insufficient history: {observed} distinct date(s), need at least {required}"
            ),
            ForecastFailure::ConstantSeries => {
                f.write_str("occupancy history is constant; nothing to model")
            }
            ForecastFailure::Numerical(reason) => write!(f, "numerical failure: {reason}"),
            ForecastFailure::InvalidOptions(reason) => {
                write!(f, "invalid forecast options: {reason}")
            }
            ForecastFailure::Model(reason) => write!(f, "forecast model error: {reason}"),
        }
    }
}

impl std::error::Error for ForecastFailure {}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Why a forecast was not attempted.
pub enum SkipReason {
    MonthClosed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Result of a trend overlay request.
pub enum ForecastOutcome {
    Available(ForecastSeries),
    Skipped(SkipReason),
    Degraded(ForecastFailure),
}

impl ForecastOutcome {
    pub fn series(&self) -> Option<&ForecastSeries> {
        match self {
            ForecastOutcome::Available(series) => Some(series),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Where a closing projection value came from.
pub enum ProjectionSource {
    Model,
    /// The target month has no days left after the last observation.
    NoRemainingDays,
    Fallback(ForecastFailure),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Projected month-end occupancy for an open month.
pub struct ClosingProjection {
    pub month: MonthRef,
    pub value: f64,
    pub source: ProjectionSource,
}

impl ClosingProjection {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ProjectionSource::Fallback(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_month_horizon_counts_remaining_days() {
        let month = MonthRef::new(2024, 2).unwrap();
        let horizon = ForecastHorizon::EndOfMonth(month);
        let last = NaiveDate::from_ymd_opt(2024, 2, 20).unwrap();
        assert_eq!(horizon.days_after(last), 9);
        let past = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        assert_eq!(horizon.days_after(past), 0);
        assert_eq!(ForecastHorizon::Days(7).days_after(last), 7);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ForecastOptions =
            serde_json::from_str(r#"{"trend_horizon_days": 14}"#).expect("parse options");
        assert_eq!(options.trend_horizon_days, 14);
        assert_eq!(options.trend_interval_width, 0.8);
        assert!(options.yearly_seasonality);
    }
}
