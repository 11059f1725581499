//! Daily occupancy model built on augurs.
//!
//! Histories with at least two weeks of observed dates are decomposed with MSTL
//! (weekly period, plus the yearly period once two full years are covered) and the
//! deseasonalised remainder is forecast with AutoETS. Shorter histories use plain
//! non-seasonal AutoETS. Calendar gaps between observations are filled by linear
//! interpolation before fitting.

use std::collections::BTreeMap;

use augurs::{
    ets::AutoETS,
    forecaster::{transforms::LinearInterpolator, Forecaster, Transformer},
    mstl::MSTLModel,
    Forecast,
};
use chrono::{Duration, NaiveDate};
use tracing::debug;

use bedflow_domain::{DailyRate, ForecastFailure, ForecastHorizon, ForecastOptions, ForecastPoint};

/// Observed dates needed before the weekly period is modelled.
const MIN_SEASONAL_OBSERVATIONS: usize = 14;
const WEEKLY_PERIOD: usize = 7;
const YEARLY_PERIOD: usize = 365;
const VARIANCE_EPSILON: f64 = 1e-12;

/// Fitted values and predictions from one model fit.
#[derive(Debug, Clone)]
pub(crate) struct ModelRun {
    pub(crate) last_observed: NaiveDate,
    /// Fitted values on the observed dates, unclamped.
    pub(crate) in_sample: Vec<DailyRate>,
    /// Predictions for each day after the last observation, clamped at zero.
    pub(crate) ahead: Vec<ForecastPoint>,
}

impl ModelRun {
    /// Fits `series` and projects it over `horizon` with intervals at `level`.
    /// Repeated dates keep the last value.
    pub(crate) fn fit(
        series: &[DailyRate],
        horizon: ForecastHorizon,
        level: f64,
        options: &ForecastOptions,
    ) -> Result<Self, ForecastFailure> {
        let observed: BTreeMap<NaiveDate, f64> =
            series.iter().map(|point| (point.date, point.rate)).collect();
        if observed.values().any(|value| !value.is_finite()) {
            return Err(ForecastFailure::Numerical(
                "non-finite value in training series".into(),
            ));
        }

        let required = options.min_history_days.max(2);
        if observed.len() < required {
            return Err(ForecastFailure::InsufficientHistory {
                observed: observed.len(),
                required,
            });
        }

        let n = observed.len() as f64;
        let mean = observed.values().sum::<f64>() / n;
        let variance = observed
            .values()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / n;
        if variance < VARIANCE_EPSILON {
            return Err(ForecastFailure::ConstantSeries);
        }

        let (first, last_observed, values) = calendar_values(&observed)?;
        let periods = seasonal_periods(observed.len(), values.len(), options);
        let days_ahead = horizon.days_after(last_observed) as usize;

        let (fitted, ahead) = if periods.is_empty() {
            forecast_with_ets(&values, days_ahead, level)?
        } else {
            forecast_with_mstl(&values, periods.clone(), days_ahead, level)?
        };

        if fitted.point.len() < values.len() {
            return Err(ForecastFailure::Model(format!(
                "expected {} fitted values, got {}",
                values.len(),
                fitted.point.len()
            )));
        }
        let in_sample: Vec<DailyRate> = fitted
            .point
            .iter()
            .enumerate()
            .map(|(offset, value)| (first + Duration::days(offset as i64), *value))
            .filter(|(date, _)| observed.contains_key(date))
            .map(|(date, value)| DailyRate::new(date, value))
            .collect();
        let points = future_points(&ahead, last_observed, days_ahead)?;

        if in_sample.iter().any(|point| !point.rate.is_finite()) {
            return Err(ForecastFailure::Numerical("non-finite fitted value".into()));
        }

        debug!(
            observations = observed.len(),
            calendar_days = values.len(),
            ?periods,
            days_ahead,
            "fitted occupancy model"
        );
        Ok(Self {
            last_observed,
            in_sample,
            ahead: points,
        })
    }
}

/// Seasonal periods to decompose for a history of `observed` dates spanning `calendar_days`.
pub(crate) fn seasonal_periods(
    observed: usize,
    calendar_days: usize,
    options: &ForecastOptions,
) -> Vec<usize> {
    let mut periods = Vec::new();
    if options
        .weekly_seasonality
        .unwrap_or(observed >= MIN_SEASONAL_OBSERVATIONS)
        && calendar_days >= 2 * WEEKLY_PERIOD
    {
        periods.push(WEEKLY_PERIOD);
    }
    if options.yearly_seasonality
        && observed >= MIN_SEASONAL_OBSERVATIONS
        && calendar_days > 2 * YEARLY_PERIOD
    {
        periods.push(YEARLY_PERIOD);
    }
    periods
}

/// One value per calendar day from the first to the last observation, `NaN` where unobserved.
fn calendar_values(
    observed: &BTreeMap<NaiveDate, f64>,
) -> Result<(NaiveDate, NaiveDate, Vec<f64>), ForecastFailure> {
    let (Some((&first, _)), Some((&last, _))) =
        (observed.first_key_value(), observed.last_key_value())
    else {
        return Err(ForecastFailure::InsufficientHistory {
            observed: 0,
            required: 2,
        });
    };
    let values = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| observed.get(&date).copied().unwrap_or(f64::NAN))
        .collect();
    Ok((first, last, values))
}

fn future_points(
    forecast: &Forecast,
    last_observed: NaiveDate,
    days_ahead: usize,
) -> Result<Vec<ForecastPoint>, ForecastFailure> {
    if forecast.point.len() < days_ahead {
        return Err(ForecastFailure::Model(format!(
            "expected {days_ahead} predictions, got {}",
            forecast.point.len()
        )));
    }
    let mut points = Vec::with_capacity(days_ahead);
    for (index, predicted) in forecast.point.iter().take(days_ahead).enumerate() {
        let (lower, upper) = match &forecast.intervals {
            Some(intervals) => (
                intervals.lower.get(index).copied().unwrap_or(*predicted),
                intervals.upper.get(index).copied().unwrap_or(*predicted),
            ),
            None => (*predicted, *predicted),
        };
        if ![*predicted, lower, upper].iter().all(|value| value.is_finite()) {
            return Err(ForecastFailure::Numerical("non-finite prediction".into()));
        }
        points.push(ForecastPoint {
            date: last_observed + Duration::days(index as i64 + 1),
            predicted: predicted.max(0.0),
            lower: lower.min(*predicted).max(0.0),
            upper: upper.max(*predicted).max(0.0),
        });
    }
    Ok(points)
}

fn no_forecast() -> Forecast {
    Forecast {
        point: Vec::new(),
        intervals: None,
    }
}

fn interpolation() -> Vec<Box<dyn Transformer>> {
    vec![Box::new(LinearInterpolator::default())]
}

/// MSTL over `periods` with an AutoETS trend; returns in-sample and ahead forecasts.
fn forecast_with_mstl(
    values: &[f64],
    periods: Vec<usize>,
    horizon: usize,
    level: f64,
) -> Result<(Forecast, Forecast), ForecastFailure> {
    let trend = AutoETS::non_seasonal().into_trend_model();
    let mut forecaster =
        Forecaster::new(MSTLModel::new(periods, trend)).with_transformers(interpolation());

    forecaster
        .fit(values)
        .map_err(|e| ForecastFailure::Model(format!("MSTL fit error: {e}")))?;
    let fitted = forecaster
        .predict_in_sample(level)
        .map_err(|e| ForecastFailure::Model(format!("MSTL in-sample error: {e}")))?;
    let ahead = if horizon == 0 {
        no_forecast()
    } else {
        forecaster
            .predict(horizon, level)
            .map_err(|e| ForecastFailure::Model(format!("MSTL predict error: {e}")))?
    };
    Ok((fitted, ahead))
}

/// Non-seasonal AutoETS; returns in-sample and ahead forecasts.
fn forecast_with_ets(
    values: &[f64],
    horizon: usize,
    level: f64,
) -> Result<(Forecast, Forecast), ForecastFailure> {
    let mut forecaster = Forecaster::new(AutoETS::non_seasonal()).with_transformers(interpolation());

    forecaster
        .fit(values)
        .map_err(|e| ForecastFailure::Model(format!("ETS fit error: {e}")))?;
    let fitted = forecaster
        .predict_in_sample(level)
        .map_err(|e| ForecastFailure::Model(format!("ETS in-sample error: {e}")))?;
    let ahead = if horizon == 0 {
        no_forecast()
    } else {
        forecaster
            .predict(horizon, level)
            .map_err(|e| ForecastFailure::Model(format!("ETS predict error: {e}")))?
    };
    Ok((fitted, ahead))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(days: i64, value: impl Fn(i64) -> f64) -> Vec<DailyRate> {
        (0..days)
            .map(|d| DailyRate::new(date(2024, 1, 1) + Duration::days(d), value(d)))
            .collect()
    }

    #[test]
    fn weekly_period_needs_two_weeks_of_observations() {
        let options = ForecastOptions::default();
        assert!(seasonal_periods(3, 41, &options).is_empty());
        assert!(seasonal_periods(13, 400, &options).is_empty());
        assert_eq!(seasonal_periods(14, 14, &options), vec![WEEKLY_PERIOD]);
        assert_eq!(
            seasonal_periods(800, 800, &options),
            vec![WEEKLY_PERIOD, YEARLY_PERIOD]
        );
    }

    #[test]
    fn explicit_weekly_switch_wins() {
        let forced_off = ForecastOptions {
            weekly_seasonality: Some(false),
            yearly_seasonality: false,
            ..ForecastOptions::default()
        };
        assert!(seasonal_periods(60, 60, &forced_off).is_empty());

        let forced_on = ForecastOptions {
            weekly_seasonality: Some(true),
            ..ForecastOptions::default()
        };
        assert_eq!(seasonal_periods(5, 20, &forced_on), vec![WEEKLY_PERIOD]);
        assert!(seasonal_periods(5, 10, &forced_on).is_empty());
    }

    #[test]
    fn gaps_are_left_for_interpolation() {
        let observed: BTreeMap<NaiveDate, f64> =
            [(date(2024, 1, 1), 80.0), (date(2024, 1, 4), 90.0)].into();
        let (first, last, values) = calendar_values(&observed).unwrap();
        assert_eq!((first, last), (date(2024, 1, 1), date(2024, 1, 4)));
        assert_eq!(values.len(), 4);
        assert!(values[1].is_nan() && values[2].is_nan());
        assert_eq!(values[3], 90.0);
    }

    #[test]
    fn rejects_short_and_flat_series() {
        let options = ForecastOptions::default();
        assert_eq!(
            ModelRun::fit(&series(1, |_| 80.0), ForecastHorizon::Days(7), 0.8, &options)
                .unwrap_err(),
            ForecastFailure::InsufficientHistory {
                observed: 1,
                required: 2
            }
        );
        assert_eq!(
            ModelRun::fit(&series(20, |_| 80.0), ForecastHorizon::Days(7), 0.8, &options)
                .unwrap_err(),
            ForecastFailure::ConstantSeries
        );
    }

    #[test]
    fn weekly_history_projects_the_horizon() {
        let data = series(42, |d| 80.0 + if d % 7 < 5 { 4.0 } else { -6.0 } + 0.05 * d as f64);
        let run = ModelRun::fit(&data, ForecastHorizon::Days(7), 0.8, &ForecastOptions::default())
            .expect("fit");
        assert_eq!(run.last_observed, date(2024, 2, 11));
        assert_eq!(run.in_sample.len(), 42);
        assert_eq!(run.ahead.len(), 7);
        assert_eq!(run.ahead[0].date, date(2024, 2, 12));
        assert!(run
            .ahead
            .iter()
            .all(|point| point.lower <= point.predicted && point.predicted <= point.upper));
    }

    #[test]
    fn sparse_history_stays_near_observed_range() {
        let data = vec![
            DailyRate::new(date(2024, 1, 1), 80.0),
            DailyRate::new(date(2024, 1, 20), 90.0),
            DailyRate::new(date(2024, 2, 10), 85.0),
        ];
        let run = ModelRun::fit(&data, ForecastHorizon::Days(7), 0.8, &ForecastOptions::default())
            .expect("fit");
        assert_eq!(run.in_sample.len(), 3);
        assert!(run
            .ahead
            .iter()
            .all(|point| (75.0..=95.0).contains(&point.predicted)));
    }
}
