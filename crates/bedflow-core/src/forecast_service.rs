//! Occupancy forecasts: the short trend overlay and the month-end closing projection.
//!
//! Fitting never propagates a failure to callers of [`ForecastService::forecast_trend`] or
//! [`ForecastService::forecast_closing`]; failures are logged and surfaced as values.

use tracing::{debug, warn};

use bedflow_domain::{
    ClosingProjection, DailyRate, ForecastFailure, ForecastHorizon, ForecastOptions,
    ForecastOutcome, ForecastSeries, GroupKey, MonthRef, ProjectionSource, RecordStore,
    SectorScope,
};

use crate::{
    aggregation_service::AggregationService,
    forecast_model::ModelRun,
    metrics_service::MetricsService,
    selection_service::SelectionService,
};

pub struct ForecastService;

impl ForecastService {
    /// Daily occupancy over the whole inpatient history in scope.
    ///
    /// Dates whose bed-days sum to zero carry no rate and are left out.
    pub fn training_series(store: &RecordStore, scope: &SectorScope) -> Vec<DailyRate> {
        let history = SelectionService::history(store, scope);
        let daily = AggregationService::aggregate(history, GroupKey::Date);
        let usable: Vec<_> = daily
            .into_iter()
            .filter(|aggregate| aggregate.bed_days > 0.0)
            .collect();
        AggregationService::daily_rates(&usable)
    }

    /// Fits the series and projects it over `horizon`, returning only dates after the last observation.
    pub fn forecast(
        series: &[DailyRate],
        horizon: ForecastHorizon,
        options: &ForecastOptions,
    ) -> Result<ForecastSeries, ForecastFailure> {
        let width = match horizon {
            ForecastHorizon::Days(_) => options.trend_interval_width,
            ForecastHorizon::EndOfMonth(_) => options.closing_interval_width,
        };
        let run = Self::fit(series, horizon, width, options)?;
        Ok(ForecastSeries {
            last_observed: run.last_observed,
            interval_width: width,
            points: run.ahead,
        })
    }

    /// Trend overlay for the configured number of days after the last observation.
    pub fn forecast_trend(
        store: &RecordStore,
        scope: &SectorScope,
        options: &ForecastOptions,
    ) -> ForecastOutcome {
        let series = Self::training_series(store, scope);
        match Self::forecast(
            &series,
            ForecastHorizon::Days(options.trend_horizon_days),
            options,
        ) {
            Ok(forecast) => ForecastOutcome::Available(forecast),
            Err(failure) => {
                warn!(scope = %scope.label(), %failure, "trend forecast unavailable");
                ForecastOutcome::Degraded(failure)
            }
        }
    }

    /// Mean projected occupancy of `month`, mixing fitted observed days and predicted remaining days.
    pub fn forecast_closing(
        store: &RecordStore,
        scope: &SectorScope,
        month: MonthRef,
        options: &ForecastOptions,
    ) -> ClosingProjection {
        let current_average = MetricsService::compute(
            store
                .inpatient()
                .filter(|record| month.contains(record.date) && scope.includes(&record.sector)),
        )
        .occupancy_rate;

        let series = Self::training_series(store, scope);
        if let Some(last) = series.last().map(|point| point.date) {
            if ForecastHorizon::EndOfMonth(month).days_after(last) == 0 {
                return ClosingProjection {
                    month,
                    value: current_average,
                    source: ProjectionSource::NoRemainingDays,
                };
            }
        }

        match Self::closing_mean(&series, month, options) {
            Ok(value) => ClosingProjection {
                month,
                value,
                source: ProjectionSource::Model,
            },
            Err(failure) => {
                warn!(
                    scope = %scope.label(),
                    %month,
                    %failure,
                    fallback = current_average,
                    "closing projection fell back to the current average"
                );
                ClosingProjection {
                    month,
                    value: current_average,
                    source: ProjectionSource::Fallback(failure),
                }
            }
        }
    }

    fn closing_mean(
        series: &[DailyRate],
        month: MonthRef,
        options: &ForecastOptions,
    ) -> Result<f64, ForecastFailure> {
        let run = Self::fit(
            series,
            ForecastHorizon::EndOfMonth(month),
            options.closing_interval_width,
            options,
        )?;

        let fitted = run
            .in_sample
            .iter()
            .filter(|point| month.contains(point.date))
            .map(|point| point.rate.max(0.0));
        let remaining = run
            .ahead
            .iter()
            .filter(|point| month.contains(point.date))
            .map(|point| point.predicted);

        let values: Vec<f64> = fitted.chain(remaining).collect();
        if values.is_empty() {
            return Err(ForecastFailure::Numerical(format!(
                "no fitted or predicted days fall in {month}"
            )));
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        debug!(%month, days = values.len(), mean, "closing projection computed");
        Ok(mean)
    }

    fn fit(
        series: &[DailyRate],
        horizon: ForecastHorizon,
        width: f64,
        options: &ForecastOptions,
    ) -> Result<ModelRun, ForecastFailure> {
        if !(width > 0.0 && width < 1.0) {
            return Err(ForecastFailure::InvalidOptions(format!(
                "interval width {width} must lie strictly between 0 and 1"
            )));
        }
        ModelRun::fit(series, horizon, width, options)
    }
}
