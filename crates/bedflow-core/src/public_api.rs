//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Front ends (the CLI today) call these instead of reaching into individual services.

use bedflow_domain::{
    ClosingProjection, Comparison, DailyAggregate, ForecastOptions, ForecastOutcome, GroupKey,
    MonthRef, MovementRecord, PeriodMetrics, RecordStore, SectorScope, Selection,
    SimulationOutcome, TargetRange,
};
use chrono::NaiveDate;

use crate::{
    aggregation_service::AggregationService,
    compare_service::CompareService,
    forecast_service::ForecastService,
    metrics_service::MetricsService,
    report_service::{ReportOutcome, ReportService, ReportSettings},
    selection_service::SelectionService,
    simulation_service::SimulationService,
    CoreError,
};

/// Sums records per date, or per date and sector.
pub fn api_aggregate(records: &[MovementRecord], group: GroupKey) -> Vec<DailyAggregate> {
    AggregationService::aggregate(records, group)
}

/// Occupancy rate, average length of stay and bed turnover for the given rows.
pub fn api_compute_metrics(records: &[MovementRecord]) -> PeriodMetrics {
    MetricsService::compute(records)
}

/// Seven-day (or configured) trend overlay trained on the whole history in scope.
pub fn api_forecast_trend(
    store: &RecordStore,
    scope: &SectorScope,
    options: &ForecastOptions,
) -> ForecastOutcome {
    ForecastService::forecast_trend(store, scope, options)
}

/// Projected month-end occupancy; never fails, falls back to the current average.
pub fn api_forecast_closing(
    store: &RecordStore,
    scope: &SectorScope,
    month: MonthRef,
    options: &ForecastOptions,
) -> ClosingProjection {
    ForecastService::forecast_closing(store, scope, month, options)
}

/// Row count and indicators for every row dated within `[start, end]` whose origin is listed.
pub fn api_range_metrics(
    store: &RecordStore,
    start: NaiveDate,
    end: NaiveDate,
    origins: &[String],
) -> (usize, PeriodMetrics) {
    let rows = SelectionService::within_range(store, start, end, origins);
    (rows.len(), MetricsService::compute(rows))
}

pub fn api_compare(
    current: &PeriodMetrics,
    prior: &PeriodMetrics,
    targets: &TargetRange,
) -> Comparison {
    CompareService::compare(current, prior, targets)
}

pub fn api_occupancy_report(
    store: &RecordStore,
    selection: &Selection,
    today: NaiveDate,
    settings: &ReportSettings,
) -> ReportOutcome {
    ReportService::occupancy_report(store, selection, today, settings)
}

/// Occupancy estimate for the selection if discharge orders rose by `increase_percent`.
pub fn api_simulate_discharges(
    store: &RecordStore,
    selection: &Selection,
    increase_percent: u32,
) -> Result<SimulationOutcome, CoreError> {
    SimulationService::discharge_increase(
        SelectionService::current(store, selection),
        increase_percent,
    )
}
