//! One synchronous analysis pass over a selection.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use bedflow_domain::{
    AlignedPoint, ClosingProjection, Comparison, DailyRate, ForecastOptions, ForecastOutcome,
    GroupKey, MovementBalance, RecordStore, SectorLoad, Selection, SkipReason, TargetRange,
    WeekdayStats,
};

use crate::{
    aggregation_service::AggregationService, compare_service::CompareService,
    descriptive_service::DescriptiveService, forecast_service::ForecastService,
    metrics_service::MetricsService, selection_service::SelectionService,
};

/// Thresholds and model options applied when building a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSettings {
    pub targets: TargetRange,
    pub forecast: ForecastOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyReport {
    pub selection: Selection,
    pub comparison: Comparison,
    pub days_to_close: u32,
    pub daily: Vec<DailyRate>,
    /// Prior-year daily rates moved onto the current year.
    pub prior_overlay: Vec<DailyRate>,
    pub aligned: Vec<AlignedPoint>,
    pub trend: ForecastOutcome,
    /// Present only while the selected month is open.
    pub closing: Option<ClosingProjection>,
    pub movement: Vec<MovementBalance>,
    pub sector_load: Vec<SectorLoad>,
    pub weekday_profile: Vec<WeekdayStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "report", rename_all = "snake_case")]
pub enum ReportOutcome {
    /// The selection matched no inpatient rows.
    NoData,
    Ready(Box<OccupancyReport>),
}

pub struct ReportService;

impl ReportService {
    pub fn occupancy_report(
        store: &RecordStore,
        selection: &Selection,
        today: NaiveDate,
        settings: &ReportSettings,
    ) -> ReportOutcome {
        let current = SelectionService::current(store, selection);
        if current.is_empty() {
            info!(month = %selection.month, sectors = %selection.sectors.label(), "selection is empty");
            return ReportOutcome::NoData;
        }
        let prior = SelectionService::prior_year(store, selection);

        let comparison = CompareService::compare(
            &MetricsService::compute(current.iter().copied()),
            &MetricsService::compute(prior.iter().copied()),
            &settings.targets,
        );

        let daily = AggregationService::daily_rates(&AggregationService::aggregate(
            current.iter().copied(),
            GroupKey::Date,
        ));
        let prior_daily = AggregationService::daily_rates(&AggregationService::aggregate(
            prior.iter().copied(),
            GroupKey::Date,
        ));
        let prior_overlay = CompareService::remap_to_year(&prior_daily, selection.month.year);
        let aligned = CompareService::align_prior_year(&daily, &prior_daily);

        let (trend, closing) = if selection.month.is_open(today) {
            (
                ForecastService::forecast_trend(store, &selection.sectors, &settings.forecast),
                Some(ForecastService::forecast_closing(
                    store,
                    &selection.sectors,
                    selection.month,
                    &settings.forecast,
                )),
            )
        } else {
            (ForecastOutcome::Skipped(SkipReason::MonthClosed), None)
        };

        ReportOutcome::Ready(Box::new(OccupancyReport {
            selection: selection.clone(),
            comparison,
            days_to_close: DescriptiveService::days_to_close(selection.month, today),
            daily,
            prior_overlay,
            aligned,
            trend,
            closing,
            movement: DescriptiveService::movement_balance(current.iter().copied()),
            sector_load: DescriptiveService::sector_load(current.iter().copied()),
            weekday_profile: DescriptiveService::weekday_profile(current.iter().copied()),
        }))
    }
}
