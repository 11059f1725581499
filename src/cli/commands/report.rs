use std::collections::HashMap;

use bedflow_core::public_api::{api_forecast_closing, api_forecast_trend, api_occupancy_report};
use bedflow_core::report_service::{OccupancyReport, ReportOutcome};
use bedflow_domain::{
    ClosingProjection, ForecastOutcome, ForecastSeries, ProjectionSource, SkipReason,
};
use chrono::NaiveDate;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

use super::{parse_month, percent, selection_for, signed, take_flag};

const REPORT_USAGE: &str = "report <year> <month> [sector...] [--json]";
const TREND_USAGE: &str = "trend <year> <month> [sector...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "report",
            "Occupancy scorecard, prior-year comparison and forecasts",
            REPORT_USAGE,
            cmd_report,
        ),
        CommandEntry::new(
            "trend",
            "Trend overlay and closing projection for an open month",
            TREND_USAGE,
            cmd_trend,
        ),
    ]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (as_json, args) = take_flag(args, "--json");
    let (month, sectors) = parse_month(&args, REPORT_USAGE)?;
    let store = context.store()?;
    let selection = selection_for(&store, month, sectors);

    let outcome = api_occupancy_report(&store, &selection, context.today(), &context.settings());

    if as_json {
        output::line(serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        ReportOutcome::NoData => {
            output::warning(format!(
                "No inpatient rows for {} ({}).",
                selection.month,
                selection.sectors.label()
            ));
            output::hint("Use `filters <year>` to see the months and sectors with data.");
        }
        ReportOutcome::Ready(report) => render_report(context, &report),
    }
    Ok(())
}

fn cmd_trend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (month, sectors) = parse_month(args, TREND_USAGE)?;
    let store = context.store()?;
    let selection = selection_for(&store, month, sectors);

    if !month.is_open(context.today()) {
        output::info(format!(
            "{month} is closed; forecasts run only for the current month."
        ));
        return Ok(());
    }

    let options = &context.config.forecast;
    let trend = api_forecast_trend(&store, &selection.sectors, options);
    let closing = api_forecast_closing(&store, &selection.sectors, month, options);

    output::section(format!("Forecast {} - {}", month, selection.sectors.label()));
    render_trend(&trend);
    render_closing(&closing);
    Ok(())
}

fn render_report(context: &ShellContext, report: &OccupancyReport) {
    let comparison = &report.comparison;
    let targets = context.config.targets;

    let mut metrics = Table::new(
        Some(format!(
            "Occupancy {} - {}",
            report.selection.month,
            report.selection.sectors.label()
        )),
        vec![
            TableColumn::new("Indicator", 22),
            TableColumn::numeric("Current", 9),
            TableColumn::numeric("Prior year", 10),
            TableColumn::numeric("Delta", 8),
        ],
    );
    metrics.add_row(vec![
        "Occupancy rate".to_string(),
        percent(comparison.current.occupancy_rate),
        percent(comparison.prior.occupancy_rate),
        signed(comparison.deltas.occupancy_rate),
    ]);
    metrics.add_row(vec![
        "Average length of stay".to_string(),
        format!("{:.2}", comparison.current.average_length_of_stay),
        format!("{:.2}", comparison.prior.average_length_of_stay),
        signed(comparison.deltas.average_length_of_stay),
    ]);
    metrics.add_row(vec![
        "Bed turnover".to_string(),
        format!("{:.2}", comparison.current.bed_turnover),
        format!("{:.2}", comparison.prior.bed_turnover),
        signed(comparison.deltas.bed_turnover),
    ]);
    TableRenderer::render(&metrics);

    output::line(format!(
        "  Status: {} (target {} to {})",
        comparison.band,
        percent(targets.lower),
        percent(targets.upper)
    ));
    output::line(format!("  Days to close: {}", report.days_to_close));

    render_daily(report);
    render_sector_load(report);
    render_weekdays(report);

    render_trend(&report.trend);
    if let Some(closing) = &report.closing {
        render_closing(closing);
    }
}

fn render_daily(report: &OccupancyReport) {
    let prior: HashMap<NaiveDate, f64> = report
        .prior_overlay
        .iter()
        .map(|point| (point.date, point.rate))
        .collect();

    let mut table = Table::new(
        Some("Daily movement"),
        vec![
            TableColumn::new("Date", 10),
            TableColumn::numeric("Occupancy", 9),
            TableColumn::numeric("Prior year", 10),
            TableColumn::numeric("Admissions", 10),
            TableColumn::numeric("Discharges", 10),
        ],
    );
    for day in &report.movement {
        table.add_row(vec![
            day.date.to_string(),
            percent(day.occupancy_rate),
            prior
                .get(&day.date)
                .map(|rate| percent(*rate))
                .unwrap_or_else(|| "-".to_string()),
            day.admissions.to_string(),
            day.discharges.to_string(),
        ]);
    }
    TableRenderer::render(&table);
    output::line(format!(
        "  {} day(s) aligned with the prior year.",
        report.aligned.len()
    ));
}

fn render_sector_load(report: &OccupancyReport) {
    let mut table = Table::new(
        Some("Patient-days by sector"),
        vec![
            TableColumn::new("Sector", 12),
            TableColumn::numeric("Patient-days", 12),
            TableColumn::numeric("Share", 7),
        ],
    );
    for load in &report.sector_load {
        table.add_row(vec![
            load.sector.clone(),
            format!("{:.0}", load.patient_days),
            percent(load.share * 100.0),
        ]);
    }
    TableRenderer::render(&table);
}

fn render_weekdays(report: &OccupancyReport) {
    let mut table = Table::new(
        Some("Patient-days by weekday"),
        vec![
            TableColumn::new("Day", 4),
            TableColumn::numeric("Rows", 4),
            TableColumn::numeric("Min", 6),
            TableColumn::numeric("Q1", 6),
            TableColumn::numeric("Median", 6),
            TableColumn::numeric("Q3", 6),
            TableColumn::numeric("Max", 6),
            TableColumn::numeric("Mean", 6),
        ],
    );
    for stats in &report.weekday_profile {
        table.add_row(vec![
            stats.weekday.to_string(),
            stats.count.to_string(),
            format!("{:.1}", stats.min),
            format!("{:.1}", stats.q1),
            format!("{:.1}", stats.median),
            format!("{:.1}", stats.q3),
            format!("{:.1}", stats.max),
            format!("{:.1}", stats.mean),
        ]);
    }
    TableRenderer::render(&table);
}

fn render_trend(outcome: &ForecastOutcome) {
    match outcome {
        ForecastOutcome::Available(series) => render_series(series),
        ForecastOutcome::Skipped(SkipReason::MonthClosed) => {
            output::info("Month closed; no forecast.");
        }
        ForecastOutcome::Degraded(failure) => {
            output::warning(format!("Trend forecast unavailable: {failure}"));
        }
    }
}

fn render_series(series: &ForecastSeries) {
    let mut table = Table::new(
        Some(format!(
            "Trend after {} ({:.0}% interval)",
            series.last_observed,
            series.interval_width * 100.0
        )),
        vec![
            TableColumn::new("Date", 10),
            TableColumn::numeric("Predicted", 9),
            TableColumn::numeric("Lower", 7),
            TableColumn::numeric("Upper", 7),
        ],
    );
    for point in &series.points {
        table.add_row(vec![
            point.date.to_string(),
            percent(point.predicted),
            percent(point.lower),
            percent(point.upper),
        ]);
    }
    TableRenderer::render(&table);
}

fn render_closing(closing: &ClosingProjection) {
    output::line(format!(
        "  Projected closing for {}: {}",
        closing.month,
        percent(closing.value)
    ));
    match &closing.source {
        ProjectionSource::Model => {}
        ProjectionSource::NoRemainingDays => {
            output::info("No days left to forecast; showing the month average.");
        }
        ProjectionSource::Fallback(failure) => {
            output::warning(format!(
                "Closing forecast fell back to the current average: {failure}"
            ));
        }
    }
}
