use bedflow_core::public_api::api_range_metrics;
use chrono::NaiveDate;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

use super::{parse_year, percent};

const RANGE_USAGE: &str = "range <YYYY-MM-DD> <YYYY-MM-DD> [origin...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "load",
            "Load a sector movement table (CSV)",
            "load <path.csv>",
            cmd_load,
        ),
        CommandEntry::new(
            "dataset",
            "Show the loaded dataset and its warnings",
            "dataset",
            cmd_dataset,
        ),
        CommandEntry::new(
            "filters",
            "List years, or the months and sectors of one year",
            "filters [year]",
            cmd_filters,
        ),
        CommandEntry::new(
            "range",
            "Indicators for a date range, optionally limited to some origins",
            RANGE_USAGE,
            cmd_range,
        ),
    ]
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = match args {
        [path] => *path,
        [] => {
            return Err(CommandError::InvalidArguments(
                "usage: load <path.csv>".into(),
            ))
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: load <path.csv> (quote paths containing spaces)".into(),
            ))
        }
    };

    let path = context.resolve_dataset_path(raw);
    let metadata = context.datasets.load(&path)?;

    output::success(format!(
        "Loaded {} rows ({} inpatient) from `{}`.",
        metadata.rows,
        metadata.inpatient_rows,
        metadata.path.display()
    ));
    if let Some((first, last)) = metadata.date_range {
        output::info(format!("Dates {} to {}.", first, last));
    }
    context.report_warnings(&metadata.warnings);

    context.config.last_dataset = Some(metadata.path);
    context.persist_config()
}

fn cmd_dataset(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let store = context.store()?;

    output::section("Dataset");
    if let Some(path) = context.datasets.current_path() {
        output::line(format!("  File         : {}", path.display()));
    }
    output::line(format!("  Rows         : {}", store.len()));
    output::line(format!("  Inpatient    : {}", store.inpatient().count()));
    if let Some((first, last)) = store.date_range() {
        output::line(format!("  Dates        : {} to {}", first, last));
    }
    output::line(format!("  Origins      : {}", store.origins().join(", ")));
    output::line(format!(
        "  Inpatient as : `{}`",
        context.config.inpatient_origin
    ));

    let warnings = context.datasets.warnings();
    if warnings.is_empty() {
        output::success("No data quality warnings.");
    } else {
        context.report_warnings(warnings);
    }
    Ok(())
}

fn cmd_filters(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let store = context.store()?;

    let Some(raw_year) = args.first() else {
        let years = store.years();
        if years.is_empty() {
            output::warning("No inpatient rows; nothing to filter.");
            return Ok(());
        }
        let listed: Vec<String> = years.iter().map(i32::to_string).collect();
        output::section("Years");
        output::line(format!("  {}", listed.join(", ")));
        output::info("Use `filters <year>` for months and sectors.");
        return Ok(());
    };

    let year = parse_year(raw_year)?;
    let months = store.months_in(year);
    if months.is_empty() {
        output::warning(format!("No inpatient rows in {year}."));
        return Ok(());
    }

    let listed: Vec<String> = months.iter().map(|month| format!("{month:02}")).collect();
    output::section(format!("Filters for {year}"));
    output::line(format!("  Months: {}", listed.join(", ")));

    let mut table = Table::new(None::<String>, vec![TableColumn::new("Sector", 12)]);
    for sector in store.sectors_in(year) {
        table.add_row(vec![sector]);
    }
    TableRenderer::render(&table);
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn cmd_range(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [start, end, origins @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {RANGE_USAGE}"
        )));
    };
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    if start > end {
        return Err(CommandError::InvalidArguments(format!(
            "range start {start} is after its end {end}"
        )));
    }
    let origins: Vec<String> = origins.iter().map(|origin| origin.to_string()).collect();

    let store = context.store()?;
    let (rows, metrics) = api_range_metrics(&store, start, end, &origins);
    if rows == 0 {
        output::warning(format!("No rows between {start} and {end}."));
        return Ok(());
    }

    output::section(format!("Range {start} to {end}"));
    output::line(format!("  Rows         : {rows}"));
    let listed = if origins.is_empty() {
        "all".to_string()
    } else {
        origins.join(", ")
    };
    output::line(format!("  Origins      : {listed}"));

    let mut table = Table::new(
        None::<String>,
        vec![
            TableColumn::new("Indicator", 22),
            TableColumn::numeric("Value", 9),
        ],
    );
    table.add_row(vec![
        "Occupancy rate".to_string(),
        percent(metrics.occupancy_rate),
    ]);
    table.add_row(vec![
        "Average length of stay".to_string(),
        format!("{:.2}", metrics.average_length_of_stay),
    ]);
    table.add_row(vec![
        "Bed turnover".to_string(),
        format!("{:.2}", metrics.bed_turnover),
    ]);
    TableRenderer::render(&table);
    Ok(())
}
