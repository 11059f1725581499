pub mod config;
pub mod dataset;
pub mod report;
pub mod simulation;
pub mod system;

use bedflow_domain::{MonthRef, RecordStore, SectorScope, Selection};

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::cli::registry::{CommandGroup, CommandRegistry};
use crate::errors::AppError;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_group(CommandGroup::Data, dataset::definitions());
    registry.register_group(CommandGroup::Analysis, report::definitions());
    registry.register_group(CommandGroup::Analysis, simulation::definitions());
    registry.register_group(CommandGroup::Settings, config::definitions());
    registry.register_group(CommandGroup::Session, system::definitions());
}

pub(crate) fn parse_year(raw: &str) -> Result<i32, CommandError> {
    raw.parse::<i32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a year")))
}

/// Splits `<year> <month> [sector...]` into a month and the remaining words.
pub(crate) fn parse_month<'a, 'b>(
    args: &'a [&'b str],
    usage: &str,
) -> Result<(MonthRef, &'a [&'b str]), CommandError> {
    let [year, month, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let year = parse_year(year)?;
    let month = month
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{month}` is not a month number")))?;
    let month = MonthRef::new(year, month).map_err(AppError::from)?;
    Ok((month, rest))
}

/// Builds a selection and warns about sectors that have no rows in that year.
pub(crate) fn selection_for(store: &RecordStore, month: MonthRef, sectors: &[&str]) -> Selection {
    let known = store.sectors_in(month.year);
    for sector in sectors {
        if !known.iter().any(|name| name == sector) {
            output::warning(format!("Sector `{sector}` has no rows in {}.", month.year));
        }
    }
    Selection::new(month, SectorScope::from_names(sectors.iter().copied()))
}

/// Removes `flag` from `args`, reporting whether it was present.
pub(crate) fn take_flag<'a>(args: &[&'a str], flag: &str) -> (bool, Vec<&'a str>) {
    let found = args.iter().any(|arg| arg.eq_ignore_ascii_case(flag));
    let rest = args
        .iter()
        .copied()
        .filter(|arg| !arg.eq_ignore_ascii_case(flag))
        .collect();
    (found, rest)
}

pub(crate) fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub(crate) fn signed(value: f64) -> String {
    format!("{value:+.2}")
}
