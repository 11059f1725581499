//! What-if estimate for higher discharge orders.

use bedflow_core::public_api::api_simulate_discharges;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn, TableRenderer};

use super::{parse_month, percent, selection_for, signed};

const USAGE: &str = "simulate <year> <month> [percent] [sector...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "simulate",
        "Estimate occupancy if discharge orders rose by a percentage",
        USAGE,
        cmd_simulate,
    )]
}

/// Reads an optional leading percentage (`10` or `10%`) from the sector list.
fn split_percent<'a, 'b>(rest: &'a [&'b str]) -> (Option<u32>, &'a [&'b str]) {
    match rest.split_first() {
        Some((first, tail)) => match first.trim_end_matches('%').parse::<u32>() {
            Ok(value) => (Some(value), tail),
            Err(_) => (None, rest),
        },
        None => (None, rest),
    }
}

fn cmd_simulate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (month, rest) = parse_month(args, USAGE)?;
    let (requested, sectors) = split_percent(rest);
    let defaults = context.config.simulation;
    let increase = requested.unwrap_or(defaults.default_increase_percent);

    if defaults.step_percent > 0 && increase % defaults.step_percent != 0 {
        return Err(CommandError::InvalidArguments(format!(
            "increase must be a multiple of {}%, got {}%",
            defaults.step_percent, increase
        )));
    }

    let store = context.store()?;
    let selection = selection_for(&store, month, sectors);
    let outcome = api_simulate_discharges(&store, &selection, increase)?;

    if outcome.current_discharges == 0 {
        output::warning(format!(
            "No discharge orders recorded for {} ({}); nothing to simulate.",
            month,
            selection.sectors.label()
        ));
        return Ok(());
    }

    let mut table = Table::new(
        Some(format!(
            "Discharge orders +{}% - {} - {}",
            outcome.increase_percent,
            month,
            selection.sectors.label()
        )),
        vec![
            TableColumn::new("Measure", 18),
            TableColumn::numeric("Current", 8),
            TableColumn::numeric("Simulated", 9),
            TableColumn::numeric("Change", 8),
        ],
    );
    table.add_row(vec![
        "Discharge orders".to_string(),
        outcome.current_discharges.to_string(),
        outcome.projected_discharges.to_string(),
        format!("+{}", outcome.extra_discharges),
    ]);
    table.add_row(vec![
        "Occupancy rate".to_string(),
        percent(outcome.current_rate),
        percent(outcome.simulated_rate),
        signed(outcome.rate_delta),
    ]);
    TableRenderer::render(&table);
    output::line(format!(
        "  {} patient-day(s) freed over the period.",
        outcome.extra_discharges
    ));
    Ok(())
}
