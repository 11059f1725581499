mod common;

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{hospital_fixture, temp_base};

fn script(home: &Path, input: String) -> assert_cmd::assert::Assert {
    Command::cargo_bin("bedflow_cli")
        .unwrap()
        .env("BEDFLOW_CLI_SCRIPT", "1")
        .env("BEDFLOW_HOME", home)
        .env("BEDFLOW_TODAY", "2024-03-20")
        .env("NO_COLOR", "1")
        .write_stdin(input)
        .assert()
        .success()
}

fn with_fixture(commands: &str) -> (std::path::PathBuf, String) {
    let base = temp_base();
    let csv = hospital_fixture().write_to(&base, "movements.csv");
    let input = format!("load \"{}\"\n{}\nexit\n", csv.display(), commands);
    (base, input)
}

#[test]
fn script_mode_loads_and_reports_a_sector() {
    let (home, input) = with_fixture("report 2024 3 UTI");

    script(&home, input)
        .stdout(contains("Loaded 407 rows (406 inpatient)"))
        .stdout(contains("Occupancy 2024-03 - UTI"))
        .stdout(contains("90.0%"))
        .stdout(contains("Status: On target"))
        .stdout(contains("Days to close: 11"))
        .stdout(contains("Trend forecast unavailable"))
        .stdout(contains("Closing forecast fell back"));
}

#[test]
fn all_sectors_fall_below_target() {
    let (home, input) = with_fixture("report 2024 3");

    script(&home, input)
        .stdout(contains("80.0%"))
        .stdout(contains("-10.00"))
        .stdout(contains("Status: Below target"))
        .stdout(contains("Trend after 2024-03-20"));
}

#[test]
fn report_json_is_tagged() {
    let (home, input) = with_fixture("report 2024 3 UTI --json");

    script(&home, input)
        .stdout(contains("\"status\": \"ready\""))
        .stdout(contains("\"days_to_close\": 11"));
}

#[test]
fn empty_selection_is_not_an_error() {
    let (home, input) = with_fixture("report 2021 5");

    script(&home, input)
        .stdout(contains("No inpatient rows for 2021-05"))
        .stdout(contains("ERROR").not());
}

#[test]
fn closed_month_skips_trend_command() {
    let (home, input) = with_fixture("trend 2023 3");

    script(&home, input).stdout(contains("2023-03 is closed"));
}

#[test]
fn simulation_reduces_occupancy() {
    let (home, input) = with_fixture("simulate 2024 3 20 UTI");

    script(&home, input)
        .stdout(contains("Discharge orders +20%"))
        .stdout(contains("88.0%"))
        .stdout(contains("4 patient-day(s) freed"));
}

#[test]
fn simulation_rejects_off_step_increase() {
    let (home, input) = with_fixture("simulate 2024 3 7");

    script(&home, input).stdout(contains("multiple of 5%"));
}

#[test]
fn commands_before_load_explain_what_to_do() {
    let home = temp_base();

    script(&home, "report 2024 3\nexit\n".into())
        .stdout(contains("No dataset loaded. Use `load <csv>` first."));
}

#[test]
fn malformed_load_keeps_previous_dataset() {
    let (home, _) = with_fixture("");
    let good = home.join("movements.csv");
    let bad = home.join("broken.csv");
    fs::write(
        &bad,
        format!("{}\n32/13/2024,UTI,Internação,1,1,1,9,10,10\n", common::HEADER),
    )
    .unwrap();
    let input = format!(
        "load \"{}\"\nload \"{}\"\ndataset\nexit\n",
        good.display(),
        bad.display()
    );

    script(&home, input)
        .stdout(contains("Line 2"))
        .stdout(contains("Rows         : 407"));
}

#[test]
fn config_changes_persist_and_apply() {
    let (home, input) = with_fixture("config set targets.lower 95\nreport 2024 3 UTI");

    script(&home, input)
        .stdout(contains("targets.lower set to 95."))
        .stdout(contains("Status: Below target"));

    let stored = fs::read_to_string(home.join("config").join("config.json")).unwrap();
    assert!(stored.contains("\"lower\": 95.0"));
    assert!(stored.contains("movements.csv"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = temp_base();

    script(&home, "reprot 2024 3\nhelp\nversion\nexit\n".into())
        .stdout(contains("Suggestion: `report`?"))
        .stdout(contains("Available commands"))
        .stdout(contains("bedflow 0.1.0"));
}

#[test]
fn range_reports_indicators_for_matching_origins() {
    let (home, input) = with_fixture(
        "range 2023-06-01 2023-06-30 Internação\nrange 2024-03-05 2024-03-05 Ambulatório",
    );

    script(&home, input)
        .stdout(contains("Range 2023-06-01 to 2023-06-30"))
        .stdout(contains("Rows         : 30"))
        .stdout(contains("90.0%"))
        .stdout(contains("Rows         : 1"))
        .stdout(contains("Origins      : Ambulatório"));
}

#[test]
fn range_rejects_reversed_dates() {
    let (home, input) = with_fixture("range 2024-03-20 2024-03-01");

    script(&home, input).stdout(contains("range start 2024-03-20 is after its end 2024-03-01"));
}
