mod common;

use bedflow::domain::{
    ForecastOutcome, MonthRef, ProjectionSource, SectorScope, Selection, TargetBand,
};
use bedflow::services::public_api::{api_occupancy_report, api_simulate_discharges};
use bedflow::services::report_service::{ReportOutcome, ReportSettings};

use common::{date, hospital_fixture, setup_test_env};

fn march_2024(sectors: SectorScope) -> Selection {
    Selection::new(MonthRef::new(2024, 3).unwrap(), sectors)
}

#[test]
fn open_month_report_covers_every_view() {
    let (mut datasets, _, base) = setup_test_env();
    datasets
        .load(&hospital_fixture().write_to(&base, "movements.csv"))
        .unwrap();
    let store = datasets.current().unwrap();

    let outcome = api_occupancy_report(
        &store,
        &march_2024(SectorScope::All),
        date(2024, 3, 20),
        &ReportSettings::default(),
    );
    let ReportOutcome::Ready(report) = outcome else {
        panic!("expected a report");
    };

    let comparison = report.comparison;
    assert!((comparison.current.occupancy_rate - 80.0).abs() < 1e-9);
    assert!((comparison.prior.occupancy_rate - 90.0).abs() < 1e-9);
    assert!((comparison.deltas.occupancy_rate + 10.0).abs() < 1e-9);
    assert_eq!(comparison.band, TargetBand::Below);

    assert_eq!(report.days_to_close, 11);
    assert_eq!(report.daily.len(), 20);
    assert_eq!(report.prior_overlay.len(), 31);
    assert_eq!(report.aligned.len(), 20);
    assert_eq!(report.movement.len(), 20);
    assert_eq!(report.weekday_profile.len(), 7);

    assert_eq!(report.sector_load[0].sector, "Clínica");
    assert!((report.sector_load[0].patient_days - 380.0).abs() < 1e-9);
    assert!((report.sector_load[1].patient_days - 180.0).abs() < 1e-9);

    let ForecastOutcome::Available(series) = &report.trend else {
        panic!("expected a trend, got {:?}", report.trend);
    };
    assert_eq!(series.len(), 7);
    assert_eq!(series.points[0].date, date(2024, 3, 21));
    assert!(series
        .points
        .iter()
        .all(|point| point.lower <= point.predicted && point.predicted <= point.upper));

    let closing = report.closing.as_ref().expect("open month has a projection");
    assert_eq!(closing.source, ProjectionSource::Model);
    assert!(closing.value > 0.0 && closing.value < 100.0);
}

#[test]
fn constant_sector_degrades_gracefully() {
    let (mut datasets, _, base) = setup_test_env();
    datasets
        .load(&hospital_fixture().write_to(&base, "movements.csv"))
        .unwrap();
    let store = datasets.current().unwrap();

    let outcome = api_occupancy_report(
        &store,
        &march_2024(SectorScope::from_names(["UTI"])),
        date(2024, 3, 20),
        &ReportSettings::default(),
    );
    let ReportOutcome::Ready(report) = outcome else {
        panic!("expected a report");
    };

    assert_eq!(report.comparison.band, TargetBand::OnTarget);
    assert!(matches!(report.trend, ForecastOutcome::Degraded(_)));
    let closing = report.closing.expect("open month has a projection");
    assert!(closing.is_fallback());
    assert!((closing.value - 90.0).abs() < 1e-9);
}

#[test]
fn discharge_simulation_over_loaded_table() {
    let (mut datasets, _, base) = setup_test_env();
    datasets
        .load(&hospital_fixture().write_to(&base, "movements.csv"))
        .unwrap();
    let store = datasets.current().unwrap();

    let selection = march_2024(SectorScope::from_names(["UTI"]));
    let unchanged = api_simulate_discharges(&store, &selection, 0).unwrap();
    assert!(unchanged.rate_delta.abs() < 1e-9);

    let raised = api_simulate_discharges(&store, &selection, 20).unwrap();
    assert_eq!(raised.extra_discharges, 4);
    assert!((raised.simulated_rate - 88.0).abs() < 1e-9);
    assert!(api_simulate_discharges(&store, &selection, 150).is_err());
}
