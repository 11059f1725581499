#![allow(dead_code)]

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use bedflow::{config::ConfigManager, core::DatasetManager};
use bedflow_storage_csv::CsvDatasetReader;
use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use tempfile::TempDir;

pub const HEADER: &str =
    "Data,Setor,Origem,Intern.,Saídas,Altas,Paciente/Dia,Leitos-dia,Leitos Ativos";

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by a unique directory for each test.
pub fn setup_test_env() -> (DatasetManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let datasets = DatasetManager::new(Box::new(CsvDatasetReader::new()));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (datasets, config_manager, base)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Builder for sector movement tables in the exported CSV layout.
#[derive(Default)]
pub struct MovementCsv {
    body: String,
}

impl MovementCsv {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn row(
        mut self,
        date: NaiveDate,
        sector: &str,
        origin: &str,
        admissions: u32,
        discharges: u32,
        discharge_orders: u32,
        patient_days: f64,
        bed_days: f64,
    ) -> Self {
        let _ = writeln!(
            self.body,
            "{},{},{},{},{},{},{},{},{}",
            date.format("%d/%m/%Y"),
            sector,
            origin,
            admissions,
            discharges,
            discharge_orders,
            patient_days,
            bed_days,
            bed_days
        );
        self
    }

    /// One inpatient row per day from `start` to `end` inclusive.
    pub fn daily(
        mut self,
        sector: &str,
        start: NaiveDate,
        end: NaiveDate,
        patient_days: impl Fn(NaiveDate) -> f64,
        bed_days: f64,
    ) -> Self {
        let mut day = start;
        while day <= end {
            self = self.row(day, sector, "Internação", 2, 2, 1, patient_days(day), bed_days);
            day += Duration::days(1);
        }
        self
    }

    pub fn render(&self) -> String {
        format!("{HEADER}\n{}", self.body)
    }

    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.render()).expect("write csv fixture");
        path
    }
}

/// A ward with a year of history, the prior-year March, and March 2024 up to the 20th.
pub fn hospital_fixture() -> MovementCsv {
    MovementCsv::new()
        .daily("UTI", date(2023, 3, 1), date(2024, 3, 20), |_| 9.0, 10.0)
        .daily(
            "Clínica",
            date(2024, 3, 1),
            date(2024, 3, 20),
            |day| 15.0 + f64::from(day.weekday().number_from_monday()),
            25.0,
        )
        .row(date(2024, 3, 5), "Pronto Socorro", "Ambulatório", 30, 30, 0, 0.0, 0.0)
}
