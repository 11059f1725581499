//! CSV ingestion of sector movement tables into a [`RecordStore`].

use std::{fs::File, io::Read, path::Path};

use bedflow_core::{storage::DatasetReader, CoreError};
use bedflow_domain::{MovementRecord, RecordStore, INPATIENT_ORIGIN};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};

pub const COLUMN_DATE: &str = "Data";
pub const COLUMN_SECTOR: &str = "Setor";
pub const COLUMN_ORIGIN: &str = "Origem";
pub const COLUMN_ADMISSIONS: &str = "Intern.";
pub const COLUMN_DISCHARGES: &str = "Saídas";
pub const COLUMN_DISCHARGE_ORDERS: &str = "Altas";
pub const COLUMN_PATIENT_DAYS: &str = "Paciente/Dia";
pub const COLUMN_BED_DAYS: &str = "Leitos-dia";
pub const COLUMN_ACTIVE_BEDS: &str = "Leitos Ativos";

const DATE_FORMATS: [&str; 4] = ["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Reads comma-separated movement tables with day-first dates.
#[derive(Debug, Clone)]
pub struct CsvDatasetReader {
    delimiter: u8,
    inpatient_label: String,
}

impl Default for CsvDatasetReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            inpatient_label: INPATIENT_ORIGIN.to_string(),
        }
    }
}

impl CsvDatasetReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Origin label in the source table that denotes inpatient rows.
    pub fn with_inpatient_label(mut self, label: impl Into<String>) -> Self {
        self.inpatient_label = label.into();
        self
    }
}

impl DatasetReader for CsvDatasetReader {
    fn read_path(&self, path: &Path) -> Result<RecordStore, CoreError> {
        let mut file = File::open(path)?;
        self.read_from(&mut file)
    }

    fn read_from(&self, source: &mut dyn Read) -> Result<RecordStore, CoreError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|err| CoreError::Malformed(err.to_string()))?
            .clone();
        let columns = ColumnMap::resolve(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|err| CoreError::Malformed(err.to_string()))?;
            if row.iter().all(str::is_empty) {
                continue;
            }
            let line = row.position().map(|position| position.line()).unwrap_or(0);
            records.push(columns.parse_row(&row, line, &self.inpatient_label)?);
        }
        Ok(RecordStore::new(records))
    }
}

struct ColumnMap {
    date: usize,
    sector: usize,
    origin: usize,
    admissions: usize,
    discharges: usize,
    discharge_orders: usize,
    patient_days: usize,
    bed_days: usize,
    active_beds: usize,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self, CoreError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |column: &str| {
            names
                .iter()
                .position(|name| *name == column)
                .ok_or_else(|| CoreError::MissingColumn(column.to_string()))
        };
        Ok(Self {
            date: find(COLUMN_DATE)?,
            sector: find(COLUMN_SECTOR)?,
            origin: find(COLUMN_ORIGIN)?,
            admissions: find(COLUMN_ADMISSIONS)?,
            discharges: find(COLUMN_DISCHARGES)?,
            discharge_orders: find(COLUMN_DISCHARGE_ORDERS)?,
            patient_days: find(COLUMN_PATIENT_DAYS)?,
            bed_days: find(COLUMN_BED_DAYS)?,
            active_beds: find(COLUMN_ACTIVE_BEDS)?,
        })
    }

    fn parse_row(
        &self,
        row: &StringRecord,
        line: u64,
        inpatient_label: &str,
    ) -> Result<MovementRecord, CoreError> {
        let field = |index: usize| row.get(index).unwrap_or("");
        let invalid = |column: &str, message: String| CoreError::InvalidRow {
            line,
            column: column.to_string(),
            message,
        };

        let raw_date = field(self.date);
        let date = parse_date(raw_date)
            .ok_or_else(|| invalid(COLUMN_DATE, format!("unrecognised date `{raw_date}`")))?;

        let sector = field(self.sector);
        if sector.is_empty() {
            return Err(invalid(COLUMN_SECTOR, "sector is empty".into()));
        }
        let origin = match field(self.origin) {
            label if label == inpatient_label => INPATIENT_ORIGIN,
            label => label,
        };

        let count = |index: usize, column: &str| {
            parse_count(field(index)).map_err(|message| invalid(column, message))
        };
        let quantity = |index: usize, column: &str| {
            parse_quantity(field(index)).map_err(|message| invalid(column, message))
        };

        Ok(MovementRecord {
            date,
            sector: sector.to_string(),
            origin: origin.to_string(),
            admissions: count(self.admissions, COLUMN_ADMISSIONS)?,
            discharges: count(self.discharges, COLUMN_DISCHARGES)?,
            discharge_orders: count(self.discharge_orders, COLUMN_DISCHARGE_ORDERS)?,
            patient_days: quantity(self.patient_days, COLUMN_PATIENT_DAYS)?,
            bed_days: quantity(self.bed_days, COLUMN_BED_DAYS)?,
            active_beds: quantity(self.active_beds, COLUMN_ACTIVE_BEDS)?,
        })
    }
}

/// Parses a day-first or ISO date, ignoring any trailing time part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.split([' ', 'T']).next()?.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(day, format).ok())
}

fn parse_number(raw: &str) -> Result<f64, String> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    let value = raw
        .parse::<f64>()
        .or_else(|_| raw.replace(',', ".").parse::<f64>())
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("`{raw}` must be a non-negative number"));
    }
    Ok(value)
}

fn parse_quantity(raw: &str) -> Result<f64, String> {
    parse_number(raw)
}

fn parse_count(raw: &str) -> Result<u32, String> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(format!("`{raw}` must be a whole number"));
    }
    Ok(value as u32)
}
