use bedflow_core::{storage::DatasetReader, CoreError};
use bedflow_domain::INPATIENT_ORIGIN;
use bedflow_storage_csv::CsvDatasetReader;
use chrono::NaiveDate;
use std::{fs, io::Cursor};
use tempfile::tempdir;

const HEADER: &str =
    "Data,Setor,Origem,Intern.,Saídas,Altas,Paciente/Dia,Leitos-dia,Leitos Ativos,Observação";

#[test]
fn csv_reader_loads_rows_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("movement.csv");
    fs::write(
        &path,
        format!(
            "\u{feff}{HEADER}\n\
             02/01/2024,Ward B,Internação,3,2,1,18,20,20,\n\
             01/01/2024 00:00:00,Ward A,Internação,4,5,4.0,9.5,10,10,note\n\
             01/01/2024,ER,Pronto Socorro,,,,3,4,4,\n"
        ),
    )
    .expect("write csv");

    let store = CsvDatasetReader::new().read_path(&path).expect("load csv");
    assert_eq!(store.len(), 3);

    let first = &store.records()[0];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(first.sector, "ER");
    assert_eq!(first.admissions, 0);
    assert!(!first.is_inpatient());

    let ward_a = &store.records()[1];
    assert_eq!(ward_a.sector, "Ward A");
    assert_eq!(ward_a.discharge_orders, 4);
    assert_eq!(ward_a.patient_days, 9.5);
    assert!(ward_a.is_inpatient());
    assert_eq!(store.inpatient().count(), 2);
}

#[test]
fn csv_reader_reports_missing_columns() {
    let mut source = Cursor::new("Data,Setor,Origem\n01/01/2024,Ward A,Internação\n");
    let err = CsvDatasetReader::new()
        .read_from(&mut source)
        .expect_err("missing columns");
    assert!(matches!(err, CoreError::MissingColumn(ref column) if column == "Intern."));
}

#[test]
fn csv_reader_names_line_and_column_of_bad_values() {
    let mut source = Cursor::new(format!(
        "{HEADER}\n\
         01/01/2024,Ward A,Internação,1,1,1,9,10,10,\n\
         02/01/2024,Ward A,Internação,1.5,1,1,9,10,10,\n"
    ));
    let err = CsvDatasetReader::new()
        .read_from(&mut source)
        .expect_err("fractional count");
    match err {
        CoreError::InvalidRow { line, column, .. } => {
            assert_eq!(line, 3);
            assert_eq!(column, "Intern.");
        }
        other => panic!("unexpected error: {other}"),
    }

    let mut source = Cursor::new(format!(
        "{HEADER}\n2024/31/01,Ward A,Internação,1,1,1,9,10,10,\n"
    ));
    let err = CsvDatasetReader::new()
        .read_from(&mut source)
        .expect_err("bad date");
    assert!(err.to_string().contains("Data"));
}

#[test]
fn csv_reader_maps_custom_inpatient_label_and_delimiter() {
    let mut source = Cursor::new(
        "Data;Setor;Origem;Intern.;Saídas;Altas;Paciente/Dia;Leitos-dia;Leitos Ativos\n\
         2024-05-01;Ward A;Inpatient;1;1;1;9;10;10\n",
    );
    let store = CsvDatasetReader::new()
        .with_delimiter(b';')
        .with_inpatient_label("Inpatient")
        .read_from(&mut source)
        .expect("load csv");
    assert_eq!(store.records()[0].origin, INPATIENT_ORIGIN);
}

#[test]
fn csv_reader_fails_for_missing_file() {
    let dir = tempdir().expect("tempdir");
    let err = CsvDatasetReader::new()
        .read_path(&dir.path().join("absent.csv"))
        .expect_err("missing file");
    assert!(matches!(err, CoreError::Io(_)));
}
