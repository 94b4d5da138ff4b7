use std::fs;
use std::path::Path;

use convoy_scorer::core::{ExcelReader, Processor};
use convoy_scorer::models::{Config, Stage};
use rust_xlsxwriter::Workbook;

fn write_workbook(path: &Path, sheet_name: &str) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).unwrap();

    let headers = ["vehicle_id", "engine_capacity", "fuel_consumption", "maximum_load"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }

    worksheet.write_number(1, 0, 1).unwrap();
    worksheet.write_number(1, 1, 50).unwrap();
    worksheet.write_number(1, 2, 10).unwrap();
    worksheet.write_number(1, 3, 25).unwrap();

    worksheet.write_number(2, 0, 2).unwrap();
    worksheet.write_string(2, 1, "10 l").unwrap();
    worksheet.write_number(2, 2, 80).unwrap();
    worksheet.write_string(2, 3, "5t").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn test_read_vehicles_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.xlsx");
    write_workbook(&path, "Vehicles");

    let mut reader = ExcelReader::open(&path).unwrap();
    assert_eq!(reader.sheet_names(), vec!["Vehicles".to_string()]);

    let table = reader.read_sheet("Vehicles").unwrap();
    assert_eq!(table.headers[0], "vehicle_id");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0], vec!["1", "50", "10", "25"]);
    assert_eq!(table.rows[1], vec!["2", "10 l", "80", "5t"]);
}

#[test]
fn test_pipeline_from_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.xlsx");
    write_workbook(&path, "Vehicles");

    let config = Config::for_input(&path);
    assert_eq!(config.stage, Stage::Convert);

    let summary = Processor::new(config).run().unwrap();

    assert_eq!(summary.imported.as_ref().unwrap().count, 2);
    assert_eq!(summary.corrected.as_ref().unwrap().count, 2);
    assert_eq!(summary.json.as_ref().unwrap().count, 1);
    assert_eq!(summary.xml.as_ref().unwrap().count, 1);

    let converted = fs::read_to_string(dir.path().join("convoy.csv")).unwrap();
    assert!(converted.contains("2,10 l,80,5t"));
    let checked = fs::read_to_string(dir.path().join("convoy[CHECKED].csv")).unwrap();
    assert!(checked.contains("2,10,80,5"));
}

#[test]
fn test_missing_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("convoy.xlsx");
    write_workbook(&path, "Sheet1");

    assert!(Processor::new(Config::for_input(&path)).run().is_err());
    assert!(!dir.path().join("convoy.s3db").exists());
}
