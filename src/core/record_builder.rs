use std::collections::HashMap;

use super::error::PipelineError;
use super::scoring::{self, ScoreError};
use super::table_reader::RawTable;
use crate::models::VehicleRecord;

/// 把清洗后的表解析为车辆记录并计算评分
///
/// 任意一行解析失败、`engine_capacity` 为 0 或主键重复时整批失败。
pub fn build_records(table: &RawTable) -> Result<Vec<VehicleRecord>, PipelineError> {
    if table.headers.is_empty() {
        return Err(PipelineError::EmptyTable);
    }
    if table.headers.len() != VehicleRecord::FIELD_COUNT {
        return Err(PipelineError::InvalidSchema(format!(
            "应包含 {} 列，实际为 {} 列",
            VehicleRecord::FIELD_COUNT,
            table.headers.len()
        )));
    }

    let mut seen: HashMap<i64, usize> = HashMap::new();
    let mut records = Vec::with_capacity(table.row_count());

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 2;
        let record = build_record(table, row_number, row)?;

        // 同批次内主键重复时不打开数据库
        if let Some(&first_row) = seen.get(&record.vehicle_id) {
            return Err(PipelineError::DuplicateVehicleId {
                vehicle_id: record.vehicle_id,
                first_row,
                row: row_number,
            });
        }
        seen.insert(record.vehicle_id, row_number);
        records.push(record);
    }

    Ok(records)
}

fn build_record(table: &RawTable, row_number: usize, row: &[String]) -> Result<VehicleRecord, PipelineError> {
    if row.len() != table.headers.len() {
        return Err(PipelineError::RaggedRow {
            row: row_number,
            expected: table.headers.len(),
            found: row.len(),
        });
    }

    let vehicle_id = parse_cell(table, row_number, row, 0)?;
    let engine_capacity = parse_cell(table, row_number, row, 1)?;
    let fuel_consumption = parse_cell(table, row_number, row, 2)?;
    let maximum_load = parse_cell(table, row_number, row, 3)?;

    let score = scoring::score(engine_capacity, fuel_consumption, maximum_load).map_err(|e| match e {
        ScoreError::DivisionByZero => PipelineError::ZeroEngineCapacity { vehicle_id },
        ScoreError::NegativeInput => PipelineError::NegativeValue { vehicle_id },
    })?;

    Ok(VehicleRecord {
        vehicle_id,
        engine_capacity,
        fuel_consumption,
        maximum_load,
        score,
    })
}

/// 只接受纯数字，范围与 SQLite INTEGER 一致（0 到 i64::MAX）
fn parse_cell(table: &RawTable, row_number: usize, row: &[String], col: usize) -> Result<i64, PipelineError> {
    let value = &row[col];
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(parse_error(table, row_number, col, value));
    }

    value
        .parse()
        .map_err(|_| parse_error(table, row_number, col, value))
}

fn parse_error(table: &RawTable, row_number: usize, col: usize, value: &str) -> PipelineError {
    PipelineError::ParseCell {
        row: row_number,
        column: table.headers[col].clone(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        let mut all = vec![
            VehicleRecord::FIELD_NAMES
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>(),
        ];
        all.extend(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<_>>()),
        );
        RawTable::from_rows(all)
    }

    #[test]
    fn test_build_records() {
        let records = build_records(&table(&[&["1", "50", "10", "25"], &["2", "10", "80", "5"]])).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            VehicleRecord {
                vehicle_id: 1,
                engine_capacity: 50,
                fuel_consumption: 10,
                maximum_load: 25,
                score: 6,
            }
        );
        assert_eq!(records[1].score, 1);
    }

    #[test]
    fn test_empty_cell_is_parse_error() {
        let err = build_records(&table(&[&["1", "50", "10", "25"], &["2", "10", "", "5"]])).unwrap_err();

        match err {
            PipelineError::ParseCell { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "fuel_consumption");
                assert_eq!(value, "");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signed_value_is_parse_error() {
        let err = build_records(&table(&[&["1", "+50", "10", "25"]])).unwrap_err();
        assert!(matches!(err, PipelineError::ParseCell { .. }));
    }

    #[test]
    fn test_values_beyond_u32() {
        let records = build_records(&table(&[&["1", "50", "10", "5000000000"]])).unwrap();
        assert_eq!(records[0].maximum_load, 5_000_000_000);
        assert_eq!(records[0].score, 6);
    }

    #[test]
    fn test_overflow_is_parse_error() {
        // i64::MAX + 1
        let err = build_records(&table(&[&["1", "50", "10", "9223372036854775808"]])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ParseCell { row: 2, ref column, .. } if column == "maximum_load"
        ));
    }

    #[test]
    fn test_duplicate_vehicle_id_in_batch() {
        let err = build_records(&table(&[
            &["1", "50", "10", "25"],
            &["2", "10", "80", "5"],
            &["1", "10", "80", "5"],
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::DuplicateVehicleId { vehicle_id: 1, first_row: 2, row: 4 }
        ));
    }

    #[test]
    fn test_zero_engine_capacity() {
        let err = build_records(&table(&[&["9", "0", "10", "25"]])).unwrap_err();
        assert!(matches!(err, PipelineError::ZeroEngineCapacity { vehicle_id: 9 }));
    }

    #[test]
    fn test_ragged_row() {
        let err = build_records(&table(&[&["1", "50", "10"]])).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RaggedRow { row: 2, expected: 4, found: 3 }
        ));
    }

    #[test]
    fn test_wrong_column_count() {
        let raw = RawTable::from_rows(vec![
            vec!["vehicle_id".to_string(), "engine_capacity".to_string()],
            vec!["1".to_string(), "50".to_string()],
        ]);
        assert!(matches!(
            build_records(&raw),
            Err(PipelineError::InvalidSchema(_))
        ));
    }
}
