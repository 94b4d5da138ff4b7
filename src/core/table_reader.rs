use anyhow::{Context, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::path::Path;

/// 表头加数据行，所有单元格都是字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// 第一行作为表头
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let headers = rows.remove(0);
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

pub struct ExcelReader {
    workbook: Xlsx<std::io::BufReader<std::fs::File>>,
}

impl ExcelReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let workbook: Xlsx<_> = open_workbook(path_ref)
            .with_context(|| format!("无法打开Excel文件: {}", path_ref.display()))?;

        Ok(Self { workbook })
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    pub fn read_sheet(&mut self, sheet_name: &str) -> Result<RawTable> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .with_context(|| format!("无法读取工作表: {}", sheet_name))?;

        Ok(RawTable::from_rows(Self::range_to_rows(&range)))
    }

    fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
        let (Some(start), Some(end)) = (range.start(), range.end()) else {
            return Vec::new();
        };

        (start.0..=end.0)
            .map(|row| {
                (start.1..=end.1)
                    .map(|col| {
                        range
                            .get_value((row, col))
                            .map(Self::data_to_string)
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect()
    }

    fn data_to_string(data: &Data) -> String {
        match data {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => {
                if f.fract() == 0.0 {
                    format!("{}", *f as i64)
                } else {
                    format!("{}", f)
                }
            }
            Data::Int(i) => format!("{}", i),
            Data::Bool(b) => format!("{}", b),
            Data::DateTime(dt) => format!("{}", dt),
            Data::Error(e) => format!("{:?}", e),
            _ => String::new(),
        }
    }
}

pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let path_ref = path.as_ref();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path_ref)
        .with_context(|| format!("无法打开CSV文件: {}", path_ref.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("无法读取CSV表头: {}", path_ref.display()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("无法读取CSV记录: {}", path_ref.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

pub fn write_csv<P: AsRef<Path>>(table: &RawTable, path: P) -> Result<()> {
    let path_ref = path.as_ref();

    let mut writer = csv::Writer::from_path(path_ref)
        .with_context(|| format!("无法创建CSV文件: {}", path_ref.display()))?;

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("无法保存文件: {}", path_ref.display()))?;

    Ok(())
}
