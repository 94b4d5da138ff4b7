use super::error::PipelineError;
use super::table_reader::RawTable;
use crate::utils::clean_digits;

/// 清洗结果：新表和被修正的单元格数量
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedTable {
    pub table: RawTable,
    pub corrections: usize,
}

pub struct Sanitizer;

impl Sanitizer {
    /// 去掉所有数据单元格中的非数字字符，表头保持不变
    ///
    /// 不含任何数字的单元格会变成空字符串，留到解析整数时再报错。
    pub fn sanitize(table: &RawTable) -> Result<SanitizedTable, PipelineError> {
        if table.headers.is_empty() {
            return Err(PipelineError::EmptyTable);
        }

        let mut corrections = 0usize;
        let rows: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let (cleaned, corrected) = Self::sanitize_cell(cell);
                        if corrected {
                            corrections += 1;
                        }
                        cleaned
                    })
                    .collect()
            })
            .collect();

        Ok(SanitizedTable {
            table: RawTable {
                headers: table.headers.clone(),
                rows,
            },
            corrections,
        })
    }

    /// 返回清洗后的值以及是否发生了修改
    pub fn sanitize_cell(cell: &str) -> (String, bool) {
        let cleaned = clean_digits(cell);
        let corrected = cleaned != cell;
        (cleaned.into_owned(), corrected)
    }
}
