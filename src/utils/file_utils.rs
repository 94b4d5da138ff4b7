use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::core::ExportFormat;

/// 清洗后的 CSV 文件名标记
pub const CHECKED_MARKER: &str = "[CHECKED]";

pub fn is_xlsx_file(path: &Path) -> bool {
    has_extension(path, "xlsx")
}

pub fn is_store_file(path: &Path) -> bool {
    has_extension(path, "s3db")
}

pub fn is_checked_file(path: &Path) -> bool {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().ends_with(CHECKED_MARKER))
        .unwrap_or(false)
}

fn has_extension(path: &Path, expected: &str) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}

/// 数据集名称：去掉扩展名和 `[CHECKED]` 标记后的文件名
pub fn dataset_stem(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .with_context(|| format!("无法从路径中获取文件名: {}", path.display()))?;

    Ok(stem
        .strip_suffix(CHECKED_MARKER)
        .map(str::to_string)
        .unwrap_or(stem))
}

/// 一次运行中所有输出文件的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub converted_csv: PathBuf,
    pub checked_csv: PathBuf,
    pub store: PathBuf,
    pub json: PathBuf,
    pub xml: PathBuf,
}

impl OutputPaths {
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            converted_csv: dir.join(format!("{}.csv", stem)),
            checked_csv: dir.join(format!("{}{}.csv", stem, CHECKED_MARKER)),
            store: dir.join(format!("{}.s3db", stem)),
            json: dir.join(format!("{}.{}", stem, ExportFormat::Json.extension())),
            xml: dir.join(format!("{}.{}", stem, ExportFormat::Xml.extension())),
        }
    }
}
