use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::{is_checked_file, is_store_file, is_xlsx_file};

/// 流水线的起始阶段，从该阶段一直运行到导出结束
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum Stage {
    /// 读取 Excel 工作表
    Convert,
    /// 清洗原始 CSV
    Sanitize,
    /// 已清洗的 CSV，直接评分入库
    Persist,
    /// 已有数据库，只做导出
    Export,
}

impl Stage {
    /// 按文件名约定推断起始阶段，仅供命令行使用
    pub fn infer(path: &Path) -> Self {
        if is_xlsx_file(path) {
            Self::Convert
        } else if is_store_file(path) {
            Self::Export
        } else if is_checked_file(path) {
            Self::Persist
        } else {
            Self::Sanitize
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub sheet_name: String,
    pub stage: Stage,
    pub write_intermediate_files: bool,
    pub score_threshold: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_dir: None,
            sheet_name: "Vehicles".to_string(),
            stage: Stage::Sanitize,
            write_intermediate_files: true,
            score_threshold: 3,
        }
    }
}

impl Config {
    pub fn for_input(path: impl Into<PathBuf>) -> Self {
        let input_path = path.into();
        let stage = Stage::infer(&input_path);
        Self {
            input_path,
            stage,
            ..Self::default()
        }
    }

    /// 输出目录，未指定时与输入文件同目录
    pub fn output_dir(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }

        match self.input_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_infer() {
        assert_eq!(Stage::infer(Path::new("data/convoy.xlsx")), Stage::Convert);
        assert_eq!(Stage::infer(Path::new("convoy.csv")), Stage::Sanitize);
        assert_eq!(Stage::infer(Path::new("convoy[CHECKED].csv")), Stage::Persist);
        assert_eq!(Stage::infer(Path::new("convoy.s3db")), Stage::Export);
    }

    #[test]
    fn test_output_dir_defaults_to_input_parent() {
        let config = Config::for_input("data/convoy.csv");
        assert_eq!(config.output_dir(), PathBuf::from("data"));

        let config = Config::for_input("convoy.csv");
        assert_eq!(config.output_dir(), PathBuf::from("."));

        let mut config = Config::for_input("data/convoy.csv");
        config.output_dir = Some(PathBuf::from("out"));
        assert_eq!(config.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sheet_name, "Vehicles");
        assert_eq!(config.score_threshold, 3);
        assert!(config.write_intermediate_files);
    }
}
