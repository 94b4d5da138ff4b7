use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::exporter::Exporter;
use super::record_builder::build_records;
use super::sanitizer::Sanitizer;
use super::store::{TableSchema, VehicleStore};
use super::table_reader::{read_csv, write_csv, ExcelReader, RawTable};
use crate::models::{Config, Stage};
use crate::utils::{dataset_stem, OutputPaths};

/// 按配置的起始阶段依次执行：读取、清洗、评分入库、回读、导出
pub struct Processor {
    config: Config,
}

impl Processor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn output_paths(&self) -> Result<OutputPaths> {
        let stem = dataset_stem(&self.config.input_path)?;
        Ok(OutputPaths::new(&self.config.output_dir(), &stem))
    }

    pub fn run(&self) -> Result<PipelineSummary> {
        let start_time = Instant::now();
        let config = &self.config;
        let paths = self.output_paths()?;
        let mut summary = PipelineSummary::default();

        tracing::debug!("起始阶段: {:?}, 输入: {}", config.stage, config.input_path.display());

        let table = match config.stage {
            Stage::Convert => {
                let raw = self.convert(&paths, &mut summary)?;
                Some(self.sanitize(&raw, &paths, &mut summary)?)
            }
            Stage::Sanitize => {
                let raw = read_csv(&config.input_path)?;
                Some(self.sanitize(&raw, &paths, &mut summary)?)
            }
            Stage::Persist => Some(read_csv(&config.input_path)?),
            Stage::Export => None,
        };

        let store_path = match table {
            Some(table) => {
                self.persist(&table, &paths.store, &mut summary)?;
                paths.store.clone()
            }
            None => config.input_path.clone(),
        };

        let store = VehicleStore::open_read_only(&store_path)
            .with_context(|| format!("无法打开数据库: {}", store_path.display()))?;
        let records = store
            .fetch_all()
            .with_context(|| format!("无法读取数据库: {}", store_path.display()))?;

        let exporter = Exporter::new(config.score_threshold);
        let (json_count, xml_count) = exporter.export_all(&records, &paths.json, &paths.xml)?;
        summary.json = Some(StageOutput::written(json_count, &paths.json));
        summary.xml = Some(StageOutput::written(xml_count, &paths.xml));

        summary.elapsed_secs = start_time.elapsed().as_secs_f64();
        Ok(summary)
    }

    fn convert(&self, paths: &OutputPaths, summary: &mut PipelineSummary) -> Result<RawTable> {
        let mut reader = ExcelReader::open(&self.config.input_path)?;
        let table = reader.read_sheet(&self.config.sheet_name)?;

        let path = if self.config.write_intermediate_files {
            write_csv(&table, &paths.converted_csv)?;
            Some(paths.converted_csv.clone())
        } else {
            None
        };

        tracing::info!("已导入 {} 行", table.row_count());
        summary.imported = Some(StageOutput {
            count: table.row_count(),
            path,
        });
        Ok(table)
    }

    fn sanitize(&self, raw: &RawTable, paths: &OutputPaths, summary: &mut PipelineSummary) -> Result<RawTable> {
        let sanitized = Sanitizer::sanitize(raw)?;

        let path = if self.config.write_intermediate_files {
            write_csv(&sanitized.table, &paths.checked_csv)?;
            Some(paths.checked_csv.clone())
        } else {
            None
        };

        tracing::info!("已修正 {} 个单元格", sanitized.corrections);
        summary.corrected = Some(StageOutput {
            count: sanitized.corrections,
            path,
        });
        Ok(sanitized.table)
    }

    fn persist(&self, table: &RawTable, store_path: &Path, summary: &mut PipelineSummary) -> Result<()> {
        let schema = TableSchema::from_headers(&table.headers)?;
        let records = build_records(table)?;

        let existed = store_path.exists();
        let result = VehicleStore::open(store_path).and_then(|mut store| store.insert_all(&schema, &records));

        let inserted = match result {
            Ok(inserted) => inserted,
            Err(e) => {
                // 本次运行新建的数据库文件在失败时删除，不留下空库
                if !existed && store_path.exists() {
                    if let Err(remove_err) = fs::remove_file(store_path) {
                        tracing::warn!("无法删除数据库文件 {}: {}", store_path.display(), remove_err);
                    }
                }
                return Err(e).with_context(|| format!("写入数据库失败: {}", store_path.display()));
            }
        };

        tracing::info!("已写入 {} 条记录到: {}", inserted, store_path.display());
        summary.inserted = Some(StageOutput::written(inserted, store_path));
        Ok(())
    }
}

/// 某个阶段处理的数量及其输出文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub count: usize,
    pub path: Option<PathBuf>,
}

impl StageOutput {
    fn written(count: usize, path: &Path) -> Self {
        Self {
            count,
            path: Some(path.to_path_buf()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub imported: Option<StageOutput>,
    pub corrected: Option<StageOutput>,
    pub inserted: Option<StageOutput>,
    pub json: Option<StageOutput>,
    pub xml: Option<StageOutput>,
    pub elapsed_secs: f64,
}

impl PipelineSummary {
    pub fn total_exported(&self) -> usize {
        [&self.json, &self.xml]
            .into_iter()
            .flatten()
            .map(|o| o.count)
            .sum()
    }

    /// 面向用户的状态信息，每个已执行阶段一行
    pub fn status_lines(&self) -> Vec<String> {
        let stages = [
            (&self.imported, "行数据已导入到", "行数据已导入"),
            (&self.corrected, "个单元格已修正，结果保存到", "个单元格已修正"),
            (&self.inserted, "条记录已写入", "条记录已写入数据库"),
            (&self.json, "辆车已保存到", "辆车已导出"),
            (&self.xml, "辆车已保存到", "辆车已导出"),
        ];

        stages
            .into_iter()
            .filter_map(|(output, with_path, without_path)| {
                output.as_ref().map(|o| match &o.path {
                    Some(path) => format!("{} {} {}", o.count, with_path, path.display()),
                    None => format!("{} {}", o.count, without_path),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines() {
        let summary = PipelineSummary {
            corrected: Some(StageOutput {
                count: 2,
                path: None,
            }),
            json: Some(StageOutput::written(3, Path::new("convoy.json"))),
            xml: Some(StageOutput::written(1, Path::new("convoy.xml"))),
            ..Default::default()
        };

        assert_eq!(
            summary.status_lines(),
            vec![
                "2 个单元格已修正".to_string(),
                "3 辆车已保存到 convoy.json".to_string(),
                "1 辆车已保存到 convoy.xml".to_string(),
            ]
        );
        assert_eq!(summary.total_exported(), 4);
    }

    #[test]
    fn test_empty_summary() {
        let summary = PipelineSummary::default();
        assert!(summary.status_lines().is_empty());
        assert_eq!(summary.total_exported(), 0);
    }
}
