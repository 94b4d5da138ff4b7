use anyhow::{Context, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use super::error::PipelineError;
use crate::models::VehicleRecord;

/// JSON 取 `score > 阈值`，XML 取 `score <= 阈值`
pub const DEFAULT_SCORE_THRESHOLD: u8 = 3;

const ROOT_ELEMENT: &str = "convoy";
const VEHICLE_ELEMENT: &str = "vehicle";
const INDENT: usize = 4;

/// 空分区固定输出开闭两个标签，不使用自闭合形式
const EMPTY_XML: &str = "<convoy>\n</convoy>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Xml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }

    pub fn selects(self, score: u8, threshold: u8) -> bool {
        match self {
            Self::Json => score > threshold,
            Self::Xml => score <= threshold,
        }
    }

    pub fn render(self, vehicles: &[&VehicleRecord]) -> Result<String, PipelineError> {
        match self {
            Self::Json => render_json(vehicles),
            Self::Xml => render_xml(vehicles),
        }
    }
}

#[derive(Serialize)]
struct ConvoyDocument<'a> {
    convoy: &'a [&'a VehicleRecord],
}

pub fn render_json(vehicles: &[&VehicleRecord]) -> Result<String, PipelineError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);

    ConvoyDocument { convoy: vehicles }.serialize(&mut serializer)?;

    String::from_utf8(buf).map_err(|e| PipelineError::Export(e.to_string()))
}

pub fn render_xml(vehicles: &[&VehicleRecord]) -> Result<String, PipelineError> {
    if vehicles.is_empty() {
        return Ok(EMPTY_XML.to_string());
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;

    for vehicle in vehicles {
        writer.write_event(Event::Start(BytesStart::new(VEHICLE_ELEMENT)))?;

        let values = [
            vehicle.vehicle_id.to_string(),
            vehicle.engine_capacity.to_string(),
            vehicle.fuel_consumption.to_string(),
            vehicle.maximum_load.to_string(),
        ];
        for (name, value) in VehicleRecord::FIELD_NAMES.iter().zip(&values) {
            writer.write_event(Event::Start(BytesStart::new(*name)))?;
            writer.write_event(Event::Text(BytesText::new(value)))?;
            writer.write_event(Event::End(BytesEnd::new(*name)))?;
        }

        writer.write_event(Event::End(BytesEnd::new(VEHICLE_ELEMENT)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| PipelineError::Export(e.to_string()))
}

/// 按评分阈值把记录分到 JSON 或 XML 中的一个
pub struct Exporter {
    threshold: u8,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_THRESHOLD)
    }
}

impl Exporter {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn partition<'a>(&self, format: ExportFormat, records: &'a [VehicleRecord]) -> Vec<&'a VehicleRecord> {
        records
            .iter()
            .filter(|r| format.selects(r.score, self.threshold))
            .collect()
    }

    /// 返回渲染结果和导出的车辆数
    pub fn render(&self, format: ExportFormat, records: &[VehicleRecord]) -> Result<(String, usize), PipelineError> {
        let selected = self.partition(format, records);
        let content = format.render(&selected)?;
        Ok((content, selected.len()))
    }

    /// 并行渲染两种格式，先写入临时文件再重命名，返回 (JSON 数量, XML 数量)
    ///
    /// 任一文件写入失败时两个输出文件都不会留下。
    pub fn export_all(&self, records: &[VehicleRecord], json_path: &Path, xml_path: &Path) -> Result<(usize, usize)> {
        let (json, xml) = rayon::join(
            || self.render(ExportFormat::Json, records),
            || self.render(ExportFormat::Xml, records),
        );
        let (json_content, json_count) = json?;
        let (xml_content, xml_count) = xml?;

        let json_file = stage_output(json_path, &json_content)?;
        let xml_file = stage_output(xml_path, &xml_content)?;

        json_file
            .persist(json_path)
            .with_context(|| format!("无法保存文件: {}", json_path.display()))?;
        if let Err(e) = xml_file.persist(xml_path) {
            if let Err(remove_err) = fs::remove_file(json_path) {
                tracing::warn!("无法删除文件 {}: {}", json_path.display(), remove_err);
            }
            return Err(e.error).with_context(|| format!("无法保存文件: {}", xml_path.display()));
        }

        tracing::info!("已导出 {} 辆车到: {}", json_count, json_path.display());
        tracing::info!("已导出 {} 辆车到: {}", xml_count, xml_path.display());
        Ok((json_count, xml_count))
    }
}

/// 在目标目录中写好临时文件，等待重命名
fn stage_output(path: &Path, content: &str) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("无法创建临时文件: {}", dir.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("无法写入文件: {}", path.display()))?;
    Ok(file)
}
