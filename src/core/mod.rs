mod error;
mod exporter;
mod processor;
mod record_builder;
mod sanitizer;
pub mod scoring;
mod store;
mod table_reader;

pub use error::PipelineError;
pub use exporter::{render_json, render_xml, ExportFormat, Exporter, DEFAULT_SCORE_THRESHOLD};
pub use processor::{PipelineSummary, Processor, StageOutput};
pub use record_builder::build_records;
pub use sanitizer::{SanitizedTable, Sanitizer};
pub use store::{TableSchema, VehicleStore, SCORE_COLUMN, TABLE_NAME};
pub use table_reader::{read_csv, write_csv, ExcelReader, RawTable};
