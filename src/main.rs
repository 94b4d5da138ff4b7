use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use convoy_scorer::core::{Processor, DEFAULT_SCORE_THRESHOLD};
use convoy_scorer::models::{Config, Stage};

#[derive(Parser)]
#[command(name = "convoy-scorer", version, about = "车队数据清洗、评分与导出工具")]
struct Cli {
    /// 输入文件：.xlsx、.csv、[CHECKED].csv 或 .s3db
    input: PathBuf,

    /// 输出目录，默认与输入文件同目录
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Excel 工作表名称
    #[arg(long, default_value = "Vehicles")]
    sheet: String,

    /// 起始阶段，默认按文件名推断
    #[arg(long, value_enum)]
    stage: Option<Stage>,

    /// 不写出中间 CSV 文件
    #[arg(long)]
    no_intermediate: bool,

    /// 评分高于该值导出到 JSON，否则导出到 XML
    #[arg(long, default_value_t = DEFAULT_SCORE_THRESHOLD)]
    threshold: u8,
}

impl Cli {
    fn into_config(self) -> Config {
        let stage = self.stage.unwrap_or_else(|| Stage::infer(&self.input));
        Config {
            input_path: self.input,
            output_dir: self.output_dir,
            sheet_name: self.sheet,
            stage,
            write_intermediate_files: !self.no_intermediate,
            score_threshold: self.threshold,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::parse().into_config();

    match Processor::new(config).run() {
        Ok(summary) => {
            for line in summary.status_lines() {
                println!("{}", line);
            }
            tracing::debug!("处理耗时 {:.2} 秒", summary.elapsed_secs);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("处理失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
