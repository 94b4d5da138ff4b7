use thiserror::Error;

/// 流水线中的致命错误，任何一个都会终止后续阶段
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("表格为空：缺少表头行")]
    EmptyTable,

    #[error("第 {row} 行列数不符：应为 {expected} 列，实际为 {found} 列")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("第 {row} 行 `{column}` 列无法解析为整数: {value:?}")]
    ParseCell {
        row: usize,
        column: String,
        value: String,
    },

    #[error("车辆 {vehicle_id} 的 engine_capacity 为 0，无法计算评分")]
    ZeroEngineCapacity { vehicle_id: i64 },

    #[error("车辆 {vehicle_id} 的评分参数为负数")]
    NegativeValue { vehicle_id: i64 },

    #[error("车辆编号 {vehicle_id} 重复：第 {first_row} 行与第 {row} 行")]
    DuplicateVehicleId {
        vehicle_id: i64,
        first_row: usize,
        row: usize,
    },

    #[error("无效的表结构: {0}")]
    InvalidSchema(String),

    #[error("数据库操作失败")]
    Store(#[from] rusqlite::Error),

    #[error("JSON 序列化失败")]
    Json(#[from] serde_json::Error),

    #[error("文件读写失败")]
    Io(#[from] std::io::Error),

    #[error("导出失败: {0}")]
    Export(String),
}
