use serde::Serialize;

/// 一辆车的清洗后数据及其评分
///
/// 序列化时只输出四个原始字段，`score` 不出现在导出文件中。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub vehicle_id: i64,
    pub engine_capacity: i64,
    pub fuel_consumption: i64,
    pub maximum_load: i64,
    #[serde(skip)]
    pub score: u8,
}

impl VehicleRecord {
    pub const FIELD_NAMES: [&'static str; 4] = [
        "vehicle_id",
        "engine_capacity",
        "fuel_consumption",
        "maximum_load",
    ];

    pub const FIELD_COUNT: usize = Self::FIELD_NAMES.len();
}
