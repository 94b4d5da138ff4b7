use thiserror::Error;

/// 参考行程距离
pub const TRIP_DISTANCE: f64 = 450.0;

/// 行程油耗不超过该值时燃油得分为 2
pub const FUEL_LIMIT: f64 = 230.0;

/// 最大载重达到该值时载重得分为 2
pub const LOAD_THRESHOLD: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("engine_capacity 为 0，无法计算加油次数")]
    DivisionByZero,

    #[error("评分参数不能为负数")]
    NegativeInput,
}

/// 评分的各个组成部分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub trip_consumption: f64,
    pub pit_stops: u64,
    pub pit_score: u8,
    pub fuel_score: u8,
    pub load_score: u8,
}

impl ScoreBreakdown {
    pub fn compute(
        engine_capacity: i64,
        fuel_consumption: i64,
        maximum_load: i64,
    ) -> Result<Self, ScoreError> {
        if engine_capacity < 0 || fuel_consumption < 0 || maximum_load < 0 {
            return Err(ScoreError::NegativeInput);
        }
        if engine_capacity == 0 {
            return Err(ScoreError::DivisionByZero);
        }

        let trip_consumption = TRIP_DISTANCE * fuel_consumption as f64 / 100.0;
        let pit_stops = (trip_consumption / engine_capacity as f64).floor() as u64;

        // 加油次数越少得分越高
        let pit_score = match pit_stops {
            0 => 2,
            1 => 1,
            _ => 0,
        };
        let fuel_score = if trip_consumption <= FUEL_LIMIT { 2 } else { 1 };
        let load_score = if maximum_load >= LOAD_THRESHOLD { 2 } else { 0 };

        Ok(Self {
            trip_consumption,
            pit_stops,
            pit_score,
            fuel_score,
            load_score,
        })
    }

    pub fn total(&self) -> u8 {
        self.pit_score + self.fuel_score + self.load_score
    }
}

/// 计算车辆评分，结果在 1 到 6 之间
pub fn score(engine_capacity: i64, fuel_consumption: i64, maximum_load: i64) -> Result<u8, ScoreError> {
    ScoreBreakdown::compute(engine_capacity, fuel_consumption, maximum_load).map(|b| b.total())
}
