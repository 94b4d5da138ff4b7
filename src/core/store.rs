use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;

use super::error::PipelineError;
use crate::models::VehicleRecord;
use crate::utils::is_sql_identifier;

pub const TABLE_NAME: &str = "convoy";
pub const SCORE_COLUMN: &str = "score";

/// 由输入表头得到的表结构：第一列为主键，其余为非空整数列，最后追加 `score`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    primary_key: String,
    attributes: Vec<String>,
}

impl TableSchema {
    pub fn from_headers(headers: &[String]) -> Result<Self, PipelineError> {
        let Some((primary_key, attributes)) = headers.split_first() else {
            return Err(PipelineError::InvalidSchema("没有任何列".to_string()));
        };
        if attributes.is_empty() {
            return Err(PipelineError::InvalidSchema(
                "除主键外至少需要一个属性列".to_string(),
            ));
        }
        if headers.len() != VehicleRecord::FIELD_COUNT {
            return Err(PipelineError::InvalidSchema(format!(
                "应包含 {} 列，实际为 {} 列",
                VehicleRecord::FIELD_COUNT,
                headers.len()
            )));
        }

        for (i, name) in headers.iter().enumerate() {
            if !is_sql_identifier(name) {
                return Err(PipelineError::InvalidSchema(format!("非法列名: {:?}", name)));
            }
            if name.eq_ignore_ascii_case(SCORE_COLUMN) {
                return Err(PipelineError::InvalidSchema(format!(
                    "列名与评分列冲突: {}",
                    name
                )));
            }
            if headers[..i].iter().any(|prev| prev.eq_ignore_ascii_case(name)) {
                return Err(PipelineError::InvalidSchema(format!("列名重复: {}", name)));
            }
        }

        Ok(Self {
            primary_key: primary_key.clone(),
            attributes: attributes.to_vec(),
        })
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self
            .attributes
            .iter()
            .map(|col| format!("{} INTEGER NOT NULL", col))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {}({} INTEGER PRIMARY KEY, {}, {} INTEGER NOT NULL);",
            TABLE_NAME,
            self.primary_key,
            columns.join(", "),
            SCORE_COLUMN
        )
    }

    pub fn insert_sql(&self) -> String {
        let placeholders: Vec<String> = (1..=self.attributes.len() + 2)
            .map(|i| format!("?{}", i))
            .collect();

        format!("INSERT INTO {} VALUES({});", TABLE_NAME, placeholders.join(", "))
    }
}

pub struct VehicleStore {
    conn: Connection,
}

impl VehicleStore {
    /// 打开数据库文件，不存在时创建
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// 只读打开已有数据库，文件不存在时报错
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, PipelineError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// 建表（如不存在）并在同一个事务内插入全部记录，返回插入行数
    ///
    /// 任意一行失败（如主键重复）时整个事务回滚。
    pub fn insert_all(
        &mut self,
        schema: &TableSchema,
        records: &[VehicleRecord],
    ) -> Result<usize, PipelineError> {
        let tx = self.conn.transaction()?;
        tx.execute(&schema.create_table_sql(), [])?;

        let mut inserted = 0usize;
        {
            let mut stmt = tx.prepare(&schema.insert_sql())?;
            for record in records {
                inserted += stmt.execute(params![
                    record.vehicle_id,
                    record.engine_capacity,
                    record.fuel_consumption,
                    record.maximum_load,
                    record.score,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("已提交 {} 条记录", inserted);
        Ok(inserted)
    }

    /// 按主键升序读取全部记录，列按位置映射
    pub fn fetch_all(&self) -> Result<Vec<VehicleRecord>, PipelineError> {
        let sql = format!("SELECT * FROM {} ORDER BY 1;", TABLE_NAME);
        let mut stmt = self.conn.prepare(&sql)?;

        let records = stmt
            .query_map([], |row| {
                Ok(VehicleRecord {
                    vehicle_id: row.get(0)?,
                    engine_capacity: row.get(1)?,
                    fuel_consumption: row.get(2)?,
                    maximum_load: row.get(3)?,
                    score: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
