//! 连接协作者接口：语句的执行与取行由外部驱动实现。
//!
//! 本 crate 只产出 SQL 文本加参数表，消费不透明的行记录；
//! 连接池、事务与超时策略都属于实现方。

use crate::params::Params;
use crate::value::SqlValue;

/// 驱动层错误，由 `Connection` 实现方构造。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("driver: {0}")]
pub struct DriverError(pub String);

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// 一行结果，同时支持列名与下标访问。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// 按列名取值。
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|i| self.values.get(i))
    }

    /// 按下标取值。
    pub fn at(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// 数据库连接协作者。
pub trait Connection {
    /// 以绑定参数执行 SQL，返回语句句柄。
    fn query(&self, sql: &str, params: &Params) -> Result<Box<dyn Statement>, DriverError>;

    /// 最近一次 insert 产生的标识。
    fn last_insert_id(&self) -> Result<SqlValue, DriverError>;

    /// 执行并取回单个标量（`found_rows()` 回退路径使用）。
    fn scalar_query(&self, sql: &str) -> Result<SqlValue, DriverError>;
}

/// 已执行语句的句柄。
pub trait Statement {
    /// 取下一行；`None` 表示取尽。
    fn fetch_row(&mut self) -> Result<Option<Row>, DriverError>;

    fn fetch_all(&mut self) -> Result<Vec<Row>, DriverError> {
        let mut out = Vec::new();
        while let Some(row) = self.fetch_row()? {
            out.push(row);
        }
        Ok(out)
    }
}
