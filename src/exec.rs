//! 执行层：把渲染结果交给连接协作者，失败时附带完整诊断上下文。

use crate::connection::{DriverError, Row};
use crate::params::Params;
use crate::query::{Clause, Query, QueryValue, UsageError};
use crate::template::Mode;
use crate::value::SqlValue;
use tracing::{debug, warn};

/// 执行错误。
#[derive(Debug, thiserror::Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Usage(#[from] UsageError),
    /// 连接层拒绝了渲染出的语句；带上 SQL、参数、mode 与模板便于排查。
    #[error("query execution failed: {source}")]
    Failed {
        sql: String,
        params: Params,
        mode: Option<Mode>,
        template: Option<String>,
        #[source]
        source: DriverError,
    },
}

impl Query {
    /// 渲染并执行，保留语句句柄。成功后 template/mode 被清空，
    /// 查询进入 spent 状态（子句数据仍在，可继续克隆）。
    pub fn execute(&mut self) -> Result<&mut Self, ExecuteError> {
        let conn = self.connection.clone().ok_or(UsageError::NoConnection)?;
        let sql = self.render();
        debug!(sql = %sql, mode = ?self.mode, "executing query");
        match conn.query(&sql, &self.params) {
            Ok(stmt) => {
                self.stmt = Some(stmt);
                self.template = None;
                self.mode = None;
                Ok(self)
            }
            Err(source) => {
                warn!(sql = %sql, error = %source, "query failed");
                Err(self.failed(sql, source))
            }
        }
    }

    pub(crate) fn failed(&self, sql: String, source: DriverError) -> ExecuteError {
        ExecuteError::Failed {
            sql,
            params: self.params.clone(),
            mode: self.mode,
            template: self
                .template
                .clone()
                .or_else(|| self.mode.map(|m| m.template().to_string())),
            source,
        }
    }

    /// 执行 select。
    pub fn select(&mut self) -> Result<&mut Self, ExecuteError> {
        self.set_mode(Mode::Select).execute()
    }

    /// 执行 insert，返回新记录 id；设置过 ignore 插入选项时不取 id。
    pub fn insert(&mut self) -> Result<Option<SqlValue>, ExecuteError> {
        self.set_mode(Mode::Insert).execute()?;
        if self.has_insert_option("ignore") {
            return Ok(None);
        }
        let conn = self.connection.clone().ok_or(UsageError::NoConnection)?;
        let id = conn
            .last_insert_id()
            .map_err(|e| self.failed("last_insert_id".to_string(), e))?;
        Ok(Some(id))
    }

    /// 逐行 insert 多条记录，返回各自的 id。
    pub fn insert_all<I, R, S, V>(&mut self, rows: I) -> Result<Vec<Option<SqlValue>>, ExecuteError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<QueryValue>,
    {
        let mut ids = Vec::new();
        for row in rows {
            self.del(Clause::Set);
            self.set_map(row)?;
            ids.push(self.insert()?);
        }
        Ok(ids)
    }

    /// 执行 update。
    pub fn update(&mut self) -> Result<&mut Self, ExecuteError> {
        self.set_mode(Mode::Update).execute()
    }

    /// 执行 replace。
    pub fn replace(&mut self) -> Result<&mut Self, ExecuteError> {
        self.set_mode(Mode::Replace).execute()
    }

    /// 执行 delete。
    pub fn delete(&mut self) -> Result<&mut Self, ExecuteError> {
        self.set_mode(Mode::Delete).execute()
    }

    /// 执行 truncate。
    pub fn truncate(&mut self) -> Result<&mut Self, ExecuteError> {
        self.set_mode(Mode::Truncate).execute()
    }

    /// 执行（如尚未执行）并取回全部行，随后释放句柄。
    pub fn get(&mut self) -> Result<Vec<Row>, ExecuteError> {
        if self.stmt.is_none() {
            self.execute()?;
        }
        let Some(mut stmt) = self.stmt.take() else {
            return Ok(Vec::new());
        };
        stmt.fetch_all()
            .map_err(|e| self.failed("fetch_all".to_string(), e))
    }

    /// 取下一行；重复调用顺序前进。
    pub fn get_row(&mut self) -> Result<Option<Row>, ExecuteError> {
        if self.stmt.is_none() {
            self.execute()?;
        }
        let fetched = match self.stmt.as_mut() {
            Some(stmt) => stmt.fetch_row(),
            None => return Ok(None),
        };
        fetched.map_err(|e| self.failed("fetch".to_string(), e))
    }

    /// 首行首列的标量，取完释放句柄。
    pub fn get_one(&mut self) -> Result<Option<SqlValue>, ExecuteError> {
        let row = self.get_row()?;
        self.stmt = None;
        Ok(row.and_then(|r| r.at(0).cloned()))
    }

    /// 总行数。设置过 SQL_CALC_FOUND_ROWS 选项时询问连接（性能好、方言限定）；
    /// 否则克隆本查询、去掉 limit、改查 count(*)（可移植的回退路径）。
    pub fn found_rows(&mut self) -> Result<i64, ExecuteError> {
        if self.has_option("SQL_CALC_FOUND_ROWS") {
            let conn = self.connection.clone().ok_or(UsageError::NoConnection)?;
            let v = conn
                .scalar_query("select found_rows()")
                .map_err(|e| self.failed("select found_rows()".to_string(), e))?;
            return Ok(v.as_i64().unwrap_or(0));
        }
        let mut counter = self.clone();
        counter.del(Clause::Limit);
        let mut counter = counter.field_query("count(*)");
        let v = counter.get_one()?;
        Ok(v.and_then(|v| v.as_i64()).unwrap_or(0))
    }
}
