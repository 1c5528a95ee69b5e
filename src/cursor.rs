//! 结果游标：对语句句柄的惰性逐行迭代。

use crate::connection::Row;
use crate::exec::ExecuteError;
use crate::query::Query;
use crate::value::SqlValue;

impl Query {
    /// 先执行但不取行，便于在消费前调用 `found_rows()`。
    pub fn preexec(&mut self) -> Result<&mut Self, ExecuteError> {
        if self.stmt.is_none() {
            self.execute()?;
        }
        Ok(self)
    }

    /// 逐行迭代。首次取行时自动执行；取尽后释放语句句柄。
    pub fn rows(&mut self) -> Rows<'_> {
        Rows {
            query: self,
            done: false,
        }
    }

    /// 以配置的 id 字段值为键的逐行迭代（未配置时用 `id`）。
    pub fn keyed_rows(&mut self) -> KeyedRows<'_> {
        let id_field = self.id_field.clone().unwrap_or_else(|| "id".to_string());
        KeyedRows {
            rows: self.rows(),
            id_field,
        }
    }
}

/// `Query::rows` 的迭代器。
pub struct Rows<'q> {
    query: &'q mut Query,
    done: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Row, ExecuteError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.query.stmt.is_none() {
            if let Err(e) = self.query.execute() {
                self.done = true;
                return Some(Err(e));
            }
        }
        let fetched = match self.query.stmt.as_mut() {
            Some(stmt) => stmt.fetch_row(),
            None => {
                self.done = true;
                return None;
            }
        };
        match fetched {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                // 取尽，句柄随迭代结束释放
                self.query.stmt = None;
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(self.query.failed("fetch".to_string(), e)))
            }
        }
    }
}

/// `Query::keyed_rows` 的迭代器：(id 字段值, 行)。
pub struct KeyedRows<'q> {
    rows: Rows<'q>,
    id_field: String,
}

impl Iterator for KeyedRows<'_> {
    type Item = Result<(SqlValue, Row), ExecuteError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.rows.next()? {
            Ok(row) => {
                let key = row.get(&self.id_field).cloned().unwrap_or(SqlValue::Null);
                Some(Ok((key, row)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
