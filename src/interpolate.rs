//! 调试插值：把渲染文本中的 `:name` 占位符替换为字面量。
//!
//! 安全警告：插值文本仅用于日志与诊断展示，不得交给驱动执行；
//! 执行永远走参数绑定。

use crate::params::Params;
use crate::query::Query;
use crate::value::SqlValue;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATETIME_FMT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

impl Query {
    /// 渲染并把参数代入为字面量，便于在日志里直接阅读。
    pub fn preview(&mut self) -> String {
        let sql = self.render();
        interpolate(&sql, &self.params)
    }
}

/// 扫描 `:name`（name 取最长的 `[A-Za-z0-9_]` 段）并查表替换；
/// 未知名字原样保留。
pub(crate) fn interpolate(sql: &str, params: &Params) -> String {
    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut rest = sql;
    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];

        let end = rest
            .bytes()
            .position(|b| !(b.is_ascii_alphanumeric() || b == b'_'))
            .unwrap_or(rest.len());
        let name = &rest[..end];
        match params.get(name) {
            Some(v) if !name.is_empty() => {
                out.push_str(&literal(v));
                rest = &rest[end..];
            }
            _ => out.push(':'),
        }
    }
    out.push_str(rest);
    out
}

/// 值的 SQL 字面量形式。
pub(crate) fn literal(v: &SqlValue) -> String {
    match v {
        SqlValue::Null => "NULL".to_string(),
        SqlValue::Bool(true) => "TRUE".to_string(),
        SqlValue::Bool(false) => "FALSE".to_string(),
        SqlValue::I64(n) => n.to_string(),
        SqlValue::U64(n) => n.to_string(),
        SqlValue::F64(n) => n.to_string(),
        SqlValue::String(s) => quote_literal(s),
        SqlValue::Bytes(b) => {
            let mut hex = String::with_capacity(b.len() * 2);
            for byte in b {
                hex.push_str(&format!("{byte:02X}"));
            }
            format!("X'{hex}'")
        }
        SqlValue::DateTime(dt) => match dt.format(DATETIME_FMT) {
            Ok(s) => format!("'{s}'"),
            Err(_) => format!("'{dt}'"),
        },
    }
}

/// 单引号字符串字面量，引号按 SQL 惯例双写转义。
fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
