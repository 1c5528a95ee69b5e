//! dynsql：模板驱动的动态 SQL 构建、参数收集与执行库。
//!
//! 核心是单一的 [`Query`] 构建器：链式累积子句，按语句模板渲染成
//! `SQL 文本 + 参数表`，可选地经由注入的连接协作者执行并逐行迭代。
//! 带模板覆盖的 Query 同时充当表达式节点，支持子查询与 OR/AND
//! 分组的递归组合。

pub mod condition;
#[cfg(test)]
mod condition_tests;
pub mod connection;
pub mod cursor;
#[cfg(test)]
mod cursor_tests;
pub mod exec;
pub mod interpolate;
#[cfg(test)]
mod interpolate_tests;
pub mod macros;
pub use crate::macros::*;
pub mod params;
#[cfg(test)]
mod params_tests;
pub mod query;
#[cfg(test)]
mod query_tests;
pub mod render;
pub mod string_builder;
pub mod template;
pub mod value;

pub use crate::condition::OrItem;
pub use crate::connection::{Connection, DriverError, Row, Statement};
pub use crate::cursor::{KeyedRows, Rows};
pub use crate::exec::ExecuteError;
pub use crate::params::Params;
pub use crate::query::{Clause, JoinKind, MainTable, Query, QueryValue, Term, UsageError};
pub use crate::template::Mode;
pub use crate::value::SqlValue;
