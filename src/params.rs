//! Params：渲染期间的占位符收集器。
//!
//! 每个字面量在渲染时换成一个唯一命名的占位符（`:a`、`:a_2`…），值记录在
//! 这张表里，最终与 SQL 文本一起交给连接层绑定。嵌套表达式渲染时写入的是
//! 外层的同一张表，因此占位符名在一次顶层渲染内全局唯一。

use crate::value::SqlValue;
use std::collections::BTreeMap;

/// 占位符 → 值 的参数表。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    base: String,
    map: BTreeMap<String, SqlValue>,
}

impl Params {
    /// 创建空参数表；`base` 为生成占位符名的前缀。
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            map: BTreeMap::new(),
        }
    }

    /// 手工登记一个命名参数（对应查询上的 extra params）。
    pub fn insert(&mut self, name: impl Into<String>, value: SqlValue) {
        self.map.insert(name.into(), value);
    }

    /// 把字面量转成唯一占位符并记录，返回 `:name` 形式的 token。
    pub fn push(&mut self, value: SqlValue) -> String {
        let name = self.unique_name();
        let token = format!(":{name}");
        self.map.insert(name, value);
        token
    }

    /// 逐元素 push 一组值。
    pub fn push_list(&mut self, values: impl IntoIterator<Item = SqlValue>) -> Vec<String> {
        values.into_iter().map(|v| self.push(v)).collect()
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.map.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 生成未被占用的占位符名：前缀本身，冲突时追加 `_2`、`_3`…。
    fn unique_name(&self) -> String {
        let mut desired: String = self
            .base
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        if desired.is_empty() {
            desired.push('a');
        }
        if !self.map.contains_key(&desired) {
            return desired;
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{desired}_{n}");
            if !self.map.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}
