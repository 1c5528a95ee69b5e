//! 条件构建：where/having 的形态归一化、操作符后缀解析与渲染。

use crate::params::Params;
use crate::query::{MainTable, Query, QueryValue, Term};
use crate::string_builder::join_nonempty;
use crate::template::Mode;
use crate::value::SqlValue;

/// 一条 where/having 条目，归一化成 {字段, 条件, 值} 三元组。
#[derive(Debug, Clone)]
pub(crate) struct Condition {
    pub field: Term,
    pub cond: Option<String>,
    pub value: QueryValue,
}

/// `where_any` 的成员：原样片段、表达式节点或 (字段, [条件,] 值) 元组。
#[derive(Debug, Clone)]
pub enum OrItem {
    Raw(String),
    Expr(Query),
    Pair(String, QueryValue),
    Triple(String, String, QueryValue),
}

impl From<&str> for OrItem {
    fn from(v: &str) -> Self {
        Self::Raw(v.to_string())
    }
}

impl From<String> for OrItem {
    fn from(v: String) -> Self {
        Self::Raw(v)
    }
}

impl From<Query> for OrItem {
    fn from(v: Query) -> Self {
        Self::Expr(v)
    }
}

impl<V: Into<QueryValue>> From<(&str, V)> for OrItem {
    fn from((field, value): (&str, V)) -> Self {
        Self::Pair(field.to_string(), value.into())
    }
}

impl<V: Into<QueryValue>> From<(&str, &str, V)> for OrItem {
    fn from((field, cond, value): (&str, &str, V)) -> Self {
        Self::Triple(field.to_string(), cond.to_string(), value.into())
    }
}

impl Query {
    /// 添加条件，条件按值的形态缺省：列表或 select 子查询用 `in`，否则 `=`。
    /// 字段串尾部可以携带操作符：`"id>"`、`"age >="`、`"name like"`。
    pub fn where_(&mut self, field: impl Into<Term>, value: impl Into<QueryValue>) -> &mut Self {
        let c = normalize(field.into(), None, value.into());
        self.clauses.where_.push(c);
        self
    }

    /// 显式给出条件：`where_cond("id", ">", 5)`。
    pub fn where_cond(
        &mut self,
        field: impl Into<Term>,
        cond: &str,
        value: impl Into<QueryValue>,
    ) -> &mut Self {
        let c = normalize(field.into(), Some(cond.to_string()), value.into());
        self.clauses.where_.push(c);
        self
    }

    /// 自含的布尔 SQL 片段：`where_raw("a is null")`。注意自行转义。
    pub fn where_raw(&mut self, chunk: impl Into<String>) -> &mut Self {
        self.where_expr(Query::expr(chunk))
    }

    /// 表达式节点作为条件。
    pub fn where_expr(&mut self, expr: Query) -> &mut Self {
        self.clauses.where_.push(Condition {
            field: Term::Expr(expr),
            cond: None,
            value: QueryValue::None,
        });
        self
    }

    /// OR 分组：每个成员递归归一化后并入一个 `([orwhere])` 表达式，
    /// 整组作为单条条目存储。
    pub fn where_any<I, T>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OrItem>,
    {
        let mut or = self.or_expr();
        for item in items {
            match item.into() {
                OrItem::Raw(s) => {
                    or.where_expr(Query::expr(s));
                }
                OrItem::Expr(q) => {
                    or.where_expr(q);
                }
                OrItem::Pair(f, v) => {
                    or.where_(f.as_str(), v);
                }
                OrItem::Triple(f, c, v) => {
                    or.where_cond(f.as_str(), &c, v);
                }
            }
        }
        self.where_expr(or)
    }

    /// 与 `where_` 同语法的 having 条件。
    pub fn having(&mut self, field: impl Into<Term>, value: impl Into<QueryValue>) -> &mut Self {
        let c = normalize(field.into(), None, value.into());
        self.clauses.having.push(c);
        self
    }

    pub fn having_cond(
        &mut self,
        field: impl Into<Term>,
        cond: &str,
        value: impl Into<QueryValue>,
    ) -> &mut Self {
        let c = normalize(field.into(), Some(cond.to_string()), value.into());
        self.clauses.having.push(c);
        self
    }

    pub fn having_expr(&mut self, expr: Query) -> &mut Self {
        self.clauses.having.push(Condition {
            field: Term::Expr(expr),
            cond: None,
            value: QueryValue::None,
        });
        self
    }

    pub(crate) fn render_condition_list(
        &self,
        list: &[Condition],
        joiner: &str,
        params: &mut Params,
    ) -> String {
        let parts: Vec<String> = list
            .iter()
            .map(|c| self.render_condition(c, params))
            .collect();
        join_nonempty(&parts, joiner)
    }

    fn render_condition(&self, c: &Condition, params: &mut Params) -> String {
        let field_sql = match &c.field {
            Term::Expr(q) => self.consume_query(q, params),
            Term::Ident(name) => self.qualify_where_field(name),
        };

        // 条件与值都没有：字段本身就是自含的布尔片段
        if c.cond.is_none() && matches!(c.value, QueryValue::None) {
            return field_sql;
        }

        let mut cond = match &c.cond {
            Some(cond) => cond.trim().to_ascii_lowercase(),
            None => match &c.value {
                QueryValue::List(_) => "in".to_string(),
                QueryValue::Query(q) if q.is_select() => "in".to_string(),
                _ => "=".to_string(),
            },
        };
        let mut value = c.value.clone();

        // NULL 值：改写相等与否定拼写
        if let QueryValue::Value(SqlValue::Null) = value {
            if cond == "=" {
                cond = "is".to_string();
            } else if matches!(cond.as_str(), "!=" | "<>" | "not") {
                cond = "is not".to_string();
            }
        }

        // in/not in 下的逗号分隔字符串展开为列表
        if cond == "in" || cond == "not in" {
            if let QueryValue::Value(SqlValue::String(s)) = &value {
                value = QueryValue::List(
                    s.split(',')
                        .map(|p| SqlValue::from(p.trim().to_string()))
                        .collect(),
                );
            }
        }

        match value {
            QueryValue::List(items) => {
                let cond = if matches!(cond.as_str(), "!=" | "<>" | "not" | "not in") {
                    "not in"
                } else {
                    "in"
                };
                let tokens = params.push_list(items);
                format!("{field_sql} {cond} ({})", tokens.join(","))
            }
            QueryValue::Query(q) => {
                format!("{field_sql} {cond} {}", self.consume_query(&q, params))
            }
            QueryValue::Value(v) => format!("{field_sql} {cond} {}", params.push(v)),
            QueryValue::None => field_sql,
        }
    }

    /// 裸标识符字段在已知单一主表的非 delete 语句中补全表前缀；
    /// delete 模板不带别名，字段保持未限定形式。
    fn qualify_where_field(&self, name: &str) -> String {
        if let Some((t, f)) = name.split_once('.') {
            if self.mode == Some(Mode::Delete) {
                return self.quote_ident(f);
            }
            return format!("{}.{}", self.quote_ident(t), self.quote_ident(f));
        }
        let plain = name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        match (&self.main_table, self.mode) {
            (MainTable::Single(t), mode) if plain && mode != Some(Mode::Delete) => {
                format!("{}.{}", self.quote_ident(t), self.quote_ident(name))
            }
            _ => self.quote_ident(name),
        }
    }
}

fn normalize(field: Term, cond: Option<String>, value: QueryValue) -> Condition {
    match field {
        Term::Expr(_) => Condition { field, cond, value },
        Term::Ident(name) => {
            if is_plain_field(&name) {
                return Condition {
                    field: Term::Ident(name),
                    cond,
                    value,
                };
            }
            match split_operator(&name) {
                Some((head, op)) => Condition {
                    field: Term::Ident(head),
                    cond: cond.or(Some(op)),
                    value,
                },
                None => {
                    // 带非标识符字符且无尾部操作符：整体按原样表达式处理
                    let has_value = !matches!(value, QueryValue::None);
                    Condition {
                        field: Term::Expr(Query::expr(name)),
                        cond: cond.or(if has_value { Some("=".to_string()) } else { None }),
                        value,
                    }
                }
            }
        }
    }
}

fn is_plain_field(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.')
}

/// 剥离字段串尾部的操作符：符号形式（`<>!=` 的组合）或
/// 单词形式（not/is/in/like 的组合，如 `is not`、`not in`）。
/// 头部允许任何不含空格与操作符字符的片段（如 `length(x)>`）。
fn split_operator(s: &str) -> Option<(String, String)> {
    let t = s.trim_end();

    let sym_len = t
        .chars()
        .rev()
        .take_while(|c| matches!(c, '<' | '>' | '!' | '='))
        .count();
    if sym_len > 0 {
        let head = t[..t.len() - sym_len].trim_end();
        if head_ok(head) {
            return Some((head.to_string(), t[t.len() - sym_len..].to_string()));
        }
        return None;
    }

    let mut words: Vec<&str> = t.split_whitespace().collect();
    let mut ops: Vec<String> = Vec::new();
    while let Some(last) = words.last() {
        let lower = last.to_ascii_lowercase();
        if matches!(lower.as_str(), "not" | "is" | "in" | "like") {
            ops.push(lower);
            words.pop();
        } else {
            break;
        }
    }
    if ops.is_empty() || words.len() != 1 || !head_ok(words[0]) {
        return None;
    }
    ops.reverse();
    Some((words[0].to_string(), ops.join(" ")))
}

fn head_ok(s: &str) -> bool {
    !s.is_empty() && !s.contains([' ', '<', '>', '!', '='])
}
