//! 渲染：模板展开、各子句渲染器、嵌套表达式的消费与标识符引用。
//!
//! `render()` 是唯一的顶层入口；嵌套查询一律经由 `render_into` 写入外层的
//! 参数收集器，自身状态在渲染过程中不被触碰。

use crate::interpolate::literal;
use crate::params::Params;
use crate::query::{MainTable, Query, QueryValue, TableEntry, Term};
use crate::string_builder::join_nonempty;
use crate::template;
use crate::template::Mode;
use crate::value::SqlValue;

impl Query {
    /// 渲染当前查询。参数表先重置为 extra params，再在展开过程中填充；
    /// 不改动子句数据，重复调用得到相同结果。
    pub fn render(&mut self) -> String {
        let mut params = Params::new(self.param_base.as_str());
        for (k, v) in &self.extra_params {
            params.insert(k.clone(), v.clone());
        }
        let sql = self.render_into(&mut params);
        self.params = params;
        sql
    }

    /// 纯渲染：占位符写入外部收集器，`self` 保持原样。
    pub(crate) fn render_into(&self, params: &mut Params) -> String {
        let template = match (&self.template, self.mode) {
            (Some(t), _) => t.clone(),
            (None, Some(m)) => m.template().to_string(),
            (None, None) => Mode::Select.template().to_string(),
        };
        let expanded = template::expand(&template, |token| self.render_token(token, params));
        template::tidy(&expanded)
    }

    /// 无 mode 也无模板覆盖的查询按 select 渲染。
    pub(crate) fn is_select(&self) -> bool {
        matches!(self.mode, Some(Mode::Select)) || (self.mode.is_none() && self.template.is_none())
    }

    /// token 解析顺序：自定义覆盖 → 内建渲染器 → 原样保留。
    fn render_token(&self, token: &str, params: &mut Params) -> Option<String> {
        if let Some((_, v)) = self.clauses.custom.iter().find(|(t, _)| t.as_str() == token) {
            return Some(self.consume_custom(v, params));
        }
        Some(match token {
            "table" => self.render_table(params),
            "table_noalias" => self.render_table_noalias(params),
            "from" => self.render_from(),
            "field" => self.render_field(params),
            "join" => self.render_join(params),
            "where" => self.render_where(params),
            "orwhere" => self.render_condition_list(&self.clauses.where_, " or ", params),
            "andwhere" => self.render_condition_list(&self.clauses.where_, " and ", params),
            "having" => self.render_having(params),
            "group" => self.render_group(params),
            "order" => self.render_order(params),
            "limit" => self.render_limit(),
            "options" => self.clauses.options.join(" "),
            "options_insert" => self.clauses.options_insert.join(" "),
            "options_replace" => self.clauses.options_replace.join(" "),
            "set" => self.render_set(params),
            "set_fields" => self.render_set_fields(params),
            "set_values" => self.render_set_values(params),
            "args" => self.render_args(params),
            "fx" => self.clauses.fx.clone().unwrap_or_default(),
            _ => return None,
        })
    }

    // ---- 消费与引用 ----

    /// 嵌套查询渲染进共享收集器；select 结果加括号。
    pub(crate) fn consume_query(&self, q: &Query, params: &mut Params) -> String {
        let sql = q.render_into(params);
        if q.is_select() { format!("({sql})") } else { sql }
    }

    pub(crate) fn consume_term(&self, t: &Term, params: &mut Params) -> String {
        match t {
            Term::Ident(s) => self.quote_ident(s),
            Term::Expr(q) => self.consume_query(q, params),
        }
    }

    /// 自定义 token 的值：字符串原样拼入，表达式正常消费。
    fn consume_custom(&self, v: &QueryValue, params: &mut Params) -> String {
        match v {
            QueryValue::None => String::new(),
            QueryValue::Value(v) => raw_text(v),
            QueryValue::List(items) => {
                let parts: Vec<String> = items.iter().map(raw_text).collect();
                parts.join(",")
            }
            QueryValue::Query(q) => self.consume_query(q, params),
        }
    }

    /// 给标识符加引用字符。透传场景：引用关闭、`*`、点号限定、
    /// 函数调用（含 `(`）以及已经带引用字符的输入。
    pub(crate) fn quote_ident(&self, s: &str) -> String {
        let Some(q) = self.quote else {
            return s.to_string();
        };
        if s.is_empty() || s == "*" || s.contains('.') || s.contains('(') || s.contains(q) {
            return s.to_string();
        }
        format!("{q}{s}{q}")
    }

    /// `a.b` 形式逐段引用。
    pub(crate) fn quote_dotted(&self, s: &str) -> String {
        if s.contains('.') {
            s.split('.')
                .map(|p| self.quote_ident(p))
                .collect::<Vec<_>>()
                .join(".")
        } else {
            self.quote_ident(s)
        }
    }

    // ---- 各 token 渲染器 ----

    fn render_table(&self, params: &mut Params) -> String {
        let mut parts = Vec::new();
        for entry in &self.clauses.table {
            let rendered = match entry {
                TableEntry::Name { name, alias } => {
                    let mut t = self.quote_ident(name);
                    if let Some(a) = alias {
                        t.push(' ');
                        t.push_str(&self.quote_ident(a));
                    }
                    t
                }
                TableEntry::Query { query, alias } => {
                    // SQL_CALC_FOUND_ROWS 只对最外层查询有意义，子查询表源渲染前剥掉
                    let consumed = if query.has_option("SQL_CALC_FOUND_ROWS") {
                        let mut stripped = query.clone();
                        stripped
                            .clauses
                            .options
                            .retain(|o| !o.eq_ignore_ascii_case("SQL_CALC_FOUND_ROWS"));
                        self.consume_query(&stripped, params)
                    } else {
                        self.consume_query(query, params)
                    };
                    format!("{consumed} {}", self.quote_ident(alias))
                }
            };
            parts.push(rendered);
        }
        parts.join(",")
    }

    fn render_table_noalias(&self, params: &mut Params) -> String {
        let mut parts = Vec::new();
        for entry in &self.clauses.table {
            parts.push(match entry {
                TableEntry::Name { name, .. } => self.quote_ident(name),
                TableEntry::Query { query, .. } => self.consume_query(query, params),
            });
        }
        parts.join(", ")
    }

    fn render_from(&self) -> String {
        if self.clauses.table.is_empty() {
            String::new()
        } else {
            "from".to_string()
        }
    }

    fn render_field(&self, params: &mut Params) -> String {
        if self.clauses.fields.is_empty() {
            return self.default_field.clone();
        }
        let mut parts = Vec::new();
        for entry in &self.clauses.fields {
            let mut f = self.consume_term(&entry.expr, params);
            if let Some(t) = &entry.table {
                f = format!("{}.{f}", self.quote_ident(t));
            }
            // 与字段同名的别名没有意义，丢弃
            let redundant = matches!(&entry.expr, Term::Ident(n) if Some(n) == entry.alias.as_ref());
            if let Some(a) = &entry.alias {
                if !redundant {
                    f.push(' ');
                    f.push_str(&self.quote_ident(a));
                }
            }
            parts.push(f);
        }
        parts.join(",")
    }

    fn render_join(&self, params: &mut Params) -> String {
        let mut parts = Vec::new();
        for j in &self.clauses.join {
            let mut s = format!("{} join {}", j.kind.as_str(), self.quote_ident(&j.foreign_table));
            if let Some(a) = &j.alias {
                s.push_str(" as ");
                s.push_str(&self.quote_ident(a));
            }
            s.push_str(" on ");
            match &j.on_expr {
                Some(e) => s.push_str(&self.consume_query(e, params)),
                None => {
                    let left_table = j.alias.as_deref().unwrap_or(&j.foreign_table);
                    let left = format!(
                        "{}.{}",
                        self.quote_ident(left_table),
                        self.quote_ident(&j.foreign_field)
                    );
                    let master_table = j.master_table.clone().or_else(|| match &self.main_table {
                        MainTable::Single(t) => Some(t.clone()),
                        _ => None,
                    });
                    let right = match master_table {
                        Some(t) => format!(
                            "{}.{}",
                            self.quote_ident(&t),
                            self.quote_ident(&j.master_field)
                        ),
                        None => self.quote_ident(&j.master_field),
                    };
                    s.push_str(&format!("{left} = {right}"));
                }
            }
            parts.push(s);
        }
        parts.join(" ")
    }

    fn render_where(&self, params: &mut Params) -> String {
        if self.clauses.where_.is_empty() {
            return String::new();
        }
        format!(
            "where {}",
            self.render_condition_list(&self.clauses.where_, " and ", params)
        )
    }

    fn render_having(&self, params: &mut Params) -> String {
        if self.clauses.having.is_empty() {
            return String::new();
        }
        format!(
            "having {}",
            self.render_condition_list(&self.clauses.having, " and ", params)
        )
    }

    fn render_group(&self, params: &mut Params) -> String {
        if self.clauses.group.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self
            .clauses
            .group
            .iter()
            .map(|t| self.consume_term(t, params))
            .collect();
        format!("group by {}", parts.join(", "))
    }

    /// 收集到的排序项整体反转后输出：先声明的项成为第一排序键。
    fn render_order(&self, params: &mut Params) -> String {
        if self.clauses.order.is_empty() {
            return String::new();
        }
        let mut parts: Vec<String> = self
            .clauses
            .order
            .iter()
            .map(|o| {
                let t = match &o.term {
                    Term::Ident(s) => self.quote_dotted(s),
                    Term::Expr(q) => self.consume_query(q, params),
                };
                if o.desc { format!("{t} desc") } else { t }
            })
            .collect();
        parts.reverse();
        format!("order by {}", parts.join(", "))
    }

    fn render_limit(&self) -> String {
        match &self.clauses.limit {
            Some(l) => format!("limit {}, {}", l.offset, l.count),
            None => String::new(),
        }
    }

    fn render_set(&self, params: &mut Params) -> String {
        let parts: Vec<String> = self
            .clauses
            .set
            .iter()
            .map(|(field, value)| {
                format!(
                    "{}={}",
                    self.quote_ident(field),
                    self.render_set_value(value, params)
                )
            })
            .collect();
        parts.join(", ")
    }

    fn render_set_fields(&self, _params: &mut Params) -> String {
        let parts: Vec<String> = self
            .clauses
            .set
            .iter()
            .map(|(field, _)| self.quote_ident(field))
            .collect();
        parts.join(",")
    }

    fn render_set_values(&self, params: &mut Params) -> String {
        let parts: Vec<String> = self
            .clauses
            .set
            .iter()
            .map(|(_, value)| self.render_set_value(value, params))
            .collect();
        parts.join(",")
    }

    fn render_set_value(&self, value: &QueryValue, params: &mut Params) -> String {
        match value {
            QueryValue::Query(q) => self.consume_query(q, params),
            QueryValue::Value(v) => params.push(v.clone()),
            // set() 入口已拒绝 None 与 List
            QueryValue::None | QueryValue::List(_) => String::new(),
        }
    }

    fn render_args(&self, params: &mut Params) -> String {
        let parts: Vec<String> = self
            .clauses
            .args
            .iter()
            .map(|a| match a {
                QueryValue::None => String::new(),
                QueryValue::Value(v) => params.push(v.clone()),
                QueryValue::List(items) => params.push_list(items.clone()).join(", "),
                QueryValue::Query(q) => self.consume_query(q, params),
            })
            .collect();
        join_nonempty(&parts, ", ")
    }
}

/// 自定义 token 中标量值的原样文本。
fn raw_text(v: &SqlValue) -> String {
    match v {
        SqlValue::Null => String::new(),
        SqlValue::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        SqlValue::I64(n) => n.to_string(),
        SqlValue::U64(n) => n.to_string(),
        SqlValue::F64(n) => n.to_string(),
        SqlValue::String(s) => s.to_string(),
        other => literal(other),
    }
}
