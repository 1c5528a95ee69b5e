//! Query：积累子句、渲染 SQL、可选执行的核心构建器。
//!
//! 同一个类型也承担表达式节点的角色：带模板覆盖的 Query 就是一段可嵌入
//! 其它查询的 SQL 片段（子查询、OR 分组、计算字段）。

use crate::condition::Condition;
use crate::connection::{Connection, Statement};
use crate::params::Params;
use crate::template::Mode;
use crate::value::SqlValue;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// 使用错误：链式调用阶段立即抛出的编程误用。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("query sub-query table requires an alias")]
    SubQueryAliasRequired,
    #[error("query uses multiple tables, a single table is required here")]
    MultipleTables,
    #[error("query has no table")]
    NoTable,
    #[error("query value `false` is not supported by SQL, field {0}")]
    BooleanSetValue(String),
    #[error("query list value is not supported by set(), field {0}")]
    ListSetValue(String),
    #[error("query set() requires a value, field {0}")]
    SetWithoutValue(String),
    #[error("query invalid ordering keyword: {0}")]
    BadOrderKeyword(String),
    #[error("query is not linked to a connection")]
    NoConnection,
}

/// 可嵌入字段/表达式位置的项：裸标识符或子表达式。
#[derive(Debug, Clone)]
pub enum Term {
    Ident(String),
    Expr(Query),
}

impl From<&str> for Term {
    fn from(v: &str) -> Self {
        Self::Ident(v.to_string())
    }
}

impl From<String> for Term {
    fn from(v: String) -> Self {
        Self::Ident(v)
    }
}

impl From<Query> for Term {
    fn from(v: Query) -> Self {
        Self::Expr(v)
    }
}

/// 值位置的项。`None` 是“未提供值”哨兵，与 SQL `NULL` 是两回事。
#[derive(Debug, Clone, Default)]
pub enum QueryValue {
    #[default]
    None,
    Value(SqlValue),
    List(Vec<SqlValue>),
    Query(Box<Query>),
}

impl From<SqlValue> for QueryValue {
    fn from(v: SqlValue) -> Self {
        Self::Value(v)
    }
}

impl From<Query> for QueryValue {
    fn from(v: Query) -> Self {
        Self::Query(Box::new(v))
    }
}

impl<T: Into<SqlValue>> From<Vec<T>> for QueryValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

macro_rules! query_value_from_scalar {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for QueryValue {
            fn from(v: $t) -> Self {
                Self::Value(v.into())
            }
        })+
    };
}

query_value_from_scalar!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    String,
    &'static str,
    time::OffsetDateTime
);

impl<T> From<Option<T>> for QueryValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        Self::Value(SqlValue::from_option(v))
    }
}

/// 主表跟踪：未设置 / 单表 / 多表哨兵。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MainTable {
    #[default]
    Unset,
    Single(String),
    Multiple,
}

/// join 类型，缺省 left。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Left,
    Inner,
    Right,
    Full,
}

impl JoinKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Inner => "inner",
            Self::Right => "right",
            Self::Full => "full",
        }
    }
}

/// 可被 `del()` 清空的子句名。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Table,
    Fields,
    Where,
    Having,
    Join,
    Group,
    Order,
    Limit,
    Set,
    Options,
    OptionsInsert,
    OptionsReplace,
    Args,
    Custom,
}

#[derive(Debug, Clone)]
pub(crate) enum TableEntry {
    Name {
        name: String,
        alias: Option<String>,
    },
    Query {
        query: Query,
        alias: String,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct FieldEntry {
    pub expr: Term,
    pub table: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct JoinEntry {
    pub foreign_table: String,
    pub foreign_field: String,
    pub master_table: Option<String>,
    pub master_field: String,
    pub kind: JoinKind,
    pub alias: Option<String>,
    pub on_expr: Option<Query>,
}

#[derive(Debug, Clone)]
pub(crate) struct OrderEntry {
    pub term: Term,
    pub desc: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Limit {
    pub count: i64,
    pub offset: i64,
}

/// 按子句名分组的结构化条目存储。
#[derive(Debug, Clone, Default)]
pub(crate) struct Clauses {
    pub table: Vec<TableEntry>,
    pub fields: Vec<FieldEntry>,
    pub where_: Vec<Condition>,
    pub having: Vec<Condition>,
    pub join: Vec<JoinEntry>,
    pub group: Vec<Term>,
    pub order: Vec<OrderEntry>,
    pub limit: Option<Limit>,
    pub set: Vec<(String, QueryValue)>,
    pub options: Vec<String>,
    pub options_insert: Vec<String>,
    pub options_replace: Vec<String>,
    pub fx: Option<String>,
    pub args: Vec<QueryValue>,
    pub custom: Vec<(String, QueryValue)>,
}

/// 动态 SQL 查询构建器。
pub struct Query {
    pub(crate) clauses: Clauses,
    pub(crate) params: Params,
    pub(crate) extra_params: BTreeMap<String, SqlValue>,
    pub(crate) mode: Option<Mode>,
    pub(crate) template: Option<String>,
    pub(crate) main_table: MainTable,
    pub(crate) default_field: String,
    pub(crate) param_base: String,
    pub(crate) quote: Option<char>,
    pub(crate) id_field: Option<String>,
    pub(crate) connection: Option<Rc<dyn Connection>>,
    pub(crate) stmt: Option<Box<dyn Statement>>,
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("mode", &self.mode)
            .field("template", &self.template)
            .field("main_table", &self.main_table)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl Clone for Query {
    fn clone(&self) -> Self {
        Self {
            clauses: self.clauses.clone(),
            params: self.params.clone(),
            extra_params: self.extra_params.clone(),
            mode: self.mode,
            template: self.template.clone(),
            main_table: self.main_table.clone(),
            default_field: self.default_field.clone(),
            param_base: self.param_base.clone(),
            quote: self.quote,
            id_field: self.id_field.clone(),
            connection: self.connection.clone(),
            // 克隆不携带已执行的语句句柄
            stmt: None,
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Self::new()
    }
}

impl Query {
    pub fn new() -> Self {
        Self {
            clauses: Clauses::default(),
            params: Params::new("a"),
            extra_params: BTreeMap::new(),
            mode: None,
            template: None,
            main_table: MainTable::Unset,
            default_field: "*".to_string(),
            param_base: "a".to_string(),
            quote: Some('`'),
            id_field: None,
            connection: None,
            stmt: None,
        }
    }

    /// 绑定连接协作者的查询；执行与 `sub()` 衍生都经由它。
    pub fn with_connection(connection: Rc<dyn Connection>) -> Self {
        let mut q = Self::new();
        q.connection = Some(connection);
        q
    }

    /// 表达式节点：模板即内容，不带连接。
    pub fn expr(sql: impl Into<String>) -> Self {
        let mut q = Self::new();
        q.template = Some(sql.into());
        q
    }

    /// 衍生一个共享连接与配置的空白同级查询（子查询用）。
    pub fn sub(&self) -> Query {
        let mut q = Query::new();
        q.connection = self.connection.clone();
        q.param_base = self.param_base.clone();
        q.default_field = self.default_field.clone();
        q.quote = self.quote;
        q
    }

    /// 衍生表达式：把本查询的 where 条目按 OR 连接。
    pub fn or_expr(&self) -> Query {
        let mut q = self.sub();
        q.template = Some("([orwhere])".to_string());
        q
    }

    /// 衍生表达式：把本查询的 where 条目按 AND 连接。
    pub fn and_expr(&self) -> Query {
        let mut q = self.sub();
        q.template = Some("([andwhere])".to_string());
        q
    }

    /// 就地改用自定义模板（不确定时用 `Query::expr` 新建）。
    pub fn use_expr(&mut self, sql: impl Into<String>) -> &mut Self {
        self.template = Some(sql.into());
        self.mode = None;
        self
    }

    /// 显式覆盖模板。
    pub fn template(&mut self, template: impl Into<String>) -> &mut Self {
        self.template = Some(template.into());
        self
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self.template = None;
        self
    }

    /// 修改占位符名前缀。
    pub fn param_base(&mut self, base: impl Into<String>) -> &mut Self {
        self.param_base = base.into();
        self
    }

    /// 没有任何字段时渲染所用的缺省字段（默认 `*`）。
    pub fn default_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.default_field = field.into();
        self
    }

    /// 键控游标使用的 id 字段名。
    pub fn id_field(&mut self, field: impl Into<String>) -> &mut Self {
        self.id_field = Some(field.into());
        self
    }

    /// 标识符引用字符；`None` 关闭引用。
    pub fn quote_with(&mut self, quote: Option<char>) -> &mut Self {
        self.quote = quote;
        self
    }

    /// 手工提供的占位符参数，在每次渲染开始时并入参数表。
    pub fn extra_param(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> &mut Self {
        self.extra_params.insert(name.into(), value.into());
        self
    }

    // ---- 读取器 ----

    pub fn main_table(&self) -> &MainTable {
        &self.main_table
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// 上一次渲染产生的参数表。
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn connection(&self) -> Option<Rc<dyn Connection>> {
        self.connection.clone()
    }

    // ---- table ----

    /// 登记一个表。第一次调用确定主表；出现第二个不同的表后进入多表哨兵。
    pub fn table(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.track_main_table(&name);
        self.clauses.table.push(TableEntry::Name { name, alias: None });
        self
    }

    /// 带别名的表；主表按别名记录。
    pub fn table_as(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        let name = name.into();
        let alias = alias.into();
        self.track_main_table(&alias);
        self.clauses.table.push(TableEntry::Name {
            name,
            alias: Some(alias),
        });
        self
    }

    /// 批量登记表名。
    pub fn tables<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for n in names {
            self.table(n);
        }
        self
    }

    /// 批量登记 (别名, 表名) 对。
    pub fn tables_as<I, A, S>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (A, S)>,
        A: Into<String>,
        S: Into<String>,
    {
        for (alias, name) in pairs {
            self.table_as(name, alias);
        }
        self
    }

    /// 子查询作为表源；别名是必填项。
    pub fn table_query(
        &mut self,
        query: Query,
        alias: impl Into<String>,
    ) -> Result<&mut Self, UsageError> {
        let alias = alias.into();
        if alias.trim().is_empty() {
            return Err(UsageError::SubQueryAliasRequired);
        }
        self.track_main_table(&alias);
        self.clauses.table.push(TableEntry::Query { query, alias });
        Ok(self)
    }

    fn track_main_table(&mut self, label: &str) {
        self.main_table = match std::mem::take(&mut self.main_table) {
            MainTable::Unset => MainTable::Single(label.to_string()),
            MainTable::Single(existing) if existing != label => MainTable::Multiple,
            other => other,
        };
    }

    // ---- field ----

    /// 追加一个选择字段。逗号分隔的字符串会拆成多次登记。
    pub fn field(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if name.contains(',') {
            for part in name.split(',') {
                self.push_field(Term::Ident(part.trim().to_string()), None, None);
            }
            return self;
        }
        self.push_field(Term::Ident(name), None, None)
    }

    /// 指定所属表的字段。
    pub fn field_in(&mut self, name: impl Into<String>, table: impl Into<String>) -> &mut Self {
        self.push_field(Term::Ident(name.into()), Some(table.into()), None)
    }

    /// 带别名的字段。
    pub fn field_as(&mut self, name: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.push_field(Term::Ident(name.into()), None, Some(alias.into()))
    }

    /// 表达式/子查询字段，别名必填。
    pub fn field_expr(&mut self, expr: Query, alias: impl Into<String>) -> &mut Self {
        self.push_field(Term::Expr(expr), None, Some(alias.into()))
    }

    /// 批量追加字段名。
    pub fn fields<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for n in names {
            self.field(n);
        }
        self
    }

    fn push_field(&mut self, expr: Term, table: Option<String>, alias: Option<String>) -> &mut Self {
        self.clauses.fields.push(FieldEntry { expr, table, alias });
        self
    }

    /// 克隆出只保留指定字段的查询，原查询不受影响。
    pub fn field_query(&self, field: impl Into<String>) -> Query {
        let mut q = self.clone();
        q.del(Clause::Fields);
        q.field(field);
        q
    }

    /// 指向主表某字段的表达式；要求当前是单一主表。
    pub fn field_ref(&self, field: &str) -> Result<Query, UsageError> {
        match &self.main_table {
            MainTable::Multiple => Err(UsageError::MultipleTables),
            MainTable::Unset => Err(UsageError::NoTable),
            MainTable::Single(t) => Ok(Query::expr(format!(
                "{}.{}",
                self.quote_ident(t),
                self.quote_ident(field)
            ))),
        }
    }

    // ---- join ----

    /// `join("address")`：外键列按 `<foreign>_id` 推断，左连接。
    pub fn join(&mut self, foreign: &str) -> &mut Self {
        self.join_full(foreign, None, JoinKind::Left, None)
    }

    /// 指定主表侧字段：`join_on("address.code", "user.code")`。
    pub fn join_on(&mut self, foreign: &str, master_field: &str) -> &mut Self {
        self.join_full(foreign, Some(master_field), JoinKind::Left, None)
    }

    /// 指定 join 类型。
    pub fn join_with(
        &mut self,
        kind: JoinKind,
        foreign: &str,
        master_field: Option<&str>,
    ) -> &mut Self {
        self.join_full(foreign, master_field, kind, None)
    }

    /// 带别名的 join。
    pub fn join_as(&mut self, foreign: &str, alias: &str) -> &mut Self {
        self.join_full(foreign, None, JoinKind::Left, Some(alias))
    }

    /// 使用表达式作为 on 条件。
    pub fn join_expr(&mut self, foreign: &str, on_expr: Query) -> &mut Self {
        let (f1, f2) = split_dot(foreign);
        self.clauses.join.push(JoinEntry {
            foreign_table: f1,
            foreign_field: f2.unwrap_or_else(|| "id".to_string()),
            master_table: None,
            master_field: String::new(),
            kind: JoinKind::Left,
            alias: None,
            on_expr: Some(on_expr),
        });
        self
    }

    /// 完整形式。列推断：两侧都未指定列时外键列取 `<foreign>_id` 放在主表侧，
    /// 外表侧取 `id`；只有一侧给出 `table.column` 时另一侧推断为 `id`。
    pub fn join_full(
        &mut self,
        foreign: &str,
        master_field: Option<&str>,
        kind: JoinKind,
        alias: Option<&str>,
    ) -> &mut Self {
        let (f1, f2opt) = split_dot(foreign);
        let (m1, m2opt) = match master_field {
            None => (None, None),
            Some(m) => {
                let (a, b) = split_dot(m);
                match b {
                    Some(b) => (Some(a), Some(b)),
                    None => (None, Some(a)),
                }
            }
        };
        let m2 = match (&f2opt, m2opt) {
            (None, None) => format!("{f1}_id"),
            (_, Some(m2)) => m2,
            (Some(_), None) => "id".to_string(),
        };
        let f2 = f2opt.unwrap_or_else(|| "id".to_string());
        self.clauses.join.push(JoinEntry {
            foreign_table: f1,
            foreign_field: f2,
            master_table: m1,
            master_field: m2,
            kind,
            alias: alias.map(str::to_string),
            on_expr: None,
        });
        self
    }

    // ---- group / order / limit ----

    pub fn group(&mut self, expr: impl Into<Term>) -> &mut Self {
        self.clauses.group.push(expr.into());
        self
    }

    /// 追加排序项。字符串支持 `"name"`、`"name desc"`、逗号分隔多项与
    /// `a.b` 点号形式；方向关键字只接受 asc/desc/空。
    pub fn order(&mut self, order: impl Into<Term>) -> Result<&mut Self, UsageError> {
        match order.into() {
            Term::Expr(q) => {
                self.clauses.order.push(OrderEntry {
                    term: Term::Expr(q),
                    desc: false,
                });
                Ok(self)
            }
            Term::Ident(s) => self.order_str(&s),
        }
    }

    fn order_str(&mut self, s: &str) -> Result<&mut Self, UsageError> {
        if s.contains(',') {
            let parts: Vec<&str> = s.split(',').map(str::trim).collect();
            return self.orders(parts);
        }
        let s = s.trim();
        let (field, dir) = match s.split_once(' ') {
            Some((f, d)) => (f.trim(), d.trim()),
            None => (s, ""),
        };
        let desc = match dir.to_ascii_lowercase().as_str() {
            "" | "asc" => false,
            "desc" => true,
            other => return Err(UsageError::BadOrderKeyword(other.to_string())),
        };
        self.clauses.order.push(OrderEntry {
            term: Term::Ident(field.to_string()),
            desc,
        });
        Ok(self)
    }

    pub fn order_desc(&mut self, field: impl Into<Term>) -> &mut Self {
        self.clauses.order.push(OrderEntry {
            term: field.into(),
            desc: true,
        });
        self
    }

    /// 列表形式按逆序逐项登记；渲染时收集列表整体再反转一次，
    /// 净效果是先声明的排序项为第一排序键。
    pub fn orders<I, T>(&mut self, items: I) -> Result<&mut Self, UsageError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        let mut list: Vec<Term> = items.into_iter().map(Into::into).collect();
        list.reverse();
        for t in list {
            self.order(t)?;
        }
        Ok(self)
    }

    /// 行数上限，偏移为 0。重复调用以最后一次为准。
    pub fn limit(&mut self, count: i64) -> &mut Self {
        self.limit_offset(count, 0)
    }

    pub fn limit_offset(&mut self, count: i64, offset: i64) -> &mut Self {
        self.clauses.limit = Some(Limit { count, offset });
        self
    }

    // ---- set ----

    /// insert/update 的字段赋值；同名字段后写覆盖（位置不变）。
    /// `false` 与列表值不受支持。
    pub fn set(
        &mut self,
        field: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Result<&mut Self, UsageError> {
        let field = field.into();
        let value = value.into();
        match &value {
            QueryValue::Value(SqlValue::Bool(false)) => {
                return Err(UsageError::BooleanSetValue(field));
            }
            QueryValue::None => return Err(UsageError::SetWithoutValue(field)),
            QueryValue::List(_) => return Err(UsageError::ListSetValue(field)),
            _ => {}
        }
        if let Some(slot) = self.clauses.set.iter_mut().find(|(f, _)| *f == field) {
            slot.1 = value;
        } else {
            self.clauses.set.push((field, value));
        }
        Ok(self)
    }

    /// 表达式赋值：`set_expr("seen_at", Query::expr("now()"))`。
    pub fn set_expr(
        &mut self,
        field: impl Into<String>,
        expr: Query,
    ) -> Result<&mut Self, UsageError> {
        self.set(field, expr)
    }

    /// 批量赋值。
    pub fn set_map<I, S, V>(&mut self, pairs: I) -> Result<&mut Self, UsageError>
    where
        I: IntoIterator<Item = (S, V)>,
        S: Into<String>,
        V: Into<QueryValue>,
    {
        for (f, v) in pairs {
            self.set(f, v)?;
        }
        Ok(self)
    }

    // ---- options ----

    /// SELECT 修饰符，如 `DISTINCT`、`SQL_CALC_FOUND_ROWS`。逗号分隔可多项。
    pub fn option(&mut self, option: impl Into<String>) -> &mut Self {
        push_options(&mut self.clauses.options, option.into());
        self
    }

    /// INSERT 修饰符，如 `IGNORE`。
    pub fn option_insert(&mut self, option: impl Into<String>) -> &mut Self {
        push_options(&mut self.clauses.options_insert, option.into());
        self
    }

    /// REPLACE 修饰符。
    pub fn option_replace(&mut self, option: impl Into<String>) -> &mut Self {
        push_options(&mut self.clauses.options_replace, option.into());
        self
    }

    /// `insert` 的 IGNORE 快捷方式。
    pub fn ignore(&mut self) -> &mut Self {
        self.option_insert("ignore")
    }

    /// 提示统计总行数，配合 `found_rows()` 使用。
    pub fn calc_found_rows(&mut self) -> &mut Self {
        self.option("SQL_CALC_FOUND_ROWS")
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.clauses
            .options
            .iter()
            .any(|o| o.eq_ignore_ascii_case(option))
    }

    pub fn has_insert_option(&self, option: &str) -> bool {
        self.clauses
            .options_insert
            .iter()
            .any(|o| o.eq_ignore_ascii_case(option))
    }

    // ---- fx / call / args ----

    /// `[args]` 模板位的参数，fx/call 之外也可配合 `use_expr` 使用。
    pub fn args<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        for v in values {
            self.clauses.args.push(v.into());
        }
        self
    }

    /// 内建函数调用表达式：`fx("if", [...])` 渲染为 `if(...)`。
    pub fn fx<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        self.set_mode(Mode::Fx);
        self.clauses.fx = Some(name.into());
        self.args(values)
    }

    /// 存储过程调用：`call name(...)`。
    pub fn call<I, V>(&mut self, name: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        self.set_mode(Mode::Call);
        self.clauses.fx = Some(name.into());
        self.args(values)
    }

    /// SUM() 表达式。
    pub fn sum(&self, arg: impl Into<Term>) -> Query {
        self.agg_expr("sum([sum])", "sum", arg)
    }

    /// COUNT() 表达式；`count("*")` 即 count(*)。
    pub fn count(&self, arg: impl Into<Term>) -> Query {
        self.agg_expr("count([count])", "count", arg)
    }

    fn agg_expr(&self, template: &str, tag: &str, arg: impl Into<Term>) -> Query {
        let mut q = self.sub();
        q.template = Some(template.to_string());
        let value = match arg.into() {
            Term::Ident(s) => QueryValue::Value(SqlValue::from(self.quote_ident(&s))),
            Term::Expr(e) => QueryValue::Query(Box::new(e)),
        };
        q.set_custom(tag, value);
        q
    }

    /// 随机排序用表达式。
    pub fn random(&self) -> Query {
        let mut q = self.sub();
        q.use_expr("rand()");
        q
    }

    /// 串接多个值的表达式，参数逐个转义。
    pub fn concat<I, V>(&self, values: I) -> Query
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        let mut q = self.sub();
        q.fx("concat", values);
        q
    }

    /// 列出表结构的查询（方言相关，结果解析由调用方负责）。
    pub fn describe(&self, table: Option<&str>) -> Query {
        let mut q = self.clone();
        if let Some(t) = table {
            q.table(t);
        }
        q.set_mode(Mode::Describe);
        q
    }

    // ---- custom tokens ----

    /// 自定义模板 token 的值。字符串值原样拼入，注意自行转义。
    pub fn set_custom(&mut self, tag: impl Into<String>, value: impl Into<QueryValue>) -> &mut Self {
        let tag = tag.into();
        let value = value.into();
        if let Some(slot) = self.clauses.custom.iter_mut().find(|(t, _)| *t == tag) {
            slot.1 = value;
        } else {
            self.clauses.custom.push((tag, value));
        }
        self
    }

    // ---- del / reset ----

    /// 清空单个子句的累积条目。
    pub fn del(&mut self, clause: Clause) -> &mut Self {
        match clause {
            Clause::Table => {
                self.clauses.table.clear();
                self.main_table = MainTable::Unset;
            }
            Clause::Fields => self.clauses.fields.clear(),
            Clause::Where => self.clauses.where_.clear(),
            Clause::Having => self.clauses.having.clear(),
            Clause::Join => self.clauses.join.clear(),
            Clause::Group => self.clauses.group.clear(),
            Clause::Order => self.clauses.order.clear(),
            Clause::Limit => self.clauses.limit = None,
            Clause::Set => self.clauses.set.clear(),
            Clause::Options => self.clauses.options.clear(),
            Clause::OptionsInsert => self.clauses.options_insert.clear(),
            Clause::OptionsReplace => self.clauses.options_replace.clear(),
            Clause::Args => {
                self.clauses.args.clear();
                self.clauses.fx = None;
            }
            Clause::Custom => self.clauses.custom.clear(),
        }
        self
    }

    /// 清空所有子句，从头再来。
    pub fn reset(&mut self) -> &mut Self {
        self.clauses = Clauses::default();
        self.main_table = MainTable::Unset;
        self
    }
}

fn push_options(target: &mut Vec<String>, value: String) {
    if value.contains(',') {
        for part in value.split(',') {
            target.push(part.trim().to_string());
        }
    } else {
        target.push(value);
    }
}

fn split_dot(s: &str) -> (String, Option<String>) {
    match s.split_once('.') {
        Some((a, b)) => (a.to_string(), Some(b.to_string())),
        None => (s.to_string(), None),
    }
}
