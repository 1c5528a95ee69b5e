//! 语句模板：mode 到 token 模板的映射，以及 `[token]` 的扫描展开。

use crate::string_builder::StringBuilder;

/// 语句模式，决定渲染所用的模板。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Select,
    Insert,
    Replace,
    Update,
    Delete,
    Truncate,
    Describe,
    Call,
    Fx,
}

impl Mode {
    pub(crate) fn template(self) -> &'static str {
        match self {
            Self::Select => {
                "select [options] [field] [from] [table] [join] [where] [group] [having] [order] [limit]"
            }
            Self::Insert => {
                "insert [options_insert] into [table_noalias] ([set_fields]) values ([set_values])"
            }
            Self::Replace => {
                "replace [options_replace] into [table_noalias] ([set_fields]) values ([set_values])"
            }
            Self::Update => "update [table_noalias] set [set] [where]",
            Self::Delete => "delete from [table_noalias] [where]",
            Self::Truncate => "truncate table [table_noalias]",
            Self::Describe => "desc [table_noalias]",
            Self::Call => "call [fx]([args])",
            Self::Fx => "[fx]([args])",
        }
    }
}

/// 扫描模板中的 `[token]` 并逐个调用 `resolve`。
///
/// `resolve` 返回 `None` 表示没有对应渲染器，token 原样保留（宽松回退）。
pub(crate) fn expand(template: &str, mut resolve: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = StringBuilder::new();
    let mut rest = template;
    while let Some(pos) = rest.find('[') {
        out.write_str(&rest[..pos]);
        rest = &rest[pos..];

        match token_at(rest) {
            Some(token) => {
                let bracketed_len = token.len() + 2;
                match resolve(token) {
                    Some(rendered) => out.write_str(&rendered),
                    None => out.write_str(&rest[..bracketed_len]),
                }
                rest = &rest[bracketed_len..];
            }
            None => {
                out.write_char('[');
                rest = &rest[1..];
            }
        }
    }
    out.write_str(rest);
    out.into_string()
}

/// 如果 `s` 以合法 `[token]` 开头则返回 token 内容。token 只允许 `[a-z0-9_]`。
fn token_at(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('[')?;
    let end = inner.find(']')?;
    let token = &inner[..end];
    if token.is_empty() {
        return None;
    }
    if token
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_')
    {
        Some(token)
    } else {
        None
    }
}

/// 压缩空 token 展开后留下的连续空格并去掉首尾空白。
pub(crate) fn tidy(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut last_space = false;
    for c in sql.trim().chars() {
        if c == ' ' {
            if !last_space {
                out.push(' ');
            }
            last_space = true;
        } else {
            out.push(c);
            last_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{expand, tidy};
    use pretty_assertions::assert_eq;

    #[test]
    fn expand_replaces_known_tokens() {
        let out = expand("select [field] from [table]", |t| match t {
            "field" => Some("`name`".to_string()),
            "table" => Some("`user`".to_string()),
            _ => None,
        });
        assert_eq!(out, "select `name` from `user`");
    }

    #[test]
    fn expand_keeps_unknown_tokens_verbatim() {
        let out = expand("select [nosuch] from t", |_| None);
        assert_eq!(out, "select [nosuch] from t");
    }

    #[test]
    fn expand_ignores_malformed_brackets() {
        let out = expand("a [UPPER] b [ c", |_| Some("x".to_string()));
        assert_eq!(out, "a [UPPER] b [ c");
    }

    #[test]
    fn tidy_collapses_runs() {
        assert_eq!(tidy("select   a  from t  "), "select a from t");
    }
}
