#[cfg(test)]
mod tests {
    use crate::{Params, SqlValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn push_returns_prefixed_token_and_records_value() {
        let mut p = Params::new("a");
        let token = p.push(SqlValue::I64(5));
        assert_eq!(token, ":a");
        assert_eq!(p.get("a"), Some(&SqlValue::I64(5)));
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn collisions_get_numeric_suffixes() {
        let mut p = Params::new("a");
        assert_eq!(p.push(SqlValue::I64(1)), ":a");
        assert_eq!(p.push(SqlValue::I64(2)), ":a_2");
        assert_eq!(p.push(SqlValue::I64(3)), ":a_3");
        assert_eq!(p.get("a_2"), Some(&SqlValue::I64(2)));
    }

    #[test]
    fn names_are_unique_against_preinserted_entries() {
        let mut p = Params::new("a");
        p.insert("a", SqlValue::I64(10));
        assert_eq!(p.push(SqlValue::I64(20)), ":a_2");
        assert_eq!(p.get("a"), Some(&SqlValue::I64(10)));
        assert_eq!(p.get("a_2"), Some(&SqlValue::I64(20)));
    }

    #[test]
    fn base_is_sanitized_to_identifier_chars() {
        let mut p = Params::new("p:x");
        assert_eq!(p.push(SqlValue::I64(1)), ":p_x");
    }

    #[test]
    fn empty_base_falls_back() {
        let mut p = Params::new("");
        assert_eq!(p.push(SqlValue::I64(1)), ":a");
    }

    #[test]
    fn push_list_escapes_each_element() {
        let mut p = Params::new("a");
        let tokens = p.push_list(vec![SqlValue::I64(1), SqlValue::I64(2)]);
        assert_eq!(tokens, vec![":a".to_string(), ":a_2".to_string()]);
    }
}
