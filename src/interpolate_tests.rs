#[cfg(test)]
mod tests {
    use crate::{Query, SqlValue};
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn preview_substitutes_string_and_number_literals() {
        let mut q = Query::new();
        q.table("user").where_("name", "O'Hara").where_("id", 5);
        assert_eq!(
            q.preview(),
            "select * from `user` where `user`.`name` = 'O''Hara' and `user`.`id` = 5"
        );
    }

    #[test]
    fn preview_renders_null_and_bool_keywords() {
        let mut q = Query::new();
        q.table("user")
            .where_("deleted", SqlValue::Null)
            .where_("active", true);
        assert_eq!(
            q.preview(),
            "select * from `user` where `user`.`deleted` is NULL and `user`.`active` = TRUE"
        );
    }

    #[test]
    fn suffixed_placeholders_substitute_independently() {
        let mut q = Query::new();
        q.table("t").where_("id", vec![1_i64, 2, 3]);
        assert_eq!(q.preview(), "select * from `t` where `t`.`id` in (1,2,3)");
    }

    #[test]
    fn unknown_placeholder_is_kept() {
        let mut q = Query::expr("select :missing from t");
        assert_eq!(q.preview(), "select :missing from t");
    }

    #[test]
    fn datetime_literal_format() {
        let mut q = Query::new();
        q.table("log").where_("created", datetime!(2020-01-02 03:04:05 UTC));
        assert_eq!(
            q.preview(),
            "select * from `log` where `log`.`created` = '2020-01-02 03:04:05'"
        );
    }

    #[test]
    fn bytes_render_as_hex_literal() {
        let mut q = Query::new();
        q.table("blob").where_("data", SqlValue::Bytes(vec![0x0A, 0xFF]));
        assert_eq!(
            q.preview(),
            "select * from `blob` where `blob`.`data` = X'0AFF'"
        );
    }
}
