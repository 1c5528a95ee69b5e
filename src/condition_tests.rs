#[cfg(test)]
mod tests {
    use crate::{Query, SqlValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn default_condition_is_equality() {
        let mut q = Query::new();
        q.where_("id", 1);
        assert_eq!(q.render(), "select * where `id` = :a");
        assert_eq!(q.params().get("a"), Some(&SqlValue::I64(1)));
    }

    #[test]
    fn null_value_rewrites_equality_to_is() {
        let mut q = Query::new();
        q.where_("id", SqlValue::Null);
        assert_eq!(q.render(), "select * where `id` is :a");
        assert_eq!(q.params().get("a"), Some(&SqlValue::Null));
    }

    #[test]
    fn null_value_rewrites_negation_to_is_not() {
        let mut q = Query::new();
        q.where_cond("id", "!=", SqlValue::Null);
        assert_eq!(q.render(), "select * where `id` is not :a");
    }

    #[test]
    fn list_value_defaults_to_in() {
        let mut q = Query::new();
        q.where_("id", vec![1_i64, 2, 3]);
        assert_eq!(q.render(), "select * where `id` in (:a,:a_2,:a_3)");
        assert_eq!(q.params().get("a_3"), Some(&SqlValue::I64(3)));
    }

    #[test]
    fn comma_string_expands_under_in() {
        let mut q = Query::new();
        q.where_cond("code", "in", "x, y");
        assert_eq!(q.render(), "select * where `code` in (:a,:a_2)");
        assert_eq!(q.params().get("a"), Some(&SqlValue::String("x".into())));
        assert_eq!(q.params().get("a_2"), Some(&SqlValue::String("y".into())));
    }

    #[test]
    fn negated_list_normalizes_to_not_in() {
        let mut q = Query::new();
        q.where_cond("id", "!=", vec![1_i64, 2]);
        assert_eq!(q.render(), "select * where `id` not in (:a,:a_2)");
    }

    #[test]
    fn operator_suffix_in_field_string() {
        let mut q = Query::new();
        q.where_("id>", 5);
        assert_eq!(q.render(), "select * where `id` > :a");
    }

    #[test]
    fn word_operator_suffix() {
        let mut q = Query::new();
        q.where_("name like", "J%");
        assert_eq!(q.render(), "select * where `name` like :a");
    }

    #[test]
    fn expression_head_with_operator() {
        let mut q = Query::new();
        q.where_("length(password)>", 5);
        assert_eq!(q.render(), "select * where length(password) > :a");
    }

    #[test]
    fn raw_chunk_renders_verbatim() {
        let mut q = Query::new();
        q.where_raw("a=b");
        assert_eq!(q.render(), "select * where a=b");
        assert!(q.params().is_empty());
    }

    #[test]
    fn non_identifier_field_with_value_becomes_equality() {
        let mut q = Query::new();
        q.where_("a=b", 5);
        assert_eq!(q.render(), "select * where a=b = :a");
    }

    #[test]
    fn expression_field_with_explicit_condition() {
        let mut q = Query::new();
        q.where_cond(Query::expr("length(password)"), ">", 5);
        assert_eq!(q.render(), "select * where length(password) > :a");
    }

    #[test]
    fn subquery_value_defaults_to_in_and_parenthesizes() {
        let mut q = Query::new();
        let mut sub = q.sub();
        sub.table("foo").field("id");
        q.where_("foo_id", sub);
        assert_eq!(
            q.render(),
            "select * where `foo_id` in (select `id` from `foo`)"
        );
    }

    #[test]
    fn expression_value_is_consumed_not_escaped() {
        let mut q = Query::new();
        q.where_cond("date", ">", Query::expr("now()"));
        assert_eq!(q.render(), "select * where `date` > now()");
        assert!(q.params().is_empty());
    }

    #[test]
    fn where_any_builds_or_group() {
        let mut q = Query::new();
        q.where_any(["a is null", "b is null"]);
        assert_eq!(q.render(), "select * where (a is null or b is null)");
    }

    #[test]
    fn where_any_accepts_pairs_and_triples() {
        let mut q = Query::new();
        q.where_any(vec![
            crate::OrItem::from(("id", 1_i64)),
            crate::OrItem::from(("age", ">", 18_i64)),
        ]);
        assert_eq!(q.render(), "select * where (`id` = :a or `age` > :a_2)");
    }

    #[test]
    fn or_expr_joins_entries_with_or() {
        let mut q = Query::new();
        let mut or = q.or_expr();
        or.where_("a", 1).where_("b", 2);
        q.where_expr(or);
        assert_eq!(q.render(), "select * where (`a` = :a or `b` = :a_2)");
    }

    #[test]
    fn and_expr_joins_entries_with_and() {
        let mut q = Query::new();
        let mut group = q.and_expr();
        group.where_("a", 1).where_("b", 2);
        q.where_expr(group);
        assert_eq!(q.render(), "select * where (`a` = :a and `b` = :a_2)");
    }

    #[test]
    fn unqualified_fields_take_single_main_table_prefix() {
        let mut q = Query::new();
        q.table("user").where_("id", 5);
        assert_eq!(q.render(), "select * from `user` where `user`.`id` = :a");
    }

    #[test]
    fn dotted_fields_quote_each_segment() {
        let mut q = Query::new();
        q.table("user").where_("u.id", 5);
        assert_eq!(q.render(), "select * from `user` where `u`.`id` = :a");
    }

    #[test]
    fn multiple_tables_leave_fields_unqualified() {
        let mut q = Query::new();
        q.table("user").table("salary").where_("id", 5);
        assert_eq!(
            q.render(),
            "select * from `user`,`salary` where `id` = :a"
        );
    }

    #[test]
    fn having_mirrors_where_syntax() {
        let mut q = Query::new();
        q.table("user")
            .field_as("count(*)", "cnt")
            .group("type");
        q.having_cond("cnt", ">", 10);
        assert_eq!(
            q.render(),
            "select count(*) `cnt` from `user` group by `type` having `user`.`cnt` > :a"
        );
    }
}
