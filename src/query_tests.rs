#[cfg(test)]
mod tests {
    use crate::{Clause, MainTable, Query, SqlValue, UsageError};
    use pretty_assertions::assert_eq;

    #[test]
    fn main_table_tracking() {
        let mut q = Query::new();
        assert_eq!(q.main_table(), &MainTable::Unset);
        q.table("user");
        assert_eq!(q.main_table(), &MainTable::Single("user".to_string()));
        // 同一张表重复登记不触发多表哨兵
        q.table("user");
        assert_eq!(q.main_table(), &MainTable::Single("user".to_string()));
        q.table("salary");
        assert_eq!(q.main_table(), &MainTable::Multiple);
    }

    #[test]
    fn alias_becomes_main_table_label() {
        let mut q = Query::new();
        q.table_as("user", "u");
        assert_eq!(q.main_table(), &MainTable::Single("u".to_string()));
    }

    #[test]
    fn subquery_table_requires_alias() {
        let mut q = Query::new();
        let sub = q.sub();
        let err = q.table_query(sub, " ").unwrap_err();
        assert_eq!(err, UsageError::SubQueryAliasRequired);
    }

    #[test]
    fn field_ref_requires_single_table() {
        let mut q = Query::new();
        assert_eq!(q.field_ref("id").unwrap_err(), UsageError::NoTable);
        q.table("user");
        let mut f = q.field_ref("id").unwrap();
        assert_eq!(f.render(), "`user`.`id`");
        q.table("salary");
        assert_eq!(q.field_ref("id").unwrap_err(), UsageError::MultipleTables);
    }

    #[test]
    fn set_rejects_false_and_lists() {
        let mut q = Query::new();
        assert_eq!(
            q.set("active", false).unwrap_err(),
            UsageError::BooleanSetValue("active".to_string())
        );
        assert_eq!(
            q.set("ids", vec![1_i64, 2]).unwrap_err(),
            UsageError::ListSetValue("ids".to_string())
        );
        // true 是合法值
        q.set("active", true).unwrap();
    }

    #[test]
    fn set_last_write_wins_in_place() {
        let mut q = Query::new();
        q.table("user").set("name", "a").unwrap();
        q.set("age", 30_i64).unwrap();
        q.set("name", "b").unwrap();
        let mut ins = q.clone();
        ins.set_mode(crate::Mode::Insert);
        assert_eq!(
            ins.render(),
            "insert into `user` (`name`,`age`) values (:a,:a_2)"
        );
        assert_eq!(ins.params().get("a"), Some(&SqlValue::String("b".into())));
    }

    #[test]
    fn order_rejects_bad_keyword() {
        let mut q = Query::new();
        let err = q.order("name sideways").unwrap_err();
        assert_eq!(err, UsageError::BadOrderKeyword("sideways".to_string()));
    }

    #[test]
    fn option_splits_on_commas() {
        let mut q = Query::new();
        q.option("DISTINCT, SQL_CALC_FOUND_ROWS");
        assert!(q.has_option("distinct"));
        assert!(q.has_option("sql_calc_found_rows"));
    }

    #[test]
    fn ignore_sets_insert_option() {
        let mut q = Query::new();
        q.ignore();
        assert!(q.has_insert_option("IGNORE"));
    }

    #[test]
    fn del_clears_only_one_clause() {
        let mut q = Query::new();
        q.table("user").field("name").where_("id", 1);
        q.del(Clause::Where);
        assert_eq!(q.render(), "select `name` from `user`");
        q.del(Clause::Fields);
        assert_eq!(q.render(), "select * from `user`");
    }

    #[test]
    fn reset_clears_everything() {
        let mut q = Query::new();
        q.table("user").field("name").where_("id", 1);
        q.reset();
        assert_eq!(q.render(), "select *");
        assert_eq!(q.main_table(), &MainTable::Unset);
    }

    #[test]
    fn clone_is_structurally_independent() {
        let mut q = Query::new();
        q.table("user").where_("id", 1);
        let mut c = q.clone();
        c.where_("status", 2).field("name");
        assert_eq!(q.render(), "select * from `user` where `user`.`id` = :a");
        assert_eq!(
            c.render(),
            "select `name` from `user` where `user`.`id` = :a and `user`.`status` = :a_2"
        );
    }

    #[test]
    fn field_query_leaves_original_untouched() {
        let mut q = Query::new();
        q.table("user").field("name").field("surname");
        let mut only = q.field_query("count(*)");
        assert_eq!(only.render(), "select count(*) from `user`");
        assert_eq!(q.render(), "select `name`,`surname` from `user`");
    }

    #[test]
    fn comma_separated_fields_split() {
        let mut q = Query::new();
        q.table("user").field("name, surname");
        assert_eq!(q.render(), "select `name`,`surname` from `user`");
    }

    #[test]
    fn macros_chain_varargs() {
        let mut q = Query::new();
        crate::tables!(q, "user");
        crate::fields!(q, "id", "name");
        crate::options!(q, "DISTINCT");
        crate::where_any!(q, "a is null", ("id", 1_i64));
        assert_eq!(
            q.render(),
            "select DISTINCT `id`,`name` from `user` where (a is null or `id` = :a)"
        );
    }
}
