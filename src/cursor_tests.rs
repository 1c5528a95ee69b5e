#[cfg(test)]
mod tests {
    use crate::exec_tests::mock::{MockConnection, row};
    use crate::{Query, SqlValue};
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    fn two_rows() -> Vec<crate::Row> {
        vec![
            row(&[("id", SqlValue::I64(1)), ("name", SqlValue::String("a".into()))]),
            row(&[("id", SqlValue::I64(2)), ("name", SqlValue::String("b".into()))]),
        ]
    }

    #[test]
    fn rows_executes_lazily_and_releases_handle() {
        let conn = Rc::new(MockConnection::with_rows(two_rows()));
        let mut q = Query::with_connection(conn.clone());
        q.table("user");

        assert!(conn.queries().is_empty());
        let collected: Vec<_> = q.rows().map(Result::unwrap).collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].get("name"), Some(&SqlValue::String("a".into())));
        assert_eq!(conn.queries().len(), 1);

        // 句柄已随迭代结束释放，再次迭代重新执行
        let again: Vec<_> = q.rows().map(Result::unwrap).collect();
        assert_eq!(again.len(), 2);
        assert_eq!(conn.queries().len(), 2);
    }

    #[test]
    fn preexec_allows_found_rows_before_consuming() {
        let mut conn = MockConnection::with_rows(two_rows());
        conn.scalar = SqlValue::I64(50);
        let conn = Rc::new(conn);
        let mut q = Query::with_connection(conn.clone());
        q.table("user").calc_found_rows().limit(2);

        q.preexec().unwrap();
        assert_eq!(q.found_rows().unwrap(), 50);

        let collected: Vec<_> = q.rows().map(Result::unwrap).collect();
        assert_eq!(collected.len(), 2);
        // preexec 的那一次执行被后续迭代复用
        assert_eq!(conn.queries().len(), 1);
    }

    #[test]
    fn keyed_rows_use_configured_id_field() {
        let conn = Rc::new(MockConnection::with_rows(two_rows()));
        let mut q = Query::with_connection(conn);
        q.table("user").id_field("id");
        let keys: Vec<SqlValue> = q
            .keyed_rows()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![SqlValue::I64(1), SqlValue::I64(2)]);
    }

    #[test]
    fn keyed_rows_default_to_id_and_null_when_missing() {
        let conn = Rc::new(MockConnection::with_rows(vec![row(&[(
            "name",
            SqlValue::String("a".into()),
        )])]));
        let mut q = Query::with_connection(conn);
        q.table("user");
        let keys: Vec<SqlValue> = q.keyed_rows().map(|r| r.unwrap().0).collect();
        assert_eq!(keys, vec![SqlValue::Null]);
    }
}
