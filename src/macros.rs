//! 宏集合：为常见的可变参数调用提供简写。

/// 批量追加字段：`fields!(q, "id", "name")`。
#[macro_export]
macro_rules! fields {
    ($q:expr $(, $f:expr)+ $(,)?) => {
        $q $( .field($f) )+
    };
}
pub use crate::fields;

/// 批量登记表：`tables!(q, "user", "salary")`。
#[macro_export]
macro_rules! tables {
    ($q:expr $(, $t:expr)+ $(,)?) => {
        $q $( .table($t) )+
    };
}
pub use crate::tables;

/// OR 分组条件：`where_any!(q, "a is null", ("id", 1))`。
#[macro_export]
macro_rules! where_any {
    ($q:expr $(, $e:expr)+ $(,)?) => {
        $q.where_any(vec![ $( $crate::OrItem::from($e) ),+ ])
    };
}
pub use crate::where_any;

/// 批量 select 修饰符：`options!(q, "DISTINCT")`。
#[macro_export]
macro_rules! options {
    ($q:expr $(, $o:expr)+ $(,)?) => {
        $q $( .option($o) )+
    };
}
pub use crate::options;
