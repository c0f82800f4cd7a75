//! 宏集合：记录适配宏 `sql_record!`，以及为 builder 提供可变参数列名的调用封装。

#[doc(hidden)]
#[macro_export]
macro_rules! __collect_strings {
    () => {
        Vec::<String>::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut values = Vec::<String>::new();
        $(
            $crate::extend_into_strings($value, &mut values);
        )*
        values
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __builder_with_strings {
    ($builder:expr, $method:ident $(, $arg:expr)* $(,)?) => {
        $builder.$method($crate::__collect_strings!($($arg),*))
    };
}

pub trait IntoStrings {
    fn extend_into_strings(self, dst: &mut Vec<String>);
}

impl IntoStrings for String {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self);
    }
}

impl<'a> IntoStrings for &'a str {
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.push(self.to_string());
    }
}

impl<const N: usize, T> IntoStrings for [T; N]
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

impl<'a, T> IntoStrings for &'a [T]
where
    T: Into<String> + Clone,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.iter().cloned().map(Into::into));
    }
}

impl<'a, T> IntoStrings for &'a Vec<T>
where
    T: Into<String> + Clone,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.iter().cloned().map(Into::into));
    }
}

impl<T> IntoStrings for Vec<T>
where
    T: Into<String>,
{
    fn extend_into_strings(self, dst: &mut Vec<String>) {
        dst.extend(self.into_iter().map(Into::into));
    }
}

#[doc(hidden)]
pub fn extend_into_strings<T>(value: T, dst: &mut Vec<String>)
where
    T: IntoStrings,
{
    value.extend_into_strings(dst);
}

#[doc(hidden)]
pub fn collect_into_strings<T>(value: T) -> Vec<String>
where
    T: IntoStrings,
{
    let mut dst = Vec::new();
    value.extend_into_strings(&mut dst);
    dst
}

/// 为业务 struct 生成 [`ToRecord`](crate::ToRecord) 实现，列顺序即书写顺序。
///
/// ```
/// #[derive(Clone)]
/// struct Person {
///     id: i64,
///     name: String,
///     updated_at: &'static str,
/// }
///
/// pg_bulk_sql::sql_record! {
///     impl Person {
///         id: { column: "PersonId" },
///         name: { column: "FirstName" },
///         updated_at: { column: "UpdatedAt", raw: true },
///     }
/// }
///
/// use pg_bulk_sql::ToRecord;
/// let p = Person { id: 1, name: "Lee".into(), updated_at: "now()" };
/// let r = p.to_record();
/// assert_eq!(r.columns().collect::<Vec<_>>(), ["PersonId", "FirstName", "UpdatedAt"]);
/// assert!(r.get("UpdatedAt").is_some_and(|f| f.raw));
/// ```
#[macro_export]
macro_rules! sql_record {
    (
        impl $ty:ty {
            $(
                $field:ident : { column: $col:literal $(, raw: $raw:literal)? $(,)? }
            ),* $(,)?
        }
    ) => {
        impl $crate::record::ToRecord for $ty {
            fn to_record(&self) -> $crate::record::Record {
                let mut r = $crate::record::Record::new();
                $(
                    $crate::record::push_adapted(
                        &mut r,
                        $col,
                        self.$field.clone(),
                        $crate::__sql_record_raw!($($raw)?),
                    );
                )*
                r
            }
        }
    };
}

/// 宏内部 helper：`raw:` 缺省为 `false`。
#[doc(hidden)]
#[macro_export]
macro_rules! __sql_record_raw {
    () => {
        false
    };
    ($raw:literal) => {
        $raw
    };
}

/// 为 `key_columns` 提供可变参数调用。
#[macro_export]
macro_rules! key_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, key_columns $(, $col)*)
    };
}
pub use crate::key_cols;

/// 为 `identity_columns` 提供可变参数调用。
#[macro_export]
macro_rules! identity_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, identity_columns $(, $col)*)
    };
}
pub use crate::identity_cols;

/// 为 `InsertBuilder::returning` 提供可变参数调用。
#[macro_export]
macro_rules! returning_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, returning $(, $col)*)
    };
}
pub use crate::returning_cols;

/// 为 `InsertBuilder::exclude` 提供可变参数调用。
#[macro_export]
macro_rules! exclude_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, exclude $(, $col)*)
    };
}
pub use crate::exclude_cols;

/// 为 `unquoted` 提供可变参数调用。
#[macro_export]
macro_rules! unquoted_cols {
    ($builder:expr $(, $col:expr)* $(,)?) => {
        $crate::__builder_with_strings!($builder, unquoted $(, $col)*)
    };
}
pub use crate::unquoted_cols;
