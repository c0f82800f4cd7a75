//! 记录字段的标量值类型，以及它们到字段文本的转换规则。

use std::borrow::Cow;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const DATETIME_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6] [offset_hour sign:mandatory]:[offset_minute]"
);

/// 字段值。
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    I64(i64),
    U64(u64),
    F64(f64),
    String(Cow<'static, str>),
    Bytes(Vec<u8>),
    DateTime(time::OffsetDateTime),
}

/// 一个字段在 SQL 中的文本形态：`value == None` 表示 NULL，`raw` 表示原样拼入（不加引号）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldText {
    pub value: Option<String>,
    pub raw: bool,
}

impl FieldText {
    pub fn null() -> Self {
        Self {
            value: None,
            raw: false,
        }
    }

    pub fn quoted(v: impl Into<String>) -> Self {
        Self {
            value: Some(v.into()),
            raw: false,
        }
    }

    pub fn raw(v: impl Into<String>) -> Self {
        Self {
            value: Some(v.into()),
            raw: true,
        }
    }
}

impl SqlValue {
    /// 将 `Option<T>` 映射为 `SqlValue`：`None => Null`，`Some(v) => v.into()`。
    pub fn from_option<T: Into<SqlValue>>(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }

    /// 转成字段文本。
    ///
    /// - 数值与布尔是合法的 SQL 字面量，原样输出；
    /// - 字符串与时间需要加引号；
    /// - 二进制输出为加引号的十六进制文本 `'\x..'`，由数据库按 bytea 列类型转换；空数组也是非 NULL 值。
    pub fn to_field_text(&self) -> FieldText {
        match self {
            Self::Null => FieldText::null(),
            Self::Bool(b) => FieldText::raw(if *b { "TRUE" } else { "FALSE" }),
            Self::I64(n) => FieldText::raw(n.to_string()),
            Self::U64(n) => FieldText::raw(n.to_string()),
            Self::F64(n) => float_text(*n),
            Self::String(s) => FieldText::quoted(s.as_ref()),
            Self::Bytes(b) => {
                let mut s = String::with_capacity(b.len() * 2 + 2);
                s.push_str("\\x");
                push_hex(&mut s, b);
                FieldText::quoted(s)
            }
            Self::DateTime(dt) => FieldText::quoted(format_datetime(dt)),
        }
    }
}

fn float_text(n: f64) -> FieldText {
    if n.is_nan() {
        FieldText::quoted("NaN")
    } else if n.is_infinite() {
        FieldText::quoted(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        FieldText::raw(n.to_string())
    }
}

fn push_hex(out: &mut String, data: &[u8]) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    for &b in data {
        out.push(HEX[((b >> 4) & 0xF) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
}

fn format_datetime(dt: &time::OffsetDateTime) -> String {
    // 四舍五入到微秒：+500ns
    let rounded = dt
        .checked_add(time::Duration::nanoseconds(500))
        .unwrap_or(*dt);
    // 描述只包含 OffsetDateTime 具备的分量，格式化不会失败；兜底用 Display。
    rounded
        .format(DATETIME_FORMAT)
        .unwrap_or_else(|_| rounded.to_string())
}

impl From<()> for SqlValue {
    fn from(_: ()) -> Self {
        Self::Null
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

macro_rules! from_signed {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::I64(v as i64)
            }
        })+
    };
}

macro_rules! from_unsigned {
    ($($t:ty),+ $(,)?) => {
        $(impl From<$t> for SqlValue {
            fn from(v: $t) -> Self {
                Self::U64(v as u64)
            }
        })+
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        Self::F64(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::String(Cow::Owned(v))
    }
}

impl From<&'static str> for SqlValue {
    fn from(v: &'static str) -> Self {
        Self::String(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<time::OffsetDateTime> for SqlValue {
    fn from(v: time::OffsetDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        Self::from_option(v)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldText, SqlValue};
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn from_option_none_is_null() {
        assert_eq!(SqlValue::from_option::<i64>(None), SqlValue::Null);
        let v: SqlValue = Some(3_i32).into();
        assert_eq!(v, SqlValue::I64(3));
    }

    #[test]
    fn numbers_and_bools_are_raw() {
        assert_eq!(SqlValue::from(42_i64).to_field_text(), FieldText::raw("42"));
        assert_eq!(SqlValue::from(7_u8).to_field_text(), FieldText::raw("7"));
        assert_eq!(SqlValue::from(1.5_f64).to_field_text(), FieldText::raw("1.5"));
        assert_eq!(SqlValue::from(true).to_field_text(), FieldText::raw("TRUE"));
    }

    #[test]
    fn special_floats_are_quoted() {
        assert_eq!(
            SqlValue::from(f64::NAN).to_field_text(),
            FieldText::quoted("NaN")
        );
        assert_eq!(
            SqlValue::from(f64::NEG_INFINITY).to_field_text(),
            FieldText::quoted("-Infinity")
        );
    }

    #[test]
    fn strings_are_quoted_and_null_is_absent() {
        assert_eq!(
            SqlValue::from("O'Brien").to_field_text(),
            FieldText::quoted("O'Brien")
        );
        assert_eq!(SqlValue::Null.to_field_text(), FieldText::null());
    }

    #[test]
    fn bytes_render_as_hex_text() {
        assert_eq!(
            SqlValue::from(vec![0xde_u8, 0xad]).to_field_text(),
            FieldText::quoted("\\xDEAD")
        );
        assert_eq!(
            SqlValue::from(Vec::<u8>::new()).to_field_text(),
            FieldText::quoted("\\x")
        );
        assert_eq!(SqlValue::from(None::<Vec<u8>>).to_field_text(), FieldText::null());
    }

    #[test]
    fn datetime_rounds_to_micros_with_offset() {
        let dt = datetime!(2024-03-05 12:34:56.123456789 +08:00);
        assert_eq!(
            SqlValue::from(dt).to_field_text(),
            FieldText::quoted("2024-03-05 12:34:56.123457 +08:00")
        );
    }
}
