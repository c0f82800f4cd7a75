//! Record：有序的“列名 -> 可选文本值”映射，以及把业务对象转换为 Record 的适配 trait。
//!
//! 所有 builder 都只认 Record；业务 struct 可以通过 [`sql_record!`](crate::sql_record) 宏
//! 按声明顺序生成 [`ToRecord`] 实现。

use crate::error::BuildError;
use crate::value::{FieldText, SqlValue};
use std::collections::HashSet;

/// Record 中的一列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// `None` 表示 SQL NULL。
    pub value: Option<String>,
    /// 原样拼入 SQL，不加引号。
    pub raw: bool,
}

/// 一行数据。列名在同一个 Record 内唯一，顺序即声明顺序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式追加一列。
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.push(name, value);
        self
    }

    /// 链式追加一个原样输出的 SQL 表达式列。
    pub fn with_raw(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.push_raw(name, expr);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<SqlValue>) {
        let FieldText { value, raw } = value.into().to_field_text();
        self.push_field(Field {
            name: name.into(),
            value,
            raw,
        });
    }

    pub fn push_raw(&mut self, name: impl Into<String>, expr: impl Into<String>) {
        self.push_field(Field {
            name: name.into(),
            value: Some(expr.into()),
            raw: true,
        });
    }

    /// 追加一个已经是文本形态的值（记录适配器的最底层入口）。
    pub fn push_text(&mut self, name: impl Into<String>, value: Option<String>) {
        self.push_field(Field {
            name: name.into(),
            value,
            raw: false,
        });
    }

    /// 同名列会就地覆盖，保持列的首次出现位置。
    pub fn push_field(&mut self, field: Field) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 列值；列不存在或值为 NULL 时都返回 `None`。
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.value.as_deref())
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 去掉 `exclude` 中的列。
    pub fn project(&self, exclude: &HashSet<String>) -> Record {
        Record {
            fields: self
                .fields
                .iter()
                .filter(|f| !exclude.contains(&f.name))
                .cloned()
                .collect(),
        }
    }

    fn same_shape(&self, columns: &[String]) -> bool {
        self.fields.len() == columns.len()
            && self.fields.iter().zip(columns).all(|(f, c)| &f.name == c)
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<SqlValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.push(k, v);
        }
        r
    }
}

/// 记录适配器：把任意“长得像一行”的值转成 Record，并保持字段声明顺序。
pub trait ToRecord {
    fn to_record(&self) -> Record;
}

impl ToRecord for Record {
    fn to_record(&self) -> Record {
        self.clone()
    }
}

impl<T: ToRecord + ?Sized> ToRecord for &T {
    fn to_record(&self) -> Record {
        (**self).to_record()
    }
}

/// 经过形状校验的一组记录：所有记录的列名与顺序都与首条记录一致。
#[derive(Debug, Clone)]
pub(crate) struct RowSet {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Record>,
}

impl RowSet {
    /// 适配、投影并校验记录；没有记录时返回 `Ok(None)`。
    pub(crate) fn collect<I>(
        table: &str,
        rows: I,
        exclude: &HashSet<String>,
    ) -> Result<Option<Self>, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        let rows: Vec<Record> = rows
            .into_iter()
            .map(|r| {
                let r = r.to_record();
                if exclude.is_empty() {
                    r
                } else {
                    r.project(exclude)
                }
            })
            .collect();
        Self::from_records(table, rows)
    }

    pub(crate) fn from_records(table: &str, rows: Vec<Record>) -> Result<Option<Self>, BuildError> {
        let Some(first) = rows.first() else {
            return Ok(None);
        };
        if first.is_empty() {
            return Err(BuildError::NoColumns {
                table: table.to_string(),
            });
        }

        let columns: Vec<String> = first.columns().map(str::to_string).collect();
        if let Some((index, bad)) = rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, r)| !r.same_shape(&columns))
        {
            return Err(BuildError::ShapeMismatch {
                index,
                expected: columns,
                found: bad.columns().map(str::to_string).collect(),
            });
        }

        Ok(Some(Self { columns, rows }))
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}

#[doc(hidden)]
pub fn push_adapted(record: &mut Record, column: &str, value: impl Into<SqlValue>, raw: bool) {
    let FieldText { value, raw: value_raw } = value.into().to_field_text();
    record.push_field(Field {
        name: column.to_string(),
        value,
        raw: raw || value_raw,
    });
}
