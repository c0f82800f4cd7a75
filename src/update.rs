//! UpdateBuilder：每条记录生成一条 UPDATE 语句。
//!
//! 两种形式：
//! - `build`：按主键列定位行，SET 其余列；主键列为空时省略 WHERE（会更新整张表）。
//! - `build_set_where`：SET 与 WHERE 来自两条独立的记录，WHERE 可以用等值或 LIKE 比较。

use crate::encoder::{Comparator, encode_assignment, encode_predicate};
use crate::error::BuildError;
use crate::identifier::{TableName, quote_ident};
use crate::insert::NO_OP;
use crate::macros::{IntoStrings, collect_into_strings};
use crate::record::{Record, RowSet, ToRecord};
use crate::string_builder::StringBuilder;
use std::collections::HashSet;

/// 一对 (SET 数据, WHERE 数据)。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetWhereRow<S, W> {
    pub set: S,
    pub where_: W,
}

impl<S, W> SetWhereRow<S, W> {
    pub fn new(set: S, where_: W) -> Self {
        Self { set, where_ }
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: TableName,
    key_columns: Vec<String>,
    unquoted: HashSet<String>,
    comparator: Comparator,
}

impl UpdateBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: TableName::new(table),
            key_columns: Vec::new(),
            unquoted: HashSet::new(),
            comparator: Comparator::Equal,
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// 定位行的主键列。为空时不生成 WHERE。
    pub fn key_columns<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.key_columns = collect_into_strings(cols);
        self
    }

    /// SET 中值原样输出、不加引号的列。
    pub fn unquoted<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.unquoted = collect_into_strings(cols).into_iter().collect();
        self
    }

    /// `build_set_where` 的 WHERE 比较方式。
    pub fn comparator(&mut self, cmp: Comparator) -> &mut Self {
        self.comparator = cmp;
        self
    }

    /// 主键形式：`UPDATE "t" SET "c"='v',... WHERE "k"='v' AND ...;`
    pub fn build<I>(&self, rows: I) -> Result<String, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        let Some(set) = RowSet::collect(self.table.original(), rows, &HashSet::new())? else {
            return Ok(NO_OP.to_string());
        };
        if set.columns.iter().all(|c| self.key_columns.contains(c)) {
            return Err(BuildError::NoColumns {
                table: self.table.original().to_string(),
            });
        }

        let mut buf = self.open();
        for row in &set.rows {
            let assignments: Vec<String> = row
                .fields()
                .iter()
                .filter(|f| !self.key_columns.contains(&f.name))
                .map(|f| self.assignment(f.name.as_str(), f.value.as_deref(), f.raw))
                .collect();
            let predicates: Vec<String> = self
                .key_columns
                .iter()
                .map(|k| encode_predicate(&quote_ident(k), row.value(k), Comparator::Equal))
                .collect();
            self.write_statement(&mut buf, &assignments, &predicates);
        }
        if self.key_columns.is_empty() {
            tracing::debug!(table = %self.table.original(), "update without key columns touches every row");
        }
        tracing::debug!(table = %self.table.original(), rows = set.len(), "generated update block");
        Ok(self.close(buf))
    }

    /// SET/WHERE 成对形式；WHERE 记录为空时省略 WHERE。
    pub fn build_set_where<I, S, W>(&self, pairs: I) -> Result<String, BuildError>
    where
        I: IntoIterator<Item = SetWhereRow<S, W>>,
        S: ToRecord,
        W: ToRecord,
    {
        let mut buf = self.open();
        let mut rows = 0usize;
        for pair in pairs {
            let set: Record = pair.set.to_record();
            let where_: Record = pair.where_.to_record();
            if set.is_empty() {
                return Err(BuildError::NoColumns {
                    table: self.table.original().to_string(),
                });
            }
            let assignments: Vec<String> = set
                .fields()
                .iter()
                .map(|f| self.assignment(f.name.as_str(), f.value.as_deref(), f.raw))
                .collect();
            let predicates: Vec<String> = where_
                .fields()
                .iter()
                .map(|f| encode_predicate(&quote_ident(&f.name), f.value.as_deref(), self.comparator))
                .collect();
            self.write_statement(&mut buf, &assignments, &predicates);
            rows += 1;
        }
        if rows == 0 {
            return Ok(NO_OP.to_string());
        }
        tracing::debug!(
            table = %self.table.original(),
            rows,
            comparator = ?self.comparator,
            "generated set/where update block"
        );
        Ok(self.close(buf))
    }

    fn assignment(&self, column: &str, value: Option<&str>, raw: bool) -> String {
        let unquoted = raw || self.unquoted.contains(column);
        encode_assignment(&quote_ident(column), value, unquoted)
    }

    fn open(&self) -> StringBuilder {
        let mut buf = StringBuilder::new();
        if let Some(rename) = self.table.rename_in() {
            buf.write_str(&rename);
            buf.write_char('\n');
        }
        buf
    }

    fn close(&self, mut buf: StringBuilder) -> String {
        if let Some(rename) = self.table.rename_out() {
            buf.write_str(&rename);
            buf.write_char('\n');
        }
        buf.into_string()
    }

    fn write_statement(&self, buf: &mut StringBuilder, assignments: &[String], predicates: &[String]) {
        buf.write_str("UPDATE ");
        buf.write_str(&quote_ident(self.table.working()));
        buf.write_str(" SET ");
        buf.write_strings(assignments, ", ");
        if !predicates.is_empty() {
            buf.write_str(" WHERE ");
            buf.write_strings(predicates, " AND ");
        }
        buf.write_str(";\n");
    }
}
