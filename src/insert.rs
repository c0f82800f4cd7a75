//! InsertBuilder：为一组记录生成批量 INSERT 语句。
//!
//! 生成顺序：大小写改名 -> 挂起 identity 列 -> 按 `multi_line_num` 合并的若干 INSERT
//! -> 恢复 identity 列并同步序列 -> 改回原名。

use crate::chunk::{Chunks, chunked, group_size};
use crate::config::default_settings;
use crate::encoder::encode_value;
use crate::error::BuildError;
use crate::identifier::{TableName, quote_idents};
use crate::identity;
use crate::macros::{IntoStrings, collect_into_strings};
use crate::record::{Record, RowSet, ToRecord};
use crate::string_builder::StringBuilder;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::num::NonZeroUsize;

/// 没有任何记录时返回的空语句。
pub const NO_OP: &str = ";";

#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: TableName,
    multi_line_num: usize,
    batch_row_count: usize,
    identity: Vec<String>,
    returning: Vec<String>,
    exclude: HashSet<String>,
    unquoted: HashSet<String>,
}

impl InsertBuilder {
    pub fn new(table: &str) -> Self {
        let settings = default_settings();
        Self {
            table: TableName::new(table),
            multi_line_num: settings.multi_line_num,
            batch_row_count: settings.batch_row_count,
            identity: Vec::new(),
            returning: Vec::new(),
            exclude: HashSet::new(),
            unquoted: HashSet::new(),
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// 单条 INSERT 的 VALUES 列表最多合并的行数。
    pub fn multi_line_num(&mut self, n: usize) -> &mut Self {
        self.multi_line_num = n;
        self
    }

    /// `build_batches` 中每个独立语句组最多包含的行数。
    pub fn batch_row_count(&mut self, n: usize) -> &mut Self {
        self.batch_row_count = n;
        self
    }

    /// 需要显式写入的 identity 列。
    pub fn identity_columns<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.identity = collect_into_strings(cols);
        self
    }

    pub fn returning<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.returning = collect_into_strings(cols);
        self
    }

    /// 生成前从每条记录中去掉的列。
    pub fn exclude<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.exclude = collect_into_strings(cols).into_iter().collect();
        self
    }

    /// 值原样输出、不加引号的列。
    pub fn unquoted<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.unquoted = collect_into_strings(cols).into_iter().collect();
        self
    }

    /// 把全部记录生成到一个语句块里。
    pub fn build<I>(&self, rows: I) -> Result<String, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        let multi = group_size(self.multi_line_num, "multi_line_num")?;
        let Some(set) = RowSet::collect(self.table.original(), rows, &self.exclude)? else {
            return Ok(NO_OP.to_string());
        };
        Ok(self.render(&set.columns, &set.rows, multi))
    }

    /// 先按 `batch_row_count` 切分，再为每个分组单独生成一个语句块。
    ///
    /// 记录在这里就完成适配与形状校验；语句文本在迭代时才逐个生成。
    /// 没有记录时产生唯一一个空语句 `;`。
    pub fn build_batches<I>(&self, rows: I) -> Result<InsertBatches, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        let multi = group_size(self.multi_line_num, "multi_line_num")?;
        let batch = group_size(self.batch_row_count, "batch_row_count")?;
        let state = match RowSet::collect(self.table.original(), rows, &self.exclude)? {
            None => BatchState::Empty { done: false },
            Some(set) => BatchState::Rows {
                columns: set.columns,
                chunks: chunked(set.rows, batch),
            },
        };
        Ok(InsertBatches {
            builder: self.clone(),
            multi,
            state,
        })
    }

    pub(crate) fn render<R: Borrow<Record>>(
        &self,
        columns: &[String],
        rows: &[R],
        multi: NonZeroUsize,
    ) -> String {
        let table = self.table.working();
        let mut buf = StringBuilder::with_capacity(rows.len() * 32);

        if let Some(rename) = self.table.rename_in() {
            tracing::trace!(table = %self.table.original(), "bracketing insert with case-preserving rename");
            buf.write_line(&rename);
        }
        buf.write_lines(identity::suspend_all(table, &self.identity));

        let head = format!("INSERT INTO {table} ({}) VALUES ", quote_idents(columns));
        let mut statements = 0usize;
        for group in chunked(rows, multi) {
            let values: Vec<String> = group
                .iter()
                .map(|r| self.render_row(<R as Borrow<Record>>::borrow(*r)))
                .collect();
            let mut stmt = StringBuilder::new();
            stmt.write_str(&head);
            stmt.write_strings(&values, ",\n");
            if !self.returning.is_empty() {
                stmt.write_str(" RETURNING ");
                stmt.write_str(&quote_idents(&self.returning));
            }
            stmt.write_char(';');
            buf.write_line(&stmt.into_string());
            statements += 1;
        }

        buf.write_lines(identity::restore_all(table, &self.identity));
        if let Some(rename) = self.table.rename_out() {
            buf.write_line(&rename);
        }

        tracing::debug!(
            table = %self.table.original(),
            rows = rows.len(),
            statements,
            "generated insert block"
        );
        if buf.is_empty() {
            NO_OP.to_string()
        } else {
            buf.into_string()
        }
    }

    fn render_row(&self, row: &Record) -> String {
        let mut sb = StringBuilder::new();
        sb.write_char('(');
        let values: Vec<String> = row
            .fields()
            .iter()
            .map(|f| encode_value(f.value.as_deref(), f.raw || self.unquoted.contains(&f.name)))
            .collect();
        sb.write_str(&values.join(", "));
        sb.write_char(')');
        sb.into_string()
    }
}

#[derive(Debug, Clone)]
enum BatchState {
    Empty {
        done: bool,
    },
    Rows {
        columns: Vec<String>,
        chunks: Chunks<std::vec::IntoIter<Record>>,
    },
}

/// `InsertBuilder::build_batches` 返回的惰性语句序列；克隆后可从头重新生成。
#[derive(Debug, Clone)]
pub struct InsertBatches {
    builder: InsertBuilder,
    multi: NonZeroUsize,
    state: BatchState,
}

impl Iterator for InsertBatches {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.state {
            BatchState::Empty { done } => {
                if *done {
                    return None;
                }
                *done = true;
                Some(NO_OP.to_string())
            }
            BatchState::Rows { columns, chunks } => {
                let group = chunks.next()?;
                Some(self.builder.render(columns, &group, self.multi))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            BatchState::Empty { done } => {
                let n = usize::from(!*done);
                (n, Some(n))
            }
            BatchState::Rows { chunks, .. } => chunks.size_hint(),
        }
    }
}
