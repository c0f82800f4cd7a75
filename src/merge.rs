//! MergeBuilder：基于临时表的 upsert（可选删除未出现的行）。
//!
//! 返回的是有序的语句块列表，必须按顺序执行：
//! 1. setup：（改名）-> 删除残留临时表 -> 按目标表列克隆空临时表 -> 临时表去 identity -> 列默认值；
//! 2. populate：每个外层分组一块，向临时表批量 INSERT；
//! 3. reconcile：临时表 SET 片段 -> 删除目标表中缺失的行 -> 更新匹配行 -> 插入新行（含 identity 挂起/恢复）；
//! 4. teardown：删除临时表 ->（改回原名）。

use crate::chunk::{chunked, group_size};
use crate::config::default_settings;
use crate::error::BuildError;
use crate::identifier::{TableName, quote_ident, quote_idents};
use crate::identity;
use crate::insert::{InsertBuilder, NO_OP};
use crate::macros::{IntoStrings, collect_into_strings};
use crate::record::{RowSet, ToRecord};
use crate::string_builder::StringBuilder;
use std::collections::{BTreeMap, HashSet};

/// 按阶段划分的 MERGE 语句。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub setup: String,
    pub populate: Vec<String>,
    pub reconcile: String,
    pub teardown: String,
}

impl MergePlan {
    /// 展开为可依次执行的语句块列表。
    pub fn into_statements(self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.populate.len() + 3);
        out.push(self.setup);
        out.extend(self.populate);
        out.push(self.reconcile);
        out.push(self.teardown);
        out
    }
}

#[derive(Debug, Clone)]
pub struct MergeBuilder {
    table: TableName,
    key_columns: Vec<String>,
    natural_key_columns: Option<Vec<String>>,
    identity: Vec<String>,
    batch_row_count: usize,
    multi_line_num: usize,
    staging_suffix: String,
    set_sql: Option<String>,
    delete_unspecified_rows: bool,
    column_defaults: BTreeMap<String, String>,
    unquoted: HashSet<String>,
}

impl MergeBuilder {
    pub fn new(table: &str) -> Self {
        let settings = default_settings();
        Self {
            table: TableName::new(table),
            key_columns: Vec::new(),
            natural_key_columns: None,
            identity: Vec::new(),
            batch_row_count: settings.batch_row_count,
            multi_line_num: settings.multi_line_num,
            staging_suffix: settings.staging_suffix,
            set_sql: None,
            delete_unspecified_rows: false,
            column_defaults: BTreeMap::new(),
            unquoted: HashSet::new(),
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// 主键列：不参与“更新匹配行”的 SET 列表；未指定业务键时也作为匹配键。
    pub fn key_columns<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.key_columns = collect_into_strings(cols);
        self
    }

    /// 业务键（匹配键），缺省等于主键列。显式传入空列表会把 MERGE 退化为整批追加。
    pub fn natural_key_columns<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.natural_key_columns = Some(collect_into_strings(cols));
        self
    }

    pub fn identity_columns<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.identity = collect_into_strings(cols);
        self
    }

    /// 每个 populate 语句块最多包含的行数。
    pub fn batch_row_count(&mut self, n: usize) -> &mut Self {
        self.batch_row_count = n;
        self
    }

    /// populate 阶段单条 INSERT 合并的行数。
    pub fn multi_line_num(&mut self, n: usize) -> &mut Self {
        self.multi_line_num = n;
        self
    }

    pub fn staging_suffix(&mut self, suffix: impl Into<String>) -> &mut Self {
        self.staging_suffix = suffix.into();
        self
    }

    /// 在对账前作用于临时表的 SET 片段，例如 `SET "status" = 'imported'`。
    pub fn set_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        self.set_sql = Some(sql.into());
        self
    }

    /// 删除目标表中业务键未出现在本次数据里的行。
    pub fn delete_unspecified_rows(&mut self, yes: bool) -> &mut Self {
        self.delete_unspecified_rows = yes;
        self
    }

    /// 临时表的列默认值（SQL 表达式，原样输出）。
    pub fn column_default(&mut self, column: impl Into<String>, expr: impl Into<String>) -> &mut Self {
        self.column_defaults.insert(column.into(), expr.into());
        self
    }

    pub fn unquoted<T: IntoStrings>(&mut self, cols: T) -> &mut Self {
        self.unquoted = collect_into_strings(cols).into_iter().collect();
        self
    }

    /// 临时表名：小写表名 + 后缀。
    pub fn staging_table(&self) -> String {
        format!("{}{}", self.table.working(), self.staging_suffix).to_lowercase()
    }

    /// 生成按顺序执行的语句块列表；没有记录时返回 `[";"]`。
    pub fn build<I>(&self, rows: I) -> Result<Vec<String>, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        Ok(match self.plan(rows)? {
            Some(plan) => plan.into_statements(),
            None => vec![NO_OP.to_string()],
        })
    }

    /// 生成分阶段的 MERGE 语句；没有记录时返回 `None`。
    pub fn plan<I>(&self, rows: I) -> Result<Option<MergePlan>, BuildError>
    where
        I: IntoIterator,
        I::Item: ToRecord,
    {
        let multi = group_size(self.multi_line_num, "multi_line_num")?;
        let batch = group_size(self.batch_row_count, "batch_row_count")?;
        let Some(set) = RowSet::collect(self.table.original(), rows, &HashSet::new())? else {
            return Ok(None);
        };

        let staging = self.staging_table();
        let setup = self.setup(&staging, &set.columns);

        let mut populate_builder = InsertBuilder::new(&staging);
        populate_builder.unquoted(self.unquoted.iter().cloned().collect::<Vec<_>>());
        let populate: Vec<String> = chunked(&set.rows, batch)
            .map(|group| populate_builder.render(&set.columns, &group, multi))
            .collect();

        let reconcile = self.reconcile(&staging, &set.columns);
        let teardown = self.teardown(&staging);

        tracing::debug!(
            table = %self.table.original(),
            staging = %staging,
            rows = set.len(),
            populate_blocks = populate.len(),
            delete_unspecified_rows = self.delete_unspecified_rows,
            "generated merge plan"
        );
        Ok(Some(MergePlan {
            setup,
            populate,
            reconcile,
            teardown,
        }))
    }

    fn natural_keys(&self) -> &[String] {
        self.natural_key_columns
            .as_deref()
            .unwrap_or(&self.key_columns)
    }

    fn setup(&self, staging: &str, columns: &[String]) -> String {
        let mut buf = StringBuilder::new();
        if let Some(rename) = self.table.rename_in() {
            buf.write_line(&rename);
        }
        buf.write_line(&drop_table_if_exists(staging));
        buf.write_line(&format!(
            "SELECT {} INTO {} FROM {} FETCH FIRST 0 ROWS ONLY;",
            quote_idents(columns),
            quote_ident(staging),
            quote_ident(self.table.working())
        ));
        buf.write_lines(identity::suspend_all(staging, &self.identity));
        for (column, expr) in &self.column_defaults {
            buf.write_line(&format!(
                "Alter Table {staging} Alter Column {} Set Default {expr};",
                quote_ident(column)
            ));
        }
        buf.into_string()
    }

    fn reconcile(&self, staging: &str, columns: &[String]) -> String {
        let table = self.table.working();
        let staging_q = quote_ident(staging);
        let keys = self.natural_keys();
        let mut buf = StringBuilder::new();

        if let Some(sql) = &self.set_sql {
            buf.write_line(&format!(
                "UPDATE {staging_q} {};",
                sql.trim().trim_end_matches(';')
            ));
        }

        if self.delete_unspecified_rows && !keys.is_empty() {
            let on = join_keys(keys, |k| format!("a.{k} = b.{k}", k = quote_ident(k)), " AND ");
            let missing = join_keys(keys, |k| format!("b.{} IS NULL", quote_ident(k)), " OR ");
            buf.write_line(&format!(
                "DELETE FROM {table} WHERE ctid IN (SELECT a.ctid FROM {table} AS a LEFT JOIN {staging_q} AS b ON {on} WHERE {missing});"
            ));
        }

        let set_columns: Vec<&String> = columns
            .iter()
            .filter(|c| !self.key_columns.contains(c) && !keys.contains(c))
            .collect();
        if !keys.is_empty() && !set_columns.is_empty() {
            let assignments: Vec<String> = set_columns
                .iter()
                .map(|c| format!("{c} = {staging_q}.{c}", c = quote_ident(c)))
                .collect();
            let matched = join_keys(
                keys,
                |k| format!("{staging_q}.{k} = {table}.{k}", k = quote_ident(k)),
                " AND ",
            );
            buf.write_line(&format!(
                "UPDATE {table} SET {} FROM {staging_q} WHERE {matched};",
                assignments.join(", ")
            ));
        }

        buf.write_lines(identity::suspend_all(table, &self.identity));

        let select_list = columns
            .iter()
            .map(|c| format!("A.{}", quote_ident(c)))
            .collect::<Vec<_>>()
            .join(", ");
        let mut insert = format!(
            "INSERT INTO {table} ({}) SELECT {select_list} FROM {staging_q} AS A",
            quote_idents(columns)
        );
        if !keys.is_empty() {
            let on = join_keys(keys, |k| format!("A.{k} = B.{k}", k = quote_ident(k)), " AND ");
            let absent = join_keys(keys, |k| format!("B.{} IS NULL", quote_ident(k)), " OR ");
            insert.push_str(&format!(" LEFT JOIN {table} AS B ON {on} WHERE {absent}"));
        } else {
            tracing::debug!(table = %self.table.original(), "merge without natural key appends every staged row");
        }
        insert.push(';');
        buf.write_line(&insert);

        buf.write_lines(identity::restore_all(table, &self.identity));
        buf.into_string()
    }

    fn teardown(&self, staging: &str) -> String {
        let mut buf = StringBuilder::new();
        buf.write_line(&drop_table_if_exists(staging));
        if let Some(rename) = self.table.rename_out() {
            buf.write_line(&rename);
        }
        buf.into_string()
    }
}

/// `DROP TABLE IF EXISTS "t";`
pub fn drop_table_if_exists(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {};", quote_ident(table))
}

fn join_keys(keys: &[String], f: impl Fn(&str) -> String, sep: &str) -> String {
    keys.iter()
        .map(|k| f(k.as_str()))
        .collect::<Vec<_>>()
        .join(sep)
}
