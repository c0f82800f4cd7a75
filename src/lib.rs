//! pg-bulk-sql：把内存中的表格数据翻译为 PostgreSQL 的批量 INSERT / UPDATE / MERGE 语句文本。
//!
//! 本库只生成 SQL 文本，不连接数据库；返回的语句由调用方自行执行。

pub mod chunk;
pub mod config;
pub mod encoder;
pub mod error;
pub mod identifier;
pub mod identity;
pub mod insert;
pub mod macros;
pub use crate::macros::*;
#[cfg(test)]
mod macros_tests;
pub mod merge;
pub mod record;
#[cfg(test)]
mod record_tests;
mod string_builder;
pub mod update;
pub mod value;

pub use crate::chunk::{Chunks, chunked};
pub use crate::config::{
    DefaultSettingsGuard, Settings, default_settings, set_default_settings,
    set_default_settings_scoped,
};
pub use crate::encoder::{
    Comparator, encode_assignment, encode_predicate, encode_value, quote_literal, unquote_literal,
};
pub use crate::error::BuildError;
pub use crate::identifier::{TableName, needs_case_preservation, quote_ident, quote_idents};
pub use crate::insert::{InsertBatches, InsertBuilder, NO_OP};
pub use crate::merge::{MergeBuilder, MergePlan, drop_table_if_exists};
pub use crate::record::{Field, Record, ToRecord};
pub use crate::update::{SetWhereRow, UpdateBuilder};
pub use crate::value::{FieldText, SqlValue};

/// 便捷命名空间：允许 `use pg_bulk_sql::sqlgen::{...}` 形式导入。
pub mod sqlgen {
    pub use crate::*;
}
