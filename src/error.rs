//! 生成阶段的错误类型。

/// 构建语句时的错误。
///
/// “没有记录”不是错误：各 builder 会返回空语句 `;`。
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    #[error(
        "record #{index} has columns [{}], expected [{}] (taken from the first record)",
        .found.join(", "),
        .expected.join(", ")
    )]
    ShapeMismatch {
        index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("no columns left for table {table} after applying exclusions")]
    NoColumns { table: String },
    #[error("{name} must be greater than zero")]
    InvalidBatchSize { name: &'static str },
}
