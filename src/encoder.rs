//! 值编码：把一个可能为 NULL 的文本值编码为可嵌入 VALUES / SET / WHERE 的 SQL 片段。
//!
//! 唯一的转义规则是把单引号加倍；其它字符原样保留。

/// 表示“使用列默认值”的关键字（INSERT 中的 NULL 值）。
pub const DEFAULT_KEYWORD: &str = "DEFAULT";

/// 判空谓词。
pub const IS_NULL: &str = "IS NULL";

/// 赋空值。
pub const EQUALS_NULL: &str = "= NULL";

/// 谓词比较方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Comparator {
    /// `"col"='v'` / `"col" IS NULL`
    #[default]
    Equal,
    /// `"col" LIKE 'v'` / `"col" IS NULL`
    Like,
}

/// 单引号包裹并把内部单引号加倍。
pub fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// 把 `''` 还原为 `'` 并去掉外层引号；是 [`quote_literal`] 的逆操作。
pub fn unquote_literal(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

/// INSERT 的 VALUES 项：NULL 编码为 `DEFAULT`，`unquoted` 时原样输出。
pub fn encode_value(value: Option<&str>, unquoted: bool) -> String {
    match value {
        None => DEFAULT_KEYWORD.to_string(),
        Some(v) if unquoted => v.to_string(),
        Some(v) => quote_literal(v),
    }
}

/// SET 子句的一项：`"col"='v'`，NULL 编码为 `"col" = NULL`。
pub fn encode_assignment(quoted_column: &str, value: Option<&str>, unquoted: bool) -> String {
    match value {
        None => format!("{quoted_column} {EQUALS_NULL}"),
        Some(v) if unquoted => format!("{quoted_column}={v}"),
        Some(v) => format!("{quoted_column}={}", quote_literal(v)),
    }
}

/// WHERE 子句的一项。值总是加引号，交给数据库按列类型转换；NULL 一律退化为 `IS NULL`。
pub fn encode_predicate(quoted_column: &str, value: Option<&str>, cmp: Comparator) -> String {
    match (value, cmp) {
        (None, _) => format!("{quoted_column} {IS_NULL}"),
        (Some(v), Comparator::Equal) => format!("{quoted_column}={}", quote_literal(v)),
        (Some(v), Comparator::Like) => format!("{quoted_column} LIKE {}", quote_literal(v)),
    }
}
