//! 自增（identity）列的挂起与恢复语句。
//!
//! 显式写入 identity 列前要先去掉它的自动生成属性；写完后重新加回，并把背后的序列
//! 同步到表中当前最大值，否则序列会落后于已写入的最大主键。

use crate::identifier::quote_ident;

/// `Alter Table t Alter Column "id" Drop Identity If Exists;`
pub fn drop_identity(table: &str, column: &str) -> String {
    format!(
        "Alter Table {table} Alter Column {} Drop Identity If Exists;",
        quote_ident(column)
    )
}

/// `Alter Table t Alter Column "id" Add Generated Always As Identity;`
pub fn add_identity(table: &str, column: &str) -> String {
    format!(
        "Alter Table {table} Alter Column {} Add Generated Always As Identity;",
        quote_ident(column)
    )
}

/// `select setval(pg_get_serial_sequence('t', 'id'), (select max("id") from t));`
pub fn resync_sequence(table: &str, column: &str) -> String {
    format!(
        "select setval(pg_get_serial_sequence('{table}', '{column}'), (select max({}) from {table}));",
        quote_ident(column)
    )
}

/// 每个 identity 列一条 drop 语句。
pub fn suspend_all(table: &str, columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| drop_identity(table, c)).collect()
}

/// 每个 identity 列依次：重新加回自动生成、同步序列。
pub fn restore_all(table: &str, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .flat_map(|c| [add_identity(table, c), resync_sequence(table, c)])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn suspend_and_restore_statements() {
        let cols = vec!["id".to_string(), "seq".to_string()];
        assert_eq!(
            suspend_all("person", &cols),
            vec![
                "Alter Table person Alter Column \"id\" Drop Identity If Exists;",
                "Alter Table person Alter Column \"seq\" Drop Identity If Exists;",
            ]
        );
        assert_eq!(
            restore_all("person", &cols[..1]),
            vec![
                "Alter Table person Alter Column \"id\" Add Generated Always As Identity;",
                "select setval(pg_get_serial_sequence('person', 'id'), (select max(\"id\") from person));",
            ]
        );
    }

    #[test]
    fn no_identity_columns_no_statements() {
        assert!(suspend_all("t", &[]).is_empty());
        assert!(restore_all("t", &[]).is_empty());
    }
}
