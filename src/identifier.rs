//! 标识符：双引号包裹，以及大小写混合表名的改名包围。
//!
//! PostgreSQL 会把未加引号的标识符折叠为小写。表名含大写字母时，先把物理表改名为
//! 小写名，所有语句都针对小写名生成，最后再改回原名。

/// 双引号包裹标识符。列名/表名由调用方保证可信，不做其它转义。
pub fn quote_ident(name: &str) -> String {
    format!("\"{name}\"")
}

/// 以 `, ` 连接的引号列名列表。
pub fn quote_idents<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|n| quote_ident(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 一次生成调用中的表名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    original: String,
    working: String,
}

impl TableName {
    pub fn new(name: impl Into<String>) -> Self {
        let original = name.into();
        let working = if needs_case_preservation(&original) {
            original.to_lowercase()
        } else {
            original.clone()
        };
        Self { original, working }
    }

    /// 调用方传入的表名。
    pub fn original(&self) -> &str {
        &self.original
    }

    /// 语句中实际使用的表名（大小写混合时为小写形式）。
    pub fn working(&self) -> &str {
        &self.working
    }

    pub fn is_renamed(&self) -> bool {
        self.original != self.working
    }

    /// `Alter Table "Person" Rename To person;`
    pub fn rename_in(&self) -> Option<String> {
        self.is_renamed().then(|| {
            format!(
                "Alter Table {} Rename To {};",
                quote_ident(&self.original),
                self.working
            )
        })
    }

    /// `Alter Table person Rename To "Person";`
    pub fn rename_out(&self) -> Option<String> {
        self.is_renamed().then(|| {
            format!(
                "Alter Table {} Rename To {};",
                self.working,
                quote_ident(&self.original)
            )
        })
    }
}

/// 是否含大写字母。
pub fn needs_case_preservation(name: &str) -> bool {
    name.chars().any(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mixed_case_table_is_bracketed() {
        let t = TableName::new("Person");
        assert!(t.is_renamed());
        assert_eq!(t.working(), "person");
        assert_eq!(t.original(), "Person");
        assert_eq!(
            t.rename_in().as_deref(),
            Some("Alter Table \"Person\" Rename To person;")
        );
        assert_eq!(
            t.rename_out().as_deref(),
            Some("Alter Table person Rename To \"Person\";")
        );
    }

    #[test]
    fn lower_case_table_is_left_alone() {
        let t = TableName::new("people");
        assert!(!t.is_renamed());
        assert_eq!(t.working(), "people");
        assert_eq!(t.rename_in(), None);
        assert_eq!(t.rename_out(), None);
    }

    #[test]
    fn quote_idents_joins() {
        assert_eq!(quote_idents(["id", "name"]), "\"id\", \"name\"");
        assert_eq!(quote_ident("PersonId"), "\"PersonId\"");
    }
}
