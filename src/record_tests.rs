#[cfg(test)]
mod tests {
    use crate::{Field, Record, SqlValue, ToRecord};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn fields_keep_declared_order() {
        let r = Record::new().with("b", 1_i64).with("a", "x").with("c", None::<i64>);
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.value("a"), Some("x"));
        assert_eq!(r.value("c"), None);
        assert_eq!(r.value("zzz"), None);
    }

    #[test]
    fn duplicate_column_replaces_in_place() {
        let mut r = Record::new().with("id", 1_i64).with("name", "a");
        r.push("id", "seven");
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(
            r.get("id"),
            Some(&Field {
                name: "id".to_string(),
                value: Some("seven".to_string()),
                raw: false,
            })
        );
    }

    #[test]
    fn raw_and_text_entries() {
        let mut r = Record::new().with_raw("at", "now()");
        r.push_text("note", None);
        r.push_text("tag", Some("t".to_string()));
        assert!(r.get("at").is_some_and(|f| f.raw));
        assert!(r.get("tag").is_some_and(|f| !f.raw));
        assert_eq!(r.value("note"), None);
    }

    #[test]
    fn project_drops_excluded_columns() {
        let r = Record::new().with("id", 1_i64).with("secret", "s").with("name", "n");
        let exclude: HashSet<String> = ["secret".to_string()].into_iter().collect();
        let p = r.project(&exclude);
        assert_eq!(p.columns().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(!p.is_empty());
    }

    #[test]
    fn collect_from_pairs() {
        let r: Record = vec![("id", SqlValue::from(3_i64)), ("name", SqlValue::from("z"))]
            .into_iter()
            .collect();
        assert_eq!(r.value("id"), Some("3"));
        assert!(r.get("id").is_some_and(|f| f.raw));
        assert_eq!(r.to_record(), r);
        assert_eq!((&r).to_record(), r);
    }
}
