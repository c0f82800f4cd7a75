#[cfg(test)]
mod tests {
    use crate::{InsertBuilder, Settings, ToRecord, UpdateBuilder, set_default_settings_scoped};
    use pretty_assertions::assert_eq;

    #[derive(Clone)]
    struct Person {
        person_id: i64,
        first_name: String,
        nickname: Option<String>,
        updated_at: &'static str,
    }

    crate::sql_record! {
        impl Person {
            person_id: { column: "PersonId" },
            first_name: { column: "FirstName" },
            nickname: { column: "Nickname" },
            updated_at: { column: "UpdatedAt", raw: true },
        }
    }

    fn people() -> Vec<Person> {
        vec![
            Person {
                person_id: 1,
                first_name: "John Smith".to_string(),
                nickname: None,
                updated_at: "now()",
            },
            Person {
                person_id: 2,
                first_name: "Soroush Sakhaei".to_string(),
                nickname: Some("Sor".to_string()),
                updated_at: "now()",
            },
        ]
    }

    #[test]
    fn sql_record_preserves_field_order() {
        let r = people()[0].to_record();
        assert_eq!(
            r.columns().collect::<Vec<_>>(),
            vec!["PersonId", "FirstName", "Nickname", "UpdatedAt"]
        );
        assert_eq!(r.value("PersonId"), Some("1"));
        assert_eq!(r.value("Nickname"), None);
        assert!(r.get("UpdatedAt").is_some_and(|f| f.raw));
        assert!(r.get("FirstName").is_some_and(|f| !f.raw));
    }

    #[test]
    fn adapted_structs_feed_builders() {
        let _g = set_default_settings_scoped(Settings::default());
        let rows = people();
        let sql = InsertBuilder::new("person").build(&rows).unwrap();
        assert_eq!(
            sql,
            "INSERT INTO person (\"PersonId\", \"FirstName\", \"Nickname\", \"UpdatedAt\") VALUES \
             (1, 'John Smith', DEFAULT, now()),\n(2, 'Soroush Sakhaei', 'Sor', now());"
        );

        let mut ub = UpdateBuilder::new("person");
        ub.key_columns(["PersonId"]);
        let sql = ub.build(&rows[..1]).unwrap();
        assert_eq!(
            sql,
            "UPDATE \"person\" SET \"FirstName\"='John Smith', \"Nickname\" = NULL, \
             \"UpdatedAt\"=now() WHERE \"PersonId\"='1';\n"
        );
    }
}
