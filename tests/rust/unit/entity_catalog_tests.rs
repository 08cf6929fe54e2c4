//! Unit tests for entity resolution: tag grammar, labels and omission
//!
//! Covers hand-written `Entity` impls as well as `cypher_entity!` types.

#[cfg(test)]
mod entity_catalog_tests {
    use cypher_norm::cypher_entity;
    use cypher_norm::entity_catalog::{
        Entity, EntityError, EntitySchema, FieldSpec, FieldValues, Labels,
    };
    use cypher_norm::cypher_builder::QueryBuilder;
    use serde::Serialize;
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Dimensions {
        pub width: u32,
        pub height: u32,
    }

    cypher_entity! {
        #[derive(Debug, Clone, Default)]
        pub struct Item {
            pub name: String => "name",
            pub stock: Option<i64> => "stock,omitempty",
            pub note: Option<String> => "note,omitempty",
            pub size: Dimensions => "size,omitempty",
        }
    }

    cypher_entity! {
        #[derive(Debug, Clone, Default)]
        pub struct Account: "label:Account,Billing" {
            pub owner: String => "owner",
            pub balance: f64 => "balance,omitempty",
            pub frozen: bool => "frozen,omitempty",
            pub tags: Vec<String> => "tags,omitempty",
            pub created_by: String => ",omitempty",
            pub api_key: String => "-",
        }
    }

    cypher_entity! {
        #[derive(Debug, Default)]
        pub struct Duplicated {
            pub first: String => "name",
            pub second: String => "name",
        }
    }

    /// Entity implemented without the macro.
    struct Sensor {
        serial: String,
        reading: i64,
    }

    impl Entity for Sensor {
        fn schema() -> Result<&'static EntitySchema, EntityError> {
            static SCHEMA: OnceLock<Result<EntitySchema, EntityError>> = OnceLock::new();
            SCHEMA
                .get_or_init(|| {
                    EntitySchema::compile(
                        "Sensor",
                        Some("label:Device"),
                        &[
                            FieldSpec { field: "serial", tag: "serial" },
                            FieldSpec { field: "reading", tag: "value,omitempty" },
                        ],
                    )
                })
                .as_ref()
                .map_err(Clone::clone)
        }

        fn field_values(&self) -> Result<FieldValues, EntityError> {
            Ok(vec![
                ("serial", json!(self.serial)),
                ("reading", json!(self.reading)),
            ])
        }
    }

    #[test]
    fn test_labels_follow_tag_order() {
        let descriptor = Account::default().describe().unwrap();
        let labels: Vec<&str> = descriptor.labels.iter().map(String::as_str).collect();
        assert_eq!(labels, vec!["Account", "Billing"]);
    }

    #[test]
    fn test_omitempty_keeps_false_and_drops_zero_values() {
        let account = Account {
            owner: "alice".to_string(),
            ..Default::default()
        };
        let descriptor = account.describe().unwrap();

        assert_eq!(descriptor.properties.get("owner"), Some(&json!("alice")));
        assert_eq!(descriptor.properties.get("frozen"), Some(&json!(false)));
        assert!(!descriptor.properties.contains_key("balance"));
        assert!(!descriptor.properties.contains_key("tags"));
        assert!(!descriptor.properties.contains_key("created_by"));
        assert!(!descriptor.properties.contains_key("api_key"));
    }

    #[test]
    fn test_non_zero_values_are_emitted() {
        let account = Account {
            owner: "bob".to_string(),
            balance: 12.5,
            frozen: true,
            tags: vec!["vip".to_string()],
            created_by: "admin".to_string(),
            api_key: "secret".to_string(),
        };
        let descriptor = account.describe().unwrap();

        assert_eq!(descriptor.properties.get("balance"), Some(&json!(12.5)));
        assert_eq!(descriptor.properties.get("tags"), Some(&json!(["vip"])));
        assert_eq!(descriptor.properties.get("created_by"), Some(&json!("admin")));
        assert!(!descriptor.properties.contains_key("api_key"));
    }

    #[test]
    fn test_schema_property_names_exclude_dash_fields() {
        let schema = Account::schema().unwrap();
        let names: Vec<&str> = schema.property_names().collect();
        assert_eq!(names, vec!["owner", "balance", "frozen", "tags", "created_by"]);
    }

    #[test]
    fn test_duplicate_property_names_fail_resolution() {
        let err = Duplicated::default().describe().unwrap_err();
        assert!(matches!(err, EntityError::DuplicateProperty { ref property, .. } if property == "name"));
    }

    #[test]
    fn test_hand_written_entity() {
        let sensor = Sensor {
            serial: "SN-1".to_string(),
            reading: 0,
        };
        let descriptor = sensor.describe().unwrap();
        assert_eq!(descriptor.labels, ["Device"].into_iter().collect::<Labels>());
        assert_eq!(descriptor.properties.len(), 1);
        assert_eq!(descriptor.properties.get("serial"), Some(&json!("SN-1")));
    }

    #[test]
    fn test_present_zero_options_are_kept() {
        let item = Item {
            name: "x".to_string(),
            stock: Some(0),
            note: Some(String::new()),
            ..Default::default()
        };
        let descriptor = item.describe().unwrap();

        assert_eq!(descriptor.properties.get("stock"), Some(&json!(0)));
        assert_eq!(descriptor.properties.get("note"), Some(&json!("")));

        let result = QueryBuilder::new()
            .create_entity(&item)
            .alias("i")
            .build()
            .unwrap();
        assert_eq!(
            result.query,
            "CREATE (i:Item {name: $name_1, note: $note_2, stock: $stock_3})"
        );
        assert_eq!(result.parameters.get("stock_3"), Some(&json!(0)));
    }

    #[test]
    fn test_absent_options_and_zero_structs_are_omitted() {
        let item = Item {
            name: "x".to_string(),
            ..Default::default()
        };
        let descriptor = item.describe().unwrap();
        assert_eq!(descriptor.properties.len(), 1);
        assert!(!descriptor.properties.contains_key("stock"));
        assert!(!descriptor.properties.contains_key("size"));

        let sized = Item {
            size: Dimensions { width: 3, height: 0 },
            ..item
        };
        assert_eq!(
            sized.describe().unwrap().properties.get("size"),
            Some(&json!({"width": 3, "height": 0}))
        );
    }
}
