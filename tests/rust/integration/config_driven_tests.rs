//! Builder behavior under non-default configuration

#[cfg(test)]
mod config_driven_tests {
    use cypher_norm::cypher_builder::{node, Pattern, QueryBuilder, RelationshipPattern};
    use cypher_norm::{BuilderConfig, ValidationErrorKind};
    use std::io::Write;

    #[test]
    fn test_strict_mode_flags_unbound_literal_parameters() {
        let config = BuilderConfig {
            strict_mode: true,
            ..BuilderConfig::default()
        };
        let result = QueryBuilder::with_config(config)
            .match_("(u:User {username: $username})")
            .where_raw("u.age > $min_age")
            .set_parameter("username", "alice")
            .return_(["u"])
            .build()
            .unwrap();

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::UndefinedParameter);
        assert!(result.errors[0].message.contains("min_age"));
    }

    #[test]
    fn test_strict_mode_accepts_generated_parameters() {
        let config = BuilderConfig {
            strict_mode: true,
            ..BuilderConfig::default()
        };
        let path = Pattern::new(
            node("a", ["User"]).property("username", "alice"),
            RelationshipPattern::outgoing("FOLLOWS"),
            node("b", ["User"]),
        );
        let result = QueryBuilder::with_config(config)
            .match_path(&path)
            .unwind_values([1, 2, 3], "x")
            .return_(["b", "x"])
            .build()
            .unwrap();
        assert!(result.valid, "unexpected findings: {:?}", result.errors);
    }

    #[test]
    fn test_large_range_above_threshold_still_renders() {
        let config = BuilderConfig {
            max_hops_warning: 5,
            ..BuilderConfig::default()
        };
        let path = Pattern::new(
            node("a", ["Station"]),
            RelationshipPattern::both("LINK").var_length(1, 50),
            node("b", ["Station"]),
        );
        let result = QueryBuilder::with_config(config)
            .match_path(&path)
            .return_(["a", "b"])
            .build()
            .unwrap();
        assert!(result.query.starts_with("MATCH (a:Station)-[:LINK*1..50]-(b:Station)"));
    }

    #[test]
    fn test_custom_keywords_from_yaml() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "clause_keywords:\n  - CALL\n  - RETURN")?;
        let config = BuilderConfig::from_yaml_file(file.path())?;

        let result = QueryBuilder::with_config(config)
            .match_("(n)")
            .build()?;
        assert!(!result.valid);
        assert_eq!(result.errors[0].kind, ValidationErrorKind::NoValidClause);
        Ok(())
    }
}
