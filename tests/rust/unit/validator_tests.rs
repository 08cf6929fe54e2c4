//! Unit tests for the structural query validator

#[cfg(test)]
mod validator_tests {
    use cypher_norm::config::BuilderConfig;
    use cypher_norm::cypher_builder::ParameterTable;
    use cypher_norm::query_validator::{QueryValidator, ValidationErrorKind};
    use serde_json::json;
    use test_case::test_case;

    fn kinds(query: &str) -> Vec<ValidationErrorKind> {
        QueryValidator::default()
            .validate(query, &ParameterTable::new())
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test_case("MATCH (n:Person RETURN n", ValidationErrorKind::BracketMismatch; "unclosed paren")]
    #[test_case("", ValidationErrorKind::EmptyQuery; "empty")]
    #[test_case("   \n\t", ValidationErrorKind::EmptyQuery; "whitespace only")]
    #[test_case("(n:Person)", ValidationErrorKind::NoValidClause; "no clause")]
    #[test_case("MATCH (n)-[r:KNOWS]-(m) RETURN {a: n]", ValidationErrorKind::BracketMismatch; "crossed brackets")]
    #[test_case("MATCH (n) RETURN n)", ValidationErrorKind::BracketMismatch; "extra closer")]
    fn test_first_finding(query: &str, expected: ValidationErrorKind) {
        assert_eq!(kinds(query).first(), Some(&expected));
    }

    #[test]
    fn test_both_structural_findings_are_reported() {
        assert_eq!(
            kinds("(n:Person"),
            vec![ValidationErrorKind::BracketMismatch, ValidationErrorKind::NoValidClause]
        );
    }

    #[test]
    fn test_quoted_brackets_do_not_count() {
        assert!(kinds("MATCH (n) WHERE n.note = \"a) b]\" RETURN n").is_empty());
        assert!(kinds("MATCH (n) WHERE n.note = 'it\\'s (fine' RETURN n").is_empty());
    }

    #[test]
    fn test_clause_order_is_not_checked() {
        assert!(kinds("RETURN n MATCH (n)").is_empty());
    }

    #[test]
    fn test_custom_keyword_list() {
        let validator = QueryValidator::new(false, ["CALL"]);
        let errors = validator.validate("MATCH (n) RETURN n", &ParameterTable::new());
        assert_eq!(errors[0].kind, ValidationErrorKind::NoValidClause);
        assert!(validator
            .validate("CALL db.labels()", &ParameterTable::new())
            .is_empty());
    }

    #[test]
    fn test_strict_mode_from_config() {
        let config = BuilderConfig {
            strict_mode: true,
            ..BuilderConfig::default()
        };
        let validator = QueryValidator::from_config(&config);

        let mut params = ParameterTable::new();
        params.insert("name".to_string(), json!("alice"));
        let errors = validator.validate(
            "MATCH (u:User {name: $name}) WHERE u.age > $min_age RETURN u",
            &params,
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UndefinedParameter);
        assert_eq!(errors[0].position, Some(43));
    }

    #[test]
    fn test_findings_carry_suggestions() {
        let errors = QueryValidator::default().validate("MATCH (n", &ParameterTable::new());
        assert!(!errors[0].suggestion.is_empty());
        assert!(!errors[0].message.is_empty());
    }
}
