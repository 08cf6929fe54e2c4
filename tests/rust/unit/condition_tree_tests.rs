//! Unit tests for condition tree rendering through the public builder API

#[cfg(test)]
mod condition_tree_tests {
    use cypher_norm::cypher_builder::condition::{
        and, between, contains, ends_with, eq, gt, gte, in_list, is_null, lt, lte, ne, not, or,
        xor,
    };
    use cypher_norm::cypher_builder::{Condition, ConditionRenderer, ParameterBinder, QueryBuilder};
    use serde_json::json;
    use test_case::test_case;

    fn render(alias: Option<&str>, condition: &Condition) -> String {
        let mut binder = ParameterBinder::new();
        ConditionRenderer::new(&mut binder, alias)
            .render_where(condition)
            .unwrap()
    }

    #[test_case(eq("age", 30), "(u.age = $u_age_1)"; "equal")]
    #[test_case(ne("age", 30), "(u.age <> $u_age_1)"; "not equal")]
    #[test_case(gt("age", 30), "(u.age > $u_age_1)"; "greater")]
    #[test_case(gte("age", 30), "(u.age >= $u_age_1)"; "greater or equal")]
    #[test_case(lt("age", 30), "(u.age < $u_age_1)"; "less")]
    #[test_case(lte("age", 30), "(u.age <= $u_age_1)"; "less or equal")]
    #[test_case(contains("name", "li"), "(u.name CONTAINS $u_name_1)"; "contains")]
    #[test_case(ends_with("email", ".org"), "(u.email ENDS WITH $u_email_1)"; "ends with")]
    #[test_case(is_null("deleted_at"), "(u.deleted_at IS NULL)"; "is null")]
    fn test_operator_rendering(condition: Condition, expected: &str) {
        assert_eq!(render(Some("u"), &condition), expected);
    }

    #[test]
    fn test_or_of_two_predicates() {
        let condition = or([gt("age", 25), eq("active", true)]);
        assert_eq!(
            render(Some("u"), &condition),
            "(u.age > $u_age_1 OR u.active = $u_active_2)"
        );
    }

    #[test]
    fn test_deep_nesting_keeps_every_group() {
        let condition = and([
            or([eq("city", "Paris"), eq("city", "Lyon")]),
            not(is_null("email")),
            xor([gt("score", 10), lt("rank", 3)]),
        ]);
        assert_eq!(
            render(Some("u"), &condition),
            "((u.city = $u_city_1 OR u.city = $u_city_2) AND NOT (u.email IS NULL) AND (u.score > $u_score_3 XOR u.rank < $u_rank_4))"
        );
    }

    #[test]
    fn test_double_negation_restores_predicate() {
        let condition = not(not(eq("a", 1)));
        assert_eq!(condition, eq("a", 1));
    }

    #[test]
    fn test_de_morgan_on_or() {
        let condition = not(or([eq("a", 1), gt("b", 2)]));
        assert_eq!(render(None, &condition), "(NOT (a = $a_1) AND NOT (b > $b_2))");
    }

    #[test]
    fn test_in_list_and_between_through_builder() {
        let result = QueryBuilder::new()
            .match_("(u:User)")
            .alias("u")
            .where_all([
                in_list("age", json!([25, 30, 35])),
                between("salary", 50000, 150000),
            ])
            .return_(["u.username"])
            .build()
            .unwrap();

        assert_eq!(
            result.query,
            "MATCH (u:User)\nWHERE (u.age IN $u_age_1 AND (u.salary >= $u_salary_2 AND u.salary <= $u_salary_3))\nRETURN u.username"
        );
        assert_eq!(result.parameters.get("u_age_1"), Some(&json!([25, 30, 35])));
    }

    #[test]
    fn test_empty_group_suppresses_where() {
        let result = QueryBuilder::new()
            .match_("(n)")
            .where_(and(Vec::<Condition>::new()))
            .return_(["n"])
            .build()
            .unwrap();
        assert_eq!(result.query, "MATCH (n)\nRETURN n");
    }

    #[test]
    fn test_repeated_property_gets_unique_placeholders() {
        let mut binder = ParameterBinder::new();
        let condition = or([eq("status", "a"), eq("status", "b"), eq("status", "c")]);
        let text = ConditionRenderer::new(&mut binder, Some("n"))
            .render(&condition)
            .unwrap();
        assert_eq!(
            text,
            "(n.status = $n_status_1 OR n.status = $n_status_2 OR n.status = $n_status_3)"
        );
        assert_eq!(binder.len(), 3);
    }
}
