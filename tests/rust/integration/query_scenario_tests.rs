//! End-to-end read query scenarios through `QueryBuilder::build`

#[cfg(test)]
mod query_scenario_tests {
    use cypher_norm::cypher_builder::condition::{eq, gt, or, starts_with};
    use cypher_norm::cypher_builder::expression::{avg, case, collect, count};
    use cypher_norm::cypher_builder::{node, Pattern, QueryBuilder, RelationshipPattern};
    use cypher_norm::{cypher_entity, ValidationErrorKind};
    use serde_json::json;

    cypher_entity! {
        #[derive(Debug, Clone, Default)]
        pub struct User: "label:User" {
            pub username: String => "username",
            pub email: String => "email,omitempty",
            pub age: i64 => "age,omitempty",
            pub active: bool => "active,omitempty",
            pub password: String => "-",
        }
    }

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_literal_match_where_return() {
        init_logger();
        let user = User {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            ..Default::default()
        };
        // active is a bool: omitempty never drops it
        let result = QueryBuilder::new()
            .match_entity(&user)
            .alias("u")
            .where_(gt("age", 25))
            .return_(["u.username"])
            .build()
            .unwrap();

        assert_eq!(
            result.query,
            "MATCH (u:User {active: $active_1, username: $username_2})\nWHERE (u.age > $u_age_3)\nRETURN u.username"
        );
        assert_eq!(result.parameters.get("active_1"), Some(&json!(false)));
        assert_eq!(result.parameters.get("username_2"), Some(&json!("alice")));
        assert_eq!(result.parameters.get("u_age_3"), Some(&json!(25)));
        assert!(!result.parameters.values().any(|v| v == &json!("hunter2")));
        assert!(result.valid);
    }

    #[test]
    fn test_anonymous_match_before_return() {
        let user = User {
            username: "bob".to_string(),
            ..Default::default()
        };
        let result = QueryBuilder::new().match_entity(&user).return_(["u"]).build().unwrap();

        let lines: Vec<&str> = result.query.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "MATCH (:User {active: $active_1, username: $username_2})");
        assert_eq!(lines[1], "RETURN u");
    }

    #[test]
    fn test_pagination_and_projection() {
        let result = QueryBuilder::new()
            .match_("(u:User)")
            .alias("u")
            .where_(or([gt("age", 25), eq("active", true)]))
            .with(["u", "count(*) AS logins"])
            .return_([
                "u.username".into(),
                avg("u.age").alias("mean_age"),
                case().when("logins > 10", "'heavy'").otherwise("'light'").end().alias("usage"),
            ])
            .order_by(["u.username", "mean_age DESC"])
            .skip(20)
            .limit(10)
            .build()
            .unwrap();

        assert_eq!(
            result.query,
            "MATCH (u:User)\n\
             WHERE (u.age > $u_age_1 OR u.active = $u_active_2)\n\
             WITH u, count(*) AS logins\n\
             RETURN u.username, avg(u.age) AS mean_age, CASE WHEN logins > 10 THEN 'heavy' ELSE 'light' END AS usage\n\
             ORDER BY u.username, mean_age DESC\n\
             SKIP 20\n\
             LIMIT 10"
        );
        assert_eq!(result.parameters.len(), 2);
    }

    #[test]
    fn test_path_match_with_aggregation() {
        let friends = Pattern::new(
            node("a", ["User"]).property("username", "alice"),
            RelationshipPattern::outgoing("FRIEND").min_length(1).max_length(3),
            node("f", ["User"]),
        );
        let result = QueryBuilder::new()
            .match_path(&friends)
            .alias("f")
            .where_(starts_with("username", "b"))
            .return_([count("f").alias("reachable"), collect("f.username").alias("names")])
            .build()
            .unwrap();

        assert_eq!(
            result.query,
            "MATCH (a:User {username: $username_1})-[:FRIEND*1..3]->(f:User)\n\
             WHERE (f.username STARTS WITH $f_username_2)\n\
             RETURN count(f) AS reachable, collect(f.username) AS names"
        );
    }

    #[test]
    fn test_return_entity_projects_schema_properties() {
        let user = User {
            username: "carol".to_string(),
            ..Default::default()
        };
        let result = QueryBuilder::new()
            .match_entity(&user)
            .alias("u")
            .return_entity(&user, "")
            .build()
            .unwrap();
        assert!(result
            .query
            .ends_with("RETURN u.username, u.email, u.age, u.active"));
    }

    #[test]
    fn test_repeated_builds_are_identical() {
        let build = || {
            QueryBuilder::new()
                .match_node(&node("n", ["City"]).property("zip", "75001").property("country", "FR"))
                .return_(["n"])
                .build()
                .unwrap()
        };
        let first = build();
        let second = build();
        assert_eq!(first, second);
        assert_eq!(
            first.query,
            "MATCH (n:City {country: $country_1, zip: $zip_2})\nRETURN n"
        );
    }

    #[test]
    fn test_structural_findings_do_not_fail_build() {
        let result = QueryBuilder::new().where_raw("(n.age > 1").build().unwrap();
        assert!(!result.valid);
        let kinds: Vec<ValidationErrorKind> = result.errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::BracketMismatch));
    }

    #[test]
    fn test_use_and_union() {
        let result = QueryBuilder::new()
            .use_database("social")
            .match_("(a:Person)")
            .return_(["a.name AS name"])
            .union()
            .match_("(c:Company)")
            .return_(["c.name AS name"])
            .union_all()
            .match_("(p:Place)")
            .return_(["p.name AS name"])
            .build()
            .unwrap();

        assert_eq!(
            result.query,
            "USE social\nMATCH (a:Person)\nRETURN a.name AS name\nUNION\nMATCH (c:Company)\nRETURN c.name AS name\nUNION ALL\nMATCH (p:Place)\nRETURN p.name AS name"
        );
    }
}
