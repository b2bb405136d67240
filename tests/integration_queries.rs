//! End-to-end tests for JSON query descriptors: parse, assemble, render.

use query_filter::{
    query_from_json, Clause, Dialect, Error, FilterError, FilterValue, QueryBuilder, SqlError,
};
use serde_json::json;

#[test]
fn test_customers_with_filters_and_ordering() {
    let query = query_from_json(
        "customers",
        &json!({
            "select": ["id", "name", "email"],
            "where": { "tier": "gold", "name": { "$iLike": "smith" } },
            "order": { "name": "asc" }
        }),
    )
    .unwrap();

    assert_eq!(
        query.sql,
        "SELECT customers.id, customers.name, customers.email FROM customers \
         WHERE customers.tier = :0 AND customers.name ILIKE :1 ORDER BY customers.name ASC"
    );
    assert_eq!(query.params_json(), json!({ "0": "gold", "1": "%smith%" }));
}

#[test]
fn test_orders_with_customer_join() {
    let query = query_from_json(
        "orders",
        &json!({
            "select": ["id", "total_amount", "c.name"],
            "where": { "status": "completed", "c.country": { "$in": ["PT", "ES"] } },
            "joins": [{
                "type": "inner",
                "table": "customers",
                "alias": "c",
                "condition": { "id": { "$col": "orders.customer_id" } }
            }],
            "order": { "total_amount": -1 },
            "take": 20
        }),
    )
    .unwrap();

    assert_eq!(
        query.sql,
        "SELECT orders.id, orders.total_amount, c.name FROM orders \
         INNER JOIN customers c ON c.id = orders.customer_id \
         WHERE orders.status = :0 AND c.country IN (:...1) \
         ORDER BY orders.total_amount DESC LIMIT 20"
    );
    assert_eq!(query.tables, vec!["orders", "customers"]);
}

#[test]
fn test_clause_application_order_ignores_key_order() {
    let reordered = query_from_json(
        "users",
        &json!({
            "skip": 5,
            "take": 10,
            "order": { "id": "DESC" },
            "where": { "id": { "$lt": 100 } },
            "select": ["id"]
        }),
    )
    .unwrap();

    let canonical = query_from_json(
        "users",
        &json!({
            "select": ["id"],
            "where": { "id": { "$lt": 100 } },
            "order": { "id": "DESC" },
            "take": 10,
            "skip": 5
        }),
    )
    .unwrap();

    assert_eq!(reordered, canonical);
    assert_eq!(
        canonical.sql,
        "SELECT users.id FROM users WHERE users.id < :0 ORDER BY users.id DESC LIMIT 10 OFFSET 5"
    );
}

#[test]
fn test_group_by_with_order() {
    let query = query_from_json(
        "orders",
        &json!({
            "select": ["status"],
            "group": ["status"],
            "order": { "status": "asc" }
        }),
    )
    .unwrap();
    assert_eq!(
        query.sql,
        "SELECT orders.status FROM orders GROUP BY orders.status ORDER BY orders.status ASC"
    );
}

#[test]
fn test_order_not_in_group() {
    let err = query_from_json(
        "orders",
        &json!({ "select": ["status"], "group": ["status"], "order": { "id": "asc" } }),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::Sql(SqlError::AmbiguousOrderGroup {
            column: "orders.id".to_string(),
            expected_in: "group",
        })
    );
}

#[test]
fn test_empty_group_rejects_any_order() {
    let err = query_from_json(
        "users",
        &json!({ "select": ["id"], "group": [], "order": { "name": "asc" } }),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::Sql(SqlError::AmbiguousOrderGroup {
            column: "users.name".to_string(),
            expected_in: "group",
        })
    );
}

#[test]
fn test_order_not_selected_with_join() {
    let err = query_from_json(
        "orders",
        &json!({
            "select": ["id"],
            "joins": [{ "type": "left", "table": "customers", "alias": "c" }],
            "order": { "c.name": "asc" }
        }),
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::Sql(SqlError::AmbiguousOrderGroup {
            column: "c.name".to_string(),
            expected_in: "select",
        })
    );
}

#[test]
fn test_join_without_condition() {
    let query = query_from_json(
        "orders",
        &json!({
            "select": ["id", "c.*"],
            "joins": [{ "type": "LEFT", "table": "customers", "alias": "c" }]
        }),
    )
    .unwrap();
    assert_eq!(
        query.sql,
        "SELECT orders.id, c.* FROM orders LEFT JOIN customers c ON 1 = 1"
    );
}

#[test]
fn test_descriptor_errors() {
    let cases = [
        (json!({}), Error::Sql(SqlError::SelectRequired)),
        (json!({ "select": [] }), Error::Sql(SqlError::SelectRequired)),
        (
            json!({ "select": ["id"], "take": -5 }),
            Error::Sql(SqlError::InvalidPaging {
                clause: "take",
                value: "-5".to_string(),
            }),
        ),
        (
            json!({ "select": ["id"], "joins": [{ "type": "cross", "table": "x" }] }),
            Error::Sql(SqlError::UnknownJoinType("cross".to_string())),
        ),
        (
            json!({ "select": ["id"], "order": { "id": "sideways" } }),
            Error::Sql(SqlError::InvalidOrderDirection {
                column: "id".to_string(),
                value: "\"sideways\"".to_string(),
            }),
        ),
        (
            json!({ "select": ["id\""] }),
            Error::Filter {
                clause: Clause::Select,
                error: FilterError::InjectionRisk("id\"".to_string()),
            },
        ),
        (
            json!({ "select": ["id"], "group": ["x.id"] }),
            Error::Filter {
                clause: Clause::Group,
                error: FilterError::UnknownJoinAlias {
                    alias: "x".to_string(),
                    identifier: "x.id".to_string(),
                },
            },
        ),
    ];

    for (descriptor, expected) in cases {
        assert_eq!(query_from_json("users", &descriptor), Err(expected), "{}", descriptor);
    }
}

#[test]
fn test_dialects_render_paging_and_placeholders() {
    let descriptor = query_filter::parse_descriptor(&json!({
        "select": ["id"],
        "where": { "id": { "$in": [1, 2] } },
        "order": { "id": "asc" },
        "take": 10,
        "skip": 30
    }))
    .unwrap();

    let expectations = [
        (
            Dialect::Postgres,
            "SELECT users.id FROM users WHERE users.id IN ($1, $2) ORDER BY users.id ASC LIMIT 10 OFFSET 30",
        ),
        (
            Dialect::MySql,
            "SELECT users.id FROM users WHERE users.id IN (?, ?) ORDER BY users.id ASC LIMIT 10 OFFSET 30",
        ),
        (
            Dialect::MsSql,
            "SELECT users.id FROM users WHERE users.id IN (@P1, @P2) ORDER BY users.id ASC OFFSET 30 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
        (
            Dialect::Oracle,
            "SELECT users.id FROM users WHERE users.id IN (:1, :2) ORDER BY users.id ASC OFFSET 30 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
    ];

    for (dialect, expected) in expectations {
        let query = QueryBuilder::new("users")
            .with_dialect(dialect)
            .build(&descriptor)
            .unwrap()
            .to_query();
        let positional = query.to_positional(dialect).unwrap();
        assert_eq!(positional.sql, expected);
        assert_eq!(
            positional.values,
            vec![FilterValue::Integer(1), FilterValue::Integer(2)]
        );
    }
}

#[test]
fn test_count_query_keeps_joins_and_filter() {
    let descriptor = query_filter::parse_descriptor(&json!({
        "select": ["id"],
        "where": { "status": "open" },
        "joins": [{ "type": "inner", "table": "items", "condition": { "qty": { "$gt": 0 } } }],
        "take": 10
    }))
    .unwrap();
    let statement = QueryBuilder::new("orders").build(&descriptor).unwrap();
    let count = statement.count_query();
    assert_eq!(
        count.sql,
        "SELECT COUNT(*) AS count FROM orders INNER JOIN items ON items.qty > :J_0_0 \
         WHERE orders.status = :0"
    );
    assert_eq!(count.params.len(), 2);
}
