use super::{ParamTable, QualifiedColumn, Scope};
use crate::ast::{Condition, FilterNode, Operand, Operator, OperatorCategory, Predicate};
use crate::error::FilterError;

/// A compiled boolean expression and the parameters it references.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WhereClause {
    pub sql: String,
    pub params: ParamTable,
}

impl WhereClause {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Lowers a normalized filter tree into SQL with named parameters.
///
/// Root entries are named by position and joined without outer parentheses:
/// `AND` for an object root, `OR` for an array root. Below the root, every
/// multi-part expression is parenthesized and a single part is emitted bare.
/// Every generated parameter name starts with `namespace`.
///
/// An empty node compiles to an empty clause.
pub fn compile(
    node: &FilterNode,
    scope: &Scope,
    namespace: &str,
) -> Result<WhereClause, FilterError> {
    let mut compiler = WhereCompiler {
        scope,
        params: ParamTable::new(),
    };

    let sql = match node {
        FilterNode::Conditions(conditions) => conditions
            .iter()
            .enumerate()
            .map(|(k, c)| compiler.condition(c, &format!("{}{}", namespace, k)))
            .collect::<Result<Vec<_>, _>>()?
            .join(" AND "),
        FilterNode::Alternatives(nodes) => nodes
            .iter()
            .enumerate()
            .map(|(k, n)| compiler.node(n, &format!("{}{}", namespace, k)))
            .collect::<Result<Vec<_>, _>>()?
            .join(" OR "),
    };

    tracing::debug!(
        alias = scope.active_join().unwrap_or(scope.main_alias()),
        params = compiler.params.len(),
        "compiled where clause"
    );

    Ok(WhereClause {
        sql,
        params: compiler.params,
    })
}

struct WhereCompiler<'a> {
    scope: &'a Scope,
    params: ParamTable,
}

fn child_name(parent: &str, index: usize, siblings: usize) -> String {
    if siblings == 1 {
        parent.to_string()
    } else {
        format!("{}_{}", parent, index)
    }
}

fn wrap(mut parts: Vec<String>, joiner: &str) -> String {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        format!("({})", parts.join(joiner))
    }
}

impl WhereCompiler<'_> {
    fn node(&mut self, node: &FilterNode, name: &str) -> Result<String, FilterError> {
        match node {
            FilterNode::Conditions(conditions) => {
                let parts = conditions
                    .iter()
                    .enumerate()
                    .map(|(k, c)| self.condition(c, &child_name(name, k, conditions.len())))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(wrap(parts, " AND "))
            }
            FilterNode::Alternatives(nodes) => {
                let parts = nodes
                    .iter()
                    .enumerate()
                    .map(|(k, n)| self.node(n, &child_name(name, k, nodes.len())))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(wrap(parts, " OR "))
            }
        }
    }

    fn condition(&mut self, condition: &Condition, name: &str) -> Result<String, FilterError> {
        match condition {
            Condition::Column { column, predicate } => {
                let column = self.scope.qualify(column)?;
                match predicate {
                    Predicate::Equals(value) => {
                        self.emit(&column, Operator::Eq, &Operand::Value(value.clone()), name)
                    }
                    Predicate::Operators(clauses) => {
                        let parts = clauses
                            .iter()
                            .enumerate()
                            .map(|(k, clause)| {
                                let name = child_name(name, k, clauses.len());
                                self.emit(&column, clause.operator, &clause.operand, &name)
                            })
                            .collect::<Result<Vec<_>, _>>()?;
                        Ok(wrap(parts, " AND "))
                    }
                }
            }
            Condition::Group { kind, children } => {
                let parts = children
                    .iter()
                    .enumerate()
                    .map(|(k, child)| self.node(child, &child_name(name, k, children.len())))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(wrap(parts, &format!(" {} ", kind.operator().sql_text())))
            }
        }
    }

    fn emit(
        &mut self,
        column: &QualifiedColumn,
        operator: Operator,
        operand: &Operand,
        name: &str,
    ) -> Result<String, FilterError> {
        let sql_text = operator.sql_text();
        let fragment = match (operator.category(), operand) {
            (
                OperatorCategory::Comparison | OperatorCategory::Pattern | OperatorCategory::Regex,
                Operand::Value(value),
            ) => {
                self.params.bind(name, value.clone());
                format!("{} {} :{}", column, sql_text, name)
            }
            (OperatorCategory::Membership, Operand::List(values)) => {
                self.params.bind_list(name, values.clone());
                format!("{} {} (:...{})", column, sql_text, name)
            }
            (OperatorCategory::Range, Operand::Range(start, end)) => {
                self.params.bind(format!("{}_start", name), start.clone());
                self.params.bind(format!("{}_end", name), end.clone());
                format!("{} {} :{}_start AND :{}_end", column, sql_text, name, name)
            }
            (OperatorCategory::ColumnCompare, Operand::Column(other)) => {
                let other = self.scope.qualify(other)?;
                format!("{} {} {}", column, sql_text, other)
            }
            (OperatorCategory::BooleanGroup, _) => {
                return Err(FilterError::malformed(format!(
                    "{} cannot be applied to column '{}'",
                    operator, column
                )))
            }
            (_, operand) => {
                return Err(FilterError::malformed(format!(
                    "{} on '{}' cannot take operand {:?}",
                    operator, column, operand
                )))
            }
        };

        tracing::trace!(param = %name, condition = %fragment, "emitted condition");
        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FilterValue, OperatorClause, ParamValue, RawFilter};
    use crate::parser::{normalize, NormalizeOptions};
    use serde_json::json;

    fn compile_json(value: serde_json::Value) -> Result<WhereClause, FilterError> {
        let mut scope = Scope::new("t");
        scope.register_join("o")?;
        let node = normalize(&RawFilter::from(value), &NormalizeOptions::default())?;
        compile(&node, &scope, "")
    }

    fn sql(value: serde_json::Value) -> String {
        compile_json(value).unwrap().sql
    }

    #[test]
    fn test_compile_implicit_and() {
        let clause = compile_json(json!({ "id": 1, "name": "ann" })).unwrap();
        assert_eq!(clause.sql, "t.id = :0 AND t.name = :1");
        assert_eq!(clause.params.get("0"), Some(&ParamValue::Single(1.into())));
        assert_eq!(
            clause.params.get("1"),
            Some(&ParamValue::Single("ann".into()))
        );
    }

    #[test]
    fn test_compile_root_alternatives() {
        assert_eq!(sql(json!([{ "a": 1 }, { "b": 2 }])), "t.a = :0 OR t.b = :1");
        assert_eq!(
            sql(json!([{ "a": 1, "b": 2 }, { "c": 3 }])),
            "(t.a = :0_0 AND t.b = :0_1) OR t.c = :1"
        );
    }

    #[test]
    fn test_compile_groups() {
        assert_eq!(
            sql(json!({ "$and": [{ "a": 1 }, { "b": 2 }] })),
            "(t.a = :0_0 AND t.b = :0_1)"
        );
        assert_eq!(sql(json!({ "$or": [{ "a": 1 }] })), "t.a = :0");
        assert_eq!(
            sql(json!({ "$or": [{ "a": 1 }, { "$and": [{ "b": 2 }, { "c": 3 }] }] })),
            "(t.a = :0_0 OR (t.b = :0_1_0 AND t.c = :0_1_1))"
        );
    }

    #[test]
    fn test_compile_group_with_nested_alternatives() {
        assert_eq!(
            sql(json!({ "$and": [[{ "a": 1 }, { "b": 2 }], { "c": 3 }] })),
            "((t.a = :0_0_0 OR t.b = :0_0_1) AND t.c = :0_1)"
        );
    }

    #[test]
    fn test_compile_multiple_operators_on_column() {
        let clause = compile_json(json!({ "age": { "$gte": 18, "$lt": 65 } })).unwrap();
        assert_eq!(clause.sql, "(t.age >= :0_0 AND t.age < :0_1)");
        assert_eq!(clause.params.len(), 2);
    }

    #[test]
    fn test_compile_between() {
        let clause = compile_json(json!({ "age": { "$between": [1, 10] } })).unwrap();
        assert_eq!(clause.sql, "t.age BETWEEN :0_start AND :0_end");
        assert_eq!(clause.params.get("0_start"), Some(&ParamValue::Single(1.into())));
        assert_eq!(clause.params.get("0_end"), Some(&ParamValue::Single(10.into())));
    }

    #[test]
    fn test_compile_in() {
        let clause = compile_json(json!({ "id": { "$in": [1, 2, 3] } })).unwrap();
        assert_eq!(clause.sql, "t.id IN (:...0)");
        assert_eq!(
            clause.params.get("0"),
            Some(&ParamValue::List(vec![1.into(), 2.into(), 3.into()]))
        );
    }

    #[test]
    fn test_compile_like() {
        let clause = compile_json(json!({ "name": { "$notILike": "x" } })).unwrap();
        assert_eq!(clause.sql, "t.name NOT ILIKE :0");
        assert_eq!(clause.params.get("0"), Some(&ParamValue::Single("%x%".into())));
    }

    #[test]
    fn test_compile_column_compare() {
        let clause = compile_json(json!({ "a": { "$gtCol": "o.b" } })).unwrap();
        assert_eq!(clause.sql, "t.a > o.b");
        assert!(clause.params.is_empty());

        let result = compile_json(json!({ "a": { "$col": "b\"" } }));
        assert_eq!(result, Err(FilterError::InjectionRisk("b\"".to_string())));
    }

    #[test]
    fn test_compile_is_and_regex() {
        assert_eq!(
            sql(json!({ "deleted_at": { "$is": null }, "code": { "$iRegexp": "^a" } })),
            "t.deleted_at IS :0 AND t.code ~* :1"
        );
    }

    #[test]
    fn test_compile_join_namespace() {
        let mut scope = Scope::new("t");
        scope.register_join("o").unwrap();
        let scope = scope.with_active_join("o");
        let node = normalize(
            &RawFilter::from(json!({ "status": "paid", "t.id": { "$col": "user_id" } })),
            &NormalizeOptions::default(),
        )
        .unwrap();
        let clause = compile(&node, &scope, "J_0_").unwrap();
        assert_eq!(clause.sql, "o.status = :J_0_0 AND t.id = o.user_id");
        assert_eq!(clause.params.names().collect::<Vec<_>>(), vec!["J_0_0"]);
    }

    #[test]
    fn test_compile_unknown_alias() {
        assert!(matches!(
            compile_json(json!({ "x.total": 1 })),
            Err(FilterError::UnknownJoinAlias { .. })
        ));
    }

    #[test]
    fn test_compile_empty() {
        let clause = compile_json(json!({})).unwrap();
        assert!(clause.is_empty());
        assert!(clause.params.is_empty());
    }

    #[test]
    fn test_compile_operand_mismatch() {
        let node = FilterNode::Conditions(vec![Condition::column(
            "id",
            Predicate::Operators(vec![OperatorClause::new(
                Operator::In,
                Operand::Value(FilterValue::Integer(1)),
            )]),
        )]);
        let result = compile(&node, &Scope::new("t"), "");
        assert!(matches!(result, Err(FilterError::MalformedFilter(_))));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let filter = json!({ "$or": [{ "a": { "$in": [1, 2] } }, { "b": { "$like": "q" } }] });
        assert_eq!(compile_json(filter.clone()), compile_json(filter));
    }
}
