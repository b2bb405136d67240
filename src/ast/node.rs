use super::{FilterValue, Operator};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    And,
    Or,
}

impl GroupKind {
    pub fn operator(self) -> Operator {
        match self {
            GroupKind::And => Operator::And,
            GroupKind::Or => Operator::Or,
        }
    }
}

/// A normalized filter tree.
///
/// Every shape ambiguity of the raw descriptor is resolved when this tree is
/// built, so the compiler only ever matches on variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterNode {
    /// Entries of one object, implicitly AND-ed.
    Conditions(Vec<Condition>),
    /// Elements of an array, implicitly OR-ed.
    Alternatives(Vec<FilterNode>),
}

impl FilterNode {
    pub fn is_empty(&self) -> bool {
        match self {
            FilterNode::Conditions(c) => c.is_empty(),
            FilterNode::Alternatives(a) => a.is_empty(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FilterNode::Conditions(c) => c.len(),
            FilterNode::Alternatives(a) => a.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Column { column: String, predicate: Predicate },
    Group { kind: GroupKind, children: Vec<FilterNode> },
}

impl Condition {
    pub fn column(column: impl Into<String>, predicate: Predicate) -> Self {
        Condition::Column {
            column: column.into(),
            predicate,
        }
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Condition::Group {
            kind: GroupKind::And,
            children,
        }
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Condition::Group {
            kind: GroupKind::Or,
            children,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// `{ column: value }`
    Equals(FilterValue),
    /// `{ column: { $op: operand, ... } }`, AND-ed.
    Operators(Vec<OperatorClause>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorClause {
    pub operator: Operator,
    pub operand: Operand,
}

impl OperatorClause {
    pub fn new(operator: Operator, operand: Operand) -> Self {
        Self { operator, operand }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    Value(FilterValue),
    List(Vec<FilterValue>),
    Range(FilterValue, FilterValue),
    /// An unvalidated column identifier, for column-to-column comparison.
    Column(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_kind_operator() {
        assert_eq!(GroupKind::And.operator().sql_text(), "AND");
        assert_eq!(GroupKind::Or.operator().sql_text(), "OR");
    }

    #[test]
    fn test_condition_builders() {
        let eq = Condition::column("id", Predicate::Equals(1.into()));
        let group = Condition::or(vec![FilterNode::Conditions(vec![eq.clone()])]);
        assert!(matches!(group, Condition::Group { kind: GroupKind::Or, ref children } if children.len() == 1));
        assert!(matches!(eq, Condition::Column { ref column, .. } if column == "id"));
    }

    #[test]
    fn test_node_len() {
        let node = FilterNode::Alternatives(vec![
            FilterNode::Conditions(vec![]),
            FilterNode::Conditions(vec![]),
        ]);
        assert_eq!(node.len(), 2);
        assert!(!node.is_empty());
    }

    #[test]
    fn test_node_serialization() {
        let node = FilterNode::Conditions(vec![Condition::column(
            "age",
            Predicate::Operators(vec![OperatorClause::new(
                Operator::Between,
                Operand::Range(1.into(), 10.into()),
            )]),
        )]);
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains("conditions"));
        assert!(json.contains("Between"));
    }
}
