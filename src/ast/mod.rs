pub mod descriptor;
pub mod node;
pub mod operator;
pub mod raw;
pub mod value;

pub use descriptor::{Direction, JoinKind, JoinSpec, OrderTerm, QueryDescriptor};
pub use node::{Condition, FilterNode, GroupKind, Operand, OperatorClause, Predicate};
pub use operator::{Operator, OperatorCategory};
pub use raw::RawFilter;
pub use value::{FilterValue, ParamValue};
