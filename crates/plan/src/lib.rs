//! Plan crate
//!
//! The relational operator tree and scalar expressions consumed by the
//! lineage analyzer, plus a builder for assembling plans by hand.

pub mod builder;
pub mod expr;
pub mod plan;

pub use builder::{column_index, PlanBuilder};
pub use expr::{binary, call, col, lit, lit_str, null, ScalarExpr};
pub use plan::{AggregateCall, JoinType, PlanNode, SortKey};
