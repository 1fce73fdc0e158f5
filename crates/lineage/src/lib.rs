//! Lineage crate
//!
//! Static column lineage over a validated [`tributary_plan::PlanNode`]:
//! which physical columns a query reads, and how each output column is
//! derived from them. Resolution is purely positional; no names are looked
//! up while analyzing.
//!
//! # Example
//! ```rust
//! use arrow::datatypes::{DataType, Field, Schema};
//! use std::sync::Arc;
//! use tributary_lineage::build_lineage;
//! use tributary_plan::{binary, col, lit, PlanBuilder};
//!
//! let table = Arc::new(Schema::new(vec![Field::new("SALARY", DataType::Float64, true)]));
//! let plan = PlanBuilder::scan_with_schema("EMPLOYEES", table)
//!     .project(vec![binary(col(0), "*", lit("1.1"))])
//!     .unwrap()
//!     .build();
//! let output = Schema::new(vec![Field::new("NEW_SALARY", DataType::Float64, true)]);
//!
//! let records = build_lineage(&plan, &output).unwrap();
//! assert_eq!(records[0].to_string(), "NEW_SALARY <- *(EMPLOYEES.SALARY, 1.1)");
//! ```

pub mod assembler;
pub mod display;
pub mod expr_tree;
pub mod resolver;

pub use assembler::{
    analyze, build_lineage, extract_all_input_columns, extract_tables_used, LineageRecord,
    OutputColumn, QueryAnalysis,
};
pub use expr_tree::{build, resolve_to_expr_node, ExprNode};
pub use resolver::{resolve, SourceColumn};
