use serde::Serialize;
use std::fmt;
use tributary_common::{Error, Result};
use tributary_plan::{PlanNode, ScalarExpr};

/// A physical column: the table a scan reads and the column's name in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourceColumn {
    pub table: String,
    pub column: String,
}

impl SourceColumn {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self { table: table.into(), column: column.into() }
    }
}

impl fmt::Display for SourceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Traces output column `index` of `node` back to the physical column it
/// reads, descending through the tree purely by position.
///
/// Returns `Ok(None)` when the column is computed anywhere along the way (a
/// projected call or literal, an aggregate result, inline values): lineage is
/// all-or-nothing per reference. An index outside the addressed node's
/// output is a malformed plan and returns [`Error::IndexOutOfBounds`].
pub fn resolve(node: &PlanNode, index: usize) -> Result<Option<SourceColumn>> {
    match node {
        PlanNode::TableScan { table_name, schema } => {
            let field = schema
                .fields()
                .get(index)
                .ok_or_else(|| Error::out_of_bounds(node.kind(), index, schema.fields().len()))?;
            Ok(Some(SourceColumn::new(table_name.as_str(), field.name().as_str())))
        }
        PlanNode::Values { schema } => {
            check_bounds(node, index, schema.fields().len())?;
            Ok(None)
        }
        PlanNode::Join { left, right, .. } => {
            let left_width = left.width();
            if index < left_width {
                resolve(left, index)
            } else {
                resolve(right, index - left_width)
            }
        }
        PlanNode::Project { input, expressions } => {
            match expressions.get(index) {
                Some(ScalarExpr::Column(inner)) => resolve(input, *inner),
                Some(_) => Ok(None),
                None => Err(Error::out_of_bounds(node.kind(), index, expressions.len())),
            }
        }
        PlanNode::Aggregate { input, group_indices, .. } => {
            check_bounds(node, index, node.width())?;
            // Group keys come first and are bare input references.
            match group_indices.get(index) {
                Some(group) => resolve(input, *group),
                None => Ok(None),
            }
        }
        PlanNode::Filter { input, .. }
        | PlanNode::Sort { input, .. }
        | PlanNode::Limit { input, .. } => resolve(input, index),
    }
}

pub(crate) fn check_bounds(node: &PlanNode, index: usize, width: usize) -> Result<()> {
    if index < width {
        Ok(())
    } else {
        Err(Error::out_of_bounds(node.kind(), index, width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;
    use tributary_plan::{binary, col, lit, AggregateCall, JoinType, PlanBuilder};

    fn scan(name: &str, columns: &[&str]) -> PlanBuilder {
        let fields: Vec<Field> =
            columns.iter().map(|c| Field::new(*c, DataType::Utf8, true)).collect();
        PlanBuilder::scan_with_schema(name, Arc::new(Schema::new(fields)))
    }

    #[test]
    fn test_scan_resolves_field_name() {
        let plan = scan("T", &["a", "b"]).build();
        assert_eq!(resolve(&plan, 1).unwrap(), Some(SourceColumn::new("T", "b")));
    }

    #[test]
    fn test_scan_out_of_bounds_is_error() {
        let plan = scan("T", &["a", "b"]).build();
        assert_eq!(
            resolve(&plan, 2),
            Err(Error::IndexOutOfBounds { node: "TableScan", index: 2, width: 2 })
        );
    }

    #[test]
    fn test_join_shifts_right_indices() {
        let plan = scan("L", &["l0", "l1"])
            .join(scan("R", &["r0", "r1", "r2"]).build(), JoinType::Inner, None)
            .unwrap()
            .build();
        assert_eq!(resolve(&plan, 1).unwrap(), Some(SourceColumn::new("L", "l1")));
        assert_eq!(resolve(&plan, 2).unwrap(), Some(SourceColumn::new("R", "r0")));
        assert_eq!(resolve(&plan, 4).unwrap(), Some(SourceColumn::new("R", "r2")));
        assert!(resolve(&plan, 5).is_err());
    }

    #[test]
    fn test_project_follows_bare_references_only() {
        let plan = scan("T", &["a", "b", "c"])
            .project(vec![col(2), binary(col(0), "+", lit("1")), lit("7")])
            .unwrap()
            .project(vec![col(1), col(0)])
            .unwrap()
            .build();
        assert_eq!(resolve(&plan, 0).unwrap(), None);
        assert_eq!(resolve(&plan, 1).unwrap(), Some(SourceColumn::new("T", "c")));
    }

    #[test]
    fn test_passthrough_nodes_keep_index() {
        let plan = scan("T", &["a", "b"])
            .filter(binary(col(0), "=", lit("1")))
            .unwrap()
            .limit(0, Some(3))
            .build();
        assert_eq!(resolve(&plan, 1).unwrap(), Some(SourceColumn::new("T", "b")));
    }

    #[test]
    fn test_aggregate_groups_resolve_calls_do_not() {
        let plan = scan("T", &["a", "b", "c"])
            .aggregate(vec![2], vec![AggregateCall::new("MAX", vec![0])])
            .unwrap()
            .build();
        assert_eq!(resolve(&plan, 0).unwrap(), Some(SourceColumn::new("T", "c")));
        assert_eq!(resolve(&plan, 1).unwrap(), None);
        assert!(resolve(&plan, 2).is_err());
    }

    #[test]
    fn test_values_have_no_origin() {
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int32, false)]));
        let plan = PlanBuilder::values(schema).build();
        assert_eq!(resolve(&plan, 0).unwrap(), None);
        assert!(resolve(&plan, 1).is_err());
    }
}
