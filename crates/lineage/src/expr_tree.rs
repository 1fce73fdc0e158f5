use crate::resolver::check_bounds;
use indexmap::IndexSet;
use serde::Serialize;
use tributary_common::{Error, Result};
use tributary_plan::{AggregateCall, PlanNode, ScalarExpr};

/// A fully resolved expression tree: positional references have been
/// replaced by the physical columns (or nested derivations) they stand for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprNode {
    Column { table: String, column: String },
    Literal { text: String },
    Operation { name: String, children: Vec<ExprNode> },
}

impl ExprNode {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        ExprNode::Column { table: table.into(), column: column.into() }
    }

    pub fn literal(text: impl Into<String>) -> Self {
        ExprNode::Literal { text: text.into() }
    }

    pub fn operation(name: impl Into<String>, children: Vec<ExprNode>) -> Self {
        ExprNode::Operation { name: name.into(), children }
    }

    /// Adds every `table.column` leaf to `columns`, depth first, left to right.
    pub fn collect_source_columns(&self, columns: &mut IndexSet<String>) {
        match self {
            ExprNode::Column { table, column } => {
                columns.insert(format!("{table}.{column}"));
            }
            ExprNode::Literal { .. } => {}
            ExprNode::Operation { children, .. } => {
                for child in children {
                    child.collect_source_columns(columns);
                }
            }
        }
    }

    pub fn source_columns(&self) -> IndexSet<String> {
        let mut columns = IndexSet::new();
        self.collect_source_columns(&mut columns);
        columns
    }
}

/// Builds the lineage tree of `expr`, whose column references address the
/// output of `input`.
///
/// Expression shapes with no lineage meaning (bind parameters) become the
/// `?` placeholder literal. Only a malformed plan produces an error.
pub fn build(expr: &ScalarExpr, input: &PlanNode) -> Result<ExprNode> {
    match expr {
        ScalarExpr::Column(index) => resolve_to_expr_node(*index, input),
        ScalarExpr::Literal { value, is_character } => {
            Ok(ExprNode::literal(render_literal(value.as_deref(), *is_character)))
        }
        ScalarExpr::Call { operator, operands } => {
            let children = operands
                .iter()
                .map(|operand| build(operand, input))
                .collect::<Result<Vec<_>>>()?;
            Ok(ExprNode::operation(operator.as_str(), children))
        }
        ScalarExpr::DynamicParam(_) => Ok(ExprNode::literal("?")),
    }
}

/// Expands output column `index` of `node` into the tree that derives it.
///
/// Unlike [`crate::resolver::resolve`], computed columns are followed: an
/// index landing on a projected expression re-expands into that expression
/// against the project's input, and an aggregate result expands into its
/// aggregate call. Columns of inline values become `?[index]`.
pub fn resolve_to_expr_node(index: usize, node: &PlanNode) -> Result<ExprNode> {
    match node {
        PlanNode::TableScan { table_name, schema } => {
            let field = schema
                .fields()
                .get(index)
                .ok_or_else(|| Error::out_of_bounds(node.kind(), index, schema.fields().len()))?;
            Ok(ExprNode::column(table_name.as_str(), field.name().as_str()))
        }
        PlanNode::Values { schema } => {
            check_bounds(node, index, schema.fields().len())?;
            Ok(ExprNode::literal(format!("?[{index}]")))
        }
        PlanNode::Join { left, right, .. } => {
            let left_width = left.width();
            if index < left_width {
                resolve_to_expr_node(index, left)
            } else {
                resolve_to_expr_node(index - left_width, right)
            }
        }
        PlanNode::Project { input, expressions } => {
            let expr = expressions
                .get(index)
                .ok_or_else(|| Error::out_of_bounds(node.kind(), index, expressions.len()))?;
            build(expr, input)
        }
        PlanNode::Aggregate { input, group_indices, aggregate_calls } => {
            if let Some(group) = group_indices.get(index) {
                return resolve_to_expr_node(*group, input);
            }
            let call = aggregate_calls
                .get(index - group_indices.len())
                .ok_or_else(|| Error::out_of_bounds(node.kind(), index, node.width()))?;
            aggregate_expression(call, input)
        }
        PlanNode::Filter { input, .. }
        | PlanNode::Sort { input, .. }
        | PlanNode::Limit { input, .. } => resolve_to_expr_node(index, input),
    }
}

/// `FUNC(arg, ...)` with each argument resolved against the aggregate's
/// input. A call without arguments gets a single `*` child.
pub fn aggregate_expression(call: &AggregateCall, input: &PlanNode) -> Result<ExprNode> {
    let children = if call.argument_indices.is_empty() {
        vec![ExprNode::literal("*")]
    } else {
        call.argument_indices
            .iter()
            .map(|index| resolve_to_expr_node(*index, input))
            .collect::<Result<Vec<_>>>()?
    };
    Ok(ExprNode::operation(call.function_name.as_str(), children))
}

fn render_literal(value: Option<&str>, is_character: bool) -> String {
    match value {
        None => "NULL".to_string(),
        Some(text) if is_character => format!("'{text}'"),
        Some(text) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;
    use tributary_plan::{binary, call, col, lit, lit_str, null, PlanBuilder};

    fn people() -> PlanBuilder {
        let schema = Arc::new(Schema::new(vec![
            Field::new("ID", DataType::Int32, false),
            Field::new("NAME", DataType::Utf8, true),
            Field::new("AGE", DataType::Int32, true),
        ]));
        PlanBuilder::scan_with_schema("PEOPLE", schema)
    }

    #[test]
    fn test_literal_rendering() {
        let input = people().build();
        assert_eq!(build(&lit("42"), &input).unwrap(), ExprNode::literal("42"));
        assert_eq!(build(&lit_str("abc"), &input).unwrap(), ExprNode::literal("'abc'"));
        assert_eq!(build(&null(), &input).unwrap(), ExprNode::literal("NULL"));
        assert_eq!(
            build(&ScalarExpr::DynamicParam(0), &input).unwrap(),
            ExprNode::literal("?")
        );
    }

    #[test]
    fn test_call_operands_resolve_against_same_input() {
        let input = people().build();
        let tree = build(&call("UPPER", vec![col(1)]), &input).unwrap();
        assert_eq!(
            tree,
            ExprNode::operation("UPPER", vec![ExprNode::column("PEOPLE", "NAME")])
        );
    }

    #[test]
    fn test_nested_project_is_reexpanded() {
        let plan = people()
            .project(vec![binary(col(2), "+", lit("1")), col(1)])
            .unwrap()
            .build();
        let tree = build(&binary(col(0), "*", lit("2")), &plan).unwrap();
        assert_eq!(
            tree,
            ExprNode::operation(
                "*",
                vec![
                    ExprNode::operation(
                        "+",
                        vec![ExprNode::column("PEOPLE", "AGE"), ExprNode::literal("1")]
                    ),
                    ExprNode::literal("2"),
                ]
            )
        );
    }

    #[test]
    fn test_aggregate_result_expands_into_call() {
        let plan = people()
            .aggregate(vec![1], vec![AggregateCall::new("COUNT", vec![]), AggregateCall::new("AVG", vec![2])])
            .unwrap()
            .build();
        assert_eq!(resolve_to_expr_node(0, &plan).unwrap(), ExprNode::column("PEOPLE", "NAME"));
        assert_eq!(
            resolve_to_expr_node(1, &plan).unwrap(),
            ExprNode::operation("COUNT", vec![ExprNode::literal("*")])
        );
        assert_eq!(
            resolve_to_expr_node(2, &plan).unwrap(),
            ExprNode::operation("AVG", vec![ExprNode::column("PEOPLE", "AGE")])
        );
        assert!(resolve_to_expr_node(3, &plan).is_err());
    }

    #[test]
    fn test_values_placeholder() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("a", DataType::Int32, false),
            Field::new("b", DataType::Int32, false),
        ]));
        let plan = PlanBuilder::values(schema).build();
        assert_eq!(resolve_to_expr_node(1, &plan).unwrap(), ExprNode::literal("?[1]"));
    }

    #[test]
    fn test_source_columns_first_seen_and_deduplicated() {
        let input = people().build();
        let tree = build(&call("COALESCE", vec![col(2), col(0), col(2)]), &input).unwrap();
        let sources: Vec<String> = tree.source_columns().into_iter().collect();
        assert_eq!(sources, vec!["PEOPLE.AGE".to_string(), "PEOPLE.ID".to_string()]);
    }
}
