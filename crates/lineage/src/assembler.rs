use crate::expr_tree::{aggregate_expression, build, resolve_to_expr_node, ExprNode};
use crate::resolver::resolve;
use arrow::datatypes::Schema;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, trace};
use tributary_common::{Error, Result};
use tributary_plan::{PlanNode, ScalarExpr};

/// How one output column is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineageRecord {
    pub output_column: String,
    pub expression: ExprNode,
    /// Physical `table.column` leaves of `expression`, first-seen order.
    pub source_columns: IndexSet<String>,
}

impl LineageRecord {
    pub fn new(output_column: impl Into<String>, expression: ExprNode) -> Self {
        let source_columns = expression.source_columns();
        Self { output_column: output_column.into(), expression, source_columns }
    }
}

impl fmt::Display for LineageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.output_column, self.expression)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputColumn {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Everything the analyzer reports about one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAnalysis {
    pub output_columns: Vec<OutputColumn>,
    pub input_columns: IndexSet<String>,
    pub lineage: Vec<LineageRecord>,
    pub tables: BTreeSet<String>,
}

/// Runs every analysis over `root`, whose result set is `output_schema`.
pub fn analyze(root: &PlanNode, output_schema: &Schema) -> Result<QueryAnalysis> {
    let output_columns = output_schema
        .fields()
        .iter()
        .map(|field| OutputColumn {
            name: field.name().clone(),
            data_type: field.data_type().to_string(),
            nullable: field.is_nullable(),
        })
        .collect();

    Ok(QueryAnalysis {
        output_columns,
        input_columns: extract_all_input_columns(root)?,
        lineage: build_lineage(root, output_schema)?,
        tables: extract_tables_used(root),
    })
}

/// One [`LineageRecord`] per column of `output_schema`.
///
/// The records are derived from the first project or aggregate found by
/// descending from `root` through filters, sorts and limits. When there is
/// none, each output position is expanded directly against `root`. That node
/// may be wider than `output_schema` (a sort key computed only for ordering);
/// trailing columns without an output name get no record.
pub fn build_lineage(root: &PlanNode, output_schema: &Schema) -> Result<Vec<LineageRecord>> {
    let top = find_top(root);
    debug!(target: "lineage", node = top.kind(), outputs = output_schema.fields().len(), "Building column lineage");

    let expected = top.width();
    let actual = output_schema.fields().len();
    if actual > expected {
        return Err(Error::OutputSchemaMismatch { node: top.kind(), expected, actual });
    }
    let names = output_schema.fields().iter().map(|field| field.name().as_str());

    let records = match top {
        PlanNode::Project { input, expressions } => names
            .zip(expressions)
            .map(|(name, expr)| -> Result<LineageRecord> {
                Ok(LineageRecord::new(name, build(expr, input)?))
            })
            .collect::<Result<Vec<_>>>()?,
        PlanNode::Aggregate { input, group_indices, aggregate_calls } => {
            let groups = group_indices.iter().map(|index| resolve_to_expr_node(*index, input));
            let calls = aggregate_calls.iter().map(|call| aggregate_expression(call, input));
            names
                .zip(groups.chain(calls))
                .map(|(name, expression)| -> Result<LineageRecord> {
                    Ok(LineageRecord::new(name, expression?))
                })
                .collect::<Result<Vec<_>>>()?
        }
        _ => names
            .enumerate()
            .map(|(index, name)| -> Result<LineageRecord> {
                Ok(LineageRecord::new(name, resolve_to_expr_node(index, root)?))
            })
            .collect::<Result<Vec<_>>>()?,
    };

    for record in &records {
        trace!(target: "lineage", record = %record, sources = record.source_columns.len(), "Derived output column");
    }
    Ok(records)
}

fn find_top(root: &PlanNode) -> &PlanNode {
    let mut current = root;
    while let Some(input) = current.passthrough_input() {
        current = input;
    }
    current
}

/// Every physical column the plan reads anywhere, in first-seen order.
///
/// Covers the columns returned by `root` and every column referenced by a
/// project expression, filter or join condition, group key, aggregate
/// argument or sort key in any node, whether or not it reaches the output.
/// References to computed columns contribute nothing; the columns they are
/// computed from are picked up where they are computed.
pub fn extract_all_input_columns(root: &PlanNode) -> Result<IndexSet<String>> {
    let mut columns = IndexSet::new();
    for index in 0..root.width() {
        collect_index(index, root, &mut columns)?;
    }
    collect_plan_columns(root, &mut columns)?;
    debug!(target: "lineage", count = columns.len(), "Extracted input columns");
    Ok(columns)
}

fn collect_plan_columns(node: &PlanNode, columns: &mut IndexSet<String>) -> Result<()> {
    match node {
        PlanNode::Project { input, expressions } => {
            for expr in expressions {
                collect_expr_columns(expr, input, columns)?;
            }
        }
        PlanNode::Filter { input, condition } => collect_expr_columns(condition, input, columns)?,
        // Join conditions address the join's own concatenated output.
        PlanNode::Join { condition: Some(condition), .. } => {
            collect_expr_columns(condition, node, columns)?
        }
        PlanNode::Aggregate { input, group_indices, aggregate_calls } => {
            let arguments = aggregate_calls.iter().flat_map(|call| call.argument_indices.iter());
            for index in group_indices.iter().chain(arguments) {
                collect_index(*index, input, columns)?;
            }
        }
        PlanNode::Sort { input, keys } => {
            for key in keys {
                collect_index(key.index, input, columns)?;
            }
        }
        PlanNode::TableScan { .. }
        | PlanNode::Values { .. }
        | PlanNode::Join { condition: None, .. }
        | PlanNode::Limit { .. } => {}
    }

    for input in node.inputs() {
        collect_plan_columns(input, columns)?;
    }
    Ok(())
}

fn collect_expr_columns(
    expr: &ScalarExpr,
    source: &PlanNode,
    columns: &mut IndexSet<String>,
) -> Result<()> {
    for index in expr.column_indices() {
        collect_index(index, source, columns)?;
    }
    Ok(())
}

fn collect_index(index: usize, source: &PlanNode, columns: &mut IndexSet<String>) -> Result<()> {
    if let Some(column) = resolve(source, index)? {
        columns.insert(column.to_string());
    }
    Ok(())
}

/// Names of all tables scanned anywhere in the plan.
pub fn extract_tables_used(root: &PlanNode) -> BTreeSet<String> {
    let mut tables = BTreeSet::new();
    collect_tables(root, &mut tables);
    debug!(target: "lineage", count = tables.len(), "Extracted tables");
    tables
}

fn collect_tables(node: &PlanNode, tables: &mut BTreeSet<String>) {
    if let PlanNode::TableScan { table_name, .. } = node {
        tables.insert(table_name.clone());
    }
    for input in node.inputs() {
        collect_tables(input, tables);
    }
}
