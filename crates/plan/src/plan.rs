use crate::expr::ScalarExpr;
use arrow::datatypes::SchemaRef;
use std::fmt;

/// Represents a validated relational query plan.
///
/// Every node's output width is a deterministic function of its children
/// and its own parameters, see [`PlanNode::width`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNode {
    /// Reads a physical table. The schema's field order defines index space `0..n`.
    TableScan { table_name: String, schema: SchemaRef },
    /// Inline rows (`VALUES (...)`) with no physical table behind them.
    Values { schema: SchemaRef },
    /// Output column `i` is `expressions[i]` evaluated over `input`.
    Project { input: Box<PlanNode>, expressions: Vec<ScalarExpr> },
    /// Filters rows of `input`; the schema passes through unchanged.
    Filter { input: Box<PlanNode>, condition: ScalarExpr },
    /// Output is `left` columns followed by `right` columns. The condition
    /// addresses that concatenated space.
    Join {
        left: Box<PlanNode>,
        right: Box<PlanNode>,
        join_type: JoinType,
        condition: Option<ScalarExpr>,
    },
    /// Output is the group keys in order, then the aggregate calls in order.
    Aggregate {
        input: Box<PlanNode>,
        group_indices: Vec<usize>,
        aggregate_calls: Vec<AggregateCall>,
    },
    /// Orders rows of `input`; the schema passes through unchanged.
    Sort { input: Box<PlanNode>, keys: Vec<SortKey> },
    /// Skips and truncates rows of `input`; the schema passes through unchanged.
    Limit { input: Box<PlanNode>, offset: usize, fetch: Option<usize> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
            JoinType::Cross => "CROSS",
        };
        write!(f, "{name}")
    }
}

/// An aggregate function applied to columns of the aggregate's input.
///
/// An empty `argument_indices` means a no-argument call such as `COUNT(*)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregateCall {
    pub function_name: String,
    pub argument_indices: Vec<usize>,
    pub distinct: bool,
}

impl AggregateCall {
    pub fn new(function_name: impl Into<String>, argument_indices: Vec<usize>) -> Self {
        Self { function_name: function_name.into(), argument_indices, distinct: false }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

impl fmt::Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function_name)?;
        if self.distinct {
            write!(f, "DISTINCT ")?;
        }
        let args: Vec<String> = self.argument_indices.iter().map(|i| format!("${i}")).collect();
        write!(f, "{})", args.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub index: usize,
    pub descending: bool,
}

impl SortKey {
    pub fn asc(index: usize) -> Self {
        Self { index, descending: false }
    }

    pub fn desc(index: usize) -> Self {
        Self { index, descending: true }
    }
}

impl PlanNode {
    /// Number of columns this node outputs.
    pub fn width(&self) -> usize {
        match self {
            PlanNode::TableScan { schema, .. } | PlanNode::Values { schema } => {
                schema.fields().len()
            }
            PlanNode::Project { expressions, .. } => expressions.len(),
            PlanNode::Join { left, right, .. } => left.width() + right.width(),
            PlanNode::Aggregate { group_indices, aggregate_calls, .. } => {
                group_indices.len() + aggregate_calls.len()
            }
            PlanNode::Filter { input, .. }
            | PlanNode::Sort { input, .. }
            | PlanNode::Limit { input, .. } => input.width(),
        }
    }

    /// Operator name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanNode::TableScan { .. } => "TableScan",
            PlanNode::Values { .. } => "Values",
            PlanNode::Project { .. } => "Project",
            PlanNode::Filter { .. } => "Filter",
            PlanNode::Join { .. } => "Join",
            PlanNode::Aggregate { .. } => "Aggregate",
            PlanNode::Sort { .. } => "Sort",
            PlanNode::Limit { .. } => "Limit",
        }
    }

    /// Direct children, left before right.
    pub fn inputs(&self) -> Vec<&PlanNode> {
        match self {
            PlanNode::TableScan { .. } | PlanNode::Values { .. } => vec![],
            PlanNode::Join { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            PlanNode::Project { input, .. }
            | PlanNode::Filter { input, .. }
            | PlanNode::Aggregate { input, .. }
            | PlanNode::Sort { input, .. }
            | PlanNode::Limit { input, .. } => vec![input.as_ref()],
        }
    }

    /// The sole input of a node whose schema is its input's schema
    /// (filter, sort, limit). `None` for every other node.
    pub fn passthrough_input(&self) -> Option<&PlanNode> {
        match self {
            PlanNode::Filter { input, .. }
            | PlanNode::Sort { input, .. }
            | PlanNode::Limit { input, .. } => Some(input.as_ref()),
            _ => None,
        }
    }

    fn fmt_indent(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{}", "  ".repeat(indent))?;
        match self {
            PlanNode::TableScan { table_name, schema } => {
                let names: Vec<&str> = schema.fields().iter().map(|field| field.name().as_str()).collect();
                writeln!(f, "TableScan: {table_name} [{}]", names.join(", "))?;
            }
            PlanNode::Values { schema } => {
                writeln!(f, "Values: {} columns", schema.fields().len())?;
            }
            PlanNode::Project { expressions, .. } => {
                let exprs: Vec<String> = expressions.iter().map(ToString::to_string).collect();
                writeln!(f, "Project: [{}]", exprs.join(", "))?;
            }
            PlanNode::Filter { condition, .. } => writeln!(f, "Filter: {condition}")?,
            PlanNode::Join { join_type, condition, .. } => match condition {
                Some(condition) => writeln!(f, "Join: {join_type} ON {condition}")?,
                None => writeln!(f, "Join: {join_type}")?,
            },
            PlanNode::Aggregate { group_indices, aggregate_calls, .. } => {
                let groups: Vec<String> = group_indices.iter().map(|i| format!("${i}")).collect();
                let calls: Vec<String> = aggregate_calls.iter().map(ToString::to_string).collect();
                writeln!(f, "Aggregate: group=[{}] calls=[{}]", groups.join(", "), calls.join(", "))?;
            }
            PlanNode::Sort { keys, .. } => {
                let keys: Vec<String> = keys
                    .iter()
                    .map(|k| if k.descending { format!("${} DESC", k.index) } else { format!("${}", k.index) })
                    .collect();
                writeln!(f, "Sort: {}", keys.join(", "))?;
            }
            PlanNode::Limit { offset, fetch, .. } => match fetch {
                Some(fetch) => writeln!(f, "Limit: offset={offset} fetch={fetch}")?,
                None => writeln!(f, "Limit: offset={offset}")?,
            },
        }
        for input in self.inputs() {
            input.fmt_indent(f, indent + 1)?;
        }
        Ok(())
    }
}

/// Renders the plan as an indented operator tree, one node per line.
impl fmt::Display for PlanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_indent(f, 0)
    }
}
