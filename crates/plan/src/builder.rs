use crate::expr::ScalarExpr;
use crate::plan::{AggregateCall, JoinType, PlanNode, SortKey};
use arrow::datatypes::SchemaRef;
use tributary_common::{Error, MemoryCatalog, Result};

/// Builds a [`PlanNode`] bottom-up, checking every positional reference
/// against the width of the node it addresses.
///
/// ```rust
/// use arrow::datatypes::{DataType, Field, Schema};
/// use std::sync::Arc;
/// use tributary_plan::{col, PlanBuilder};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("ID", DataType::Int32, false)]));
/// let plan = PlanBuilder::scan_with_schema("T", schema).project(vec![col(0)]).unwrap().build();
/// assert_eq!(plan.width(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    plan: PlanNode,
}

impl PlanBuilder {
    pub fn from(plan: PlanNode) -> Self {
        Self { plan }
    }

    /// Starts from a scan of a table registered in `catalog`.
    pub fn scan(catalog: &MemoryCatalog, table_name: &str) -> Result<Self> {
        let schema = catalog.table(table_name)?;
        Ok(Self::scan_with_schema(table_name.to_uppercase(), schema))
    }

    pub fn scan_with_schema(table_name: impl Into<String>, schema: SchemaRef) -> Self {
        Self::from(PlanNode::TableScan { table_name: table_name.into(), schema })
    }

    pub fn values(schema: SchemaRef) -> Self {
        Self::from(PlanNode::Values { schema })
    }

    pub fn project(self, expressions: Vec<ScalarExpr>) -> Result<Self> {
        check_exprs(&self.plan, &expressions)?;
        Ok(Self::from(PlanNode::Project { input: Box::new(self.plan), expressions }))
    }

    pub fn filter(self, condition: ScalarExpr) -> Result<Self> {
        check_exprs(&self.plan, std::slice::from_ref(&condition))?;
        Ok(Self::from(PlanNode::Filter { input: Box::new(self.plan), condition }))
    }

    /// Joins with `right`. The condition addresses the concatenated
    /// `left ++ right` column space.
    pub fn join(
        self,
        right: PlanNode,
        join_type: JoinType,
        condition: Option<ScalarExpr>,
    ) -> Result<Self> {
        let join = PlanNode::Join {
            left: Box::new(self.plan),
            right: Box::new(right),
            join_type,
            condition,
        };
        if let PlanNode::Join { condition: Some(condition), .. } = &join {
            check_exprs(&join, std::slice::from_ref(condition))?;
        }
        Ok(Self::from(join))
    }

    pub fn aggregate(
        self,
        group_indices: Vec<usize>,
        aggregate_calls: Vec<AggregateCall>,
    ) -> Result<Self> {
        let width = self.plan.width();
        let arguments = aggregate_calls.iter().flat_map(|call| call.argument_indices.iter());
        for &index in group_indices.iter().chain(arguments) {
            check_index(&self.plan, index, width)?;
        }
        Ok(Self::from(PlanNode::Aggregate {
            input: Box::new(self.plan),
            group_indices,
            aggregate_calls,
        }))
    }

    pub fn sort(self, keys: Vec<SortKey>) -> Result<Self> {
        let width = self.plan.width();
        for key in &keys {
            check_index(&self.plan, key.index, width)?;
        }
        Ok(Self::from(PlanNode::Sort { input: Box::new(self.plan), keys }))
    }

    pub fn limit(self, offset: usize, fetch: Option<usize>) -> Self {
        Self::from(PlanNode::Limit { input: Box::new(self.plan), offset, fetch })
    }

    pub fn width(&self) -> usize {
        self.plan.width()
    }

    pub fn build(self) -> PlanNode {
        self.plan
    }
}

/// Position of `column` in the schema `catalog` holds for `table_name`.
pub fn column_index(catalog: &MemoryCatalog, table_name: &str, column: &str) -> Result<usize> {
    let schema = catalog.table(table_name)?;
    schema.index_of(column).map_err(|_| Error::ColumnNotFound {
        table: table_name.to_string(),
        column: column.to_string(),
    })
}

fn check_exprs(input: &PlanNode, expressions: &[ScalarExpr]) -> Result<()> {
    let width = input.width();
    for expr in expressions {
        for index in expr.column_indices() {
            check_index(input, index, width)?;
        }
    }
    Ok(())
}

fn check_index(input: &PlanNode, index: usize, width: usize) -> Result<()> {
    if index < width {
        Ok(())
    } else {
        Err(Error::out_of_bounds(input.kind(), index, width))
    }
}
