use std::fmt;

/// A value-producing expression attached to a plan node.
///
/// Column references are positional: `Column(i)` addresses the i-th column
/// of the enclosing node's *input*, never the node's own output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarExpr {
    /// A reference to an input column by position.
    Column(usize),
    /// A constant. `value` is `None` for SQL NULL.
    Literal { value: Option<String>, is_character: bool },
    /// An operator or function applied to operands, e.g. `=`, `*`, `||`, `UPPER`.
    Call { operator: String, operands: Vec<ScalarExpr> },
    /// A bind parameter (`?`) whose value is supplied at execution time.
    DynamicParam(usize),
}

impl ScalarExpr {
    /// Visits every column index referenced by this expression, depth first.
    pub fn for_each_column(&self, f: &mut impl FnMut(usize)) {
        match self {
            ScalarExpr::Column(index) => f(*index),
            ScalarExpr::Call { operands, .. } => {
                for operand in operands {
                    operand.for_each_column(f);
                }
            }
            ScalarExpr::Literal { .. } | ScalarExpr::DynamicParam(_) => {}
        }
    }

    /// Column indices referenced by this expression in first-seen order.
    pub fn column_indices(&self) -> Vec<usize> {
        let mut indices = Vec::new();
        self.for_each_column(&mut |index| {
            if !indices.contains(&index) {
                indices.push(index);
            }
        });
        indices
    }
}

/// Reference to input column `index`.
pub fn col(index: usize) -> ScalarExpr {
    ScalarExpr::Column(index)
}

/// A non-character literal such as a number or boolean, rendered as-is.
pub fn lit(value: impl Into<String>) -> ScalarExpr {
    ScalarExpr::Literal { value: Some(value.into()), is_character: false }
}

/// A character literal, rendered single-quoted.
pub fn lit_str(value: impl Into<String>) -> ScalarExpr {
    ScalarExpr::Literal { value: Some(value.into()), is_character: true }
}

pub fn null() -> ScalarExpr {
    ScalarExpr::Literal { value: None, is_character: false }
}

pub fn call(operator: impl Into<String>, operands: Vec<ScalarExpr>) -> ScalarExpr {
    ScalarExpr::Call { operator: operator.into(), operands }
}

/// Shorthand for a two-operand call such as `$4 = $7`.
pub fn binary(left: ScalarExpr, operator: impl Into<String>, right: ScalarExpr) -> ScalarExpr {
    call(operator, vec![left, right])
}

impl fmt::Display for ScalarExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarExpr::Column(index) => write!(f, "${index}"),
            ScalarExpr::Literal { value: None, .. } => write!(f, "NULL"),
            ScalarExpr::Literal { value: Some(value), is_character: true } => {
                write!(f, "'{value}'")
            }
            ScalarExpr::Literal { value: Some(value), is_character: false } => {
                write!(f, "{value}")
            }
            ScalarExpr::Call { operator, operands } => {
                write!(f, "{operator}(")?;
                for (i, operand) in operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{operand}")?;
                }
                write!(f, ")")
            }
            ScalarExpr::DynamicParam(index) => write!(f, "?{index}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_indices_deduplicated_in_order() {
        let expr = call(
            "AND",
            vec![binary(col(3), "=", lit("10")), binary(col(1), ">", col(3))],
        );
        assert_eq!(expr.column_indices(), vec![3, 1]);
    }

    #[test]
    fn test_literals_have_no_columns() {
        assert!(lit_str("x").column_indices().is_empty());
        assert!(ScalarExpr::DynamicParam(0).column_indices().is_empty());
    }

    #[test]
    fn test_display() {
        let expr = call("||", vec![col(1), lit_str(" "), null()]);
        assert_eq!(expr.to_string(), "||($1, ' ', NULL)");
        assert_eq!(binary(col(5), "*", lit("1.1")).to_string(), "*($5, 1.1)");
    }
}
