//! Text renderings of lineage trees.

use crate::expr_tree::ExprNode;
use std::fmt;

/// Single-line form: `T.C`, literal text, or `NAME(child, child)`.
impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Column { table, column } => write!(f, "{table}.{column}"),
            ExprNode::Literal { text } => write!(f, "{text}"),
            ExprNode::Operation { name, children } => {
                write!(f, "{name}(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl ExprNode {
    /// Multi-line form. An operation with at most two children, none of
    /// them operations, stays on one line; anything larger puts each child
    /// on its own line, two spaces deeper per level.
    pub fn pretty(&self) -> String {
        Pretty(self).to_string()
    }

    /// Box-drawing tree, one node per line, e.g.
    ///
    /// ```text
    /// └── [*]
    ///     ├── [Column] EMPLOYEES.SALARY
    ///     └── [Literal] 1.1
    /// ```
    pub fn tree_string(&self) -> String {
        Tree(self).to_string()
    }
}

struct Pretty<'a>(&'a ExprNode);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_pretty(self.0, f, 0)
    }
}

fn write_pretty(node: &ExprNode, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    let ExprNode::Operation { name, children } = node else {
        return write!(f, "{node}");
    };
    let inline =
        children.len() <= 2 && children.iter().all(|c| !matches!(c, ExprNode::Operation { .. }));
    if inline {
        return write!(f, "{node}");
    }

    let pad = "  ".repeat(indent);
    writeln!(f, "{name}(")?;
    for (i, child) in children.iter().enumerate() {
        write!(f, "{pad}  ")?;
        write_pretty(child, f, indent + 1)?;
        if i + 1 < children.len() {
            write!(f, ",")?;
        }
        writeln!(f)?;
    }
    write!(f, "{pad})")
}

struct Tree<'a>(&'a ExprNode);

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(self.0, f, "", true)
    }
}

fn write_tree(node: &ExprNode, f: &mut fmt::Formatter<'_>, prefix: &str, is_last: bool) -> fmt::Result {
    write!(f, "{prefix}{}", if is_last { "└── " } else { "├── " })?;
    let children: &[ExprNode] = match node {
        ExprNode::Column { .. } => {
            writeln!(f, "[Column] {node}")?;
            &[]
        }
        ExprNode::Literal { text } => {
            writeln!(f, "[Literal] {text}")?;
            &[]
        }
        ExprNode::Operation { name, children } => {
            writeln!(f, "[{name}]")?;
            children
        }
    };

    let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
    for (i, child) in children.iter().enumerate() {
        write_tree(child, f, &child_prefix, i + 1 == children.len())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary_times() -> ExprNode {
        ExprNode::operation(
            "*",
            vec![ExprNode::column("EMPLOYEES", "SALARY"), ExprNode::literal("1.1")],
        )
    }

    fn full_name() -> ExprNode {
        ExprNode::operation(
            "||",
            vec![
                ExprNode::operation(
                    "||",
                    vec![ExprNode::column("EMPLOYEES", "FIRST_NAME"), ExprNode::literal("' '")],
                ),
                ExprNode::column("EMPLOYEES", "LAST_NAME"),
            ],
        )
    }

    #[test]
    fn test_display_inline() {
        assert_eq!(salary_times().to_string(), "*(EMPLOYEES.SALARY, 1.1)");
        assert_eq!(
            full_name().to_string(),
            "||(||(EMPLOYEES.FIRST_NAME, ' '), EMPLOYEES.LAST_NAME)"
        );
    }

    #[test]
    fn test_pretty_keeps_simple_operations_inline() {
        assert_eq!(salary_times().pretty(), "*(EMPLOYEES.SALARY, 1.1)");
        assert_eq!(ExprNode::column("T", "C").pretty(), "T.C");
    }

    #[test]
    fn test_pretty_breaks_nested_operations() {
        let expected = "||(\n  ||(EMPLOYEES.FIRST_NAME, ' '),\n  EMPLOYEES.LAST_NAME\n)";
        assert_eq!(full_name().pretty(), expected);
    }

    #[test]
    fn test_pretty_indents_each_level() {
        let case = ExprNode::operation(
            "CASE",
            vec![
                ExprNode::column("T", "A"),
                ExprNode::operation(
                    "||",
                    vec![
                        ExprNode::operation(
                            "+",
                            vec![ExprNode::column("T", "B"), ExprNode::literal("1")],
                        ),
                        ExprNode::column("T", "C"),
                    ],
                ),
                ExprNode::literal("'x'"),
            ],
        );
        let expected = "CASE(\n  T.A,\n  ||(\n    +(T.B, 1),\n    T.C\n  ),\n  'x'\n)";
        assert_eq!(case.pretty(), expected);
    }

    #[test]
    fn test_tree_string() {
        let expected = "└── [*]\n    ├── [Column] EMPLOYEES.SALARY\n    └── [Literal] 1.1\n";
        assert_eq!(salary_times().tree_string(), expected);
    }

    #[test]
    fn test_tree_string_nested_prefixes() {
        let expected = concat!(
            "└── [||]\n",
            "    ├── [||]\n",
            "    │   ├── [Column] EMPLOYEES.FIRST_NAME\n",
            "    │   └── [Literal] ' '\n",
            "    └── [Column] EMPLOYEES.LAST_NAME\n",
        );
        assert_eq!(full_name().tree_string(), expected);
    }
}
