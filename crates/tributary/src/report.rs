use crate::config::OutputFormat;
use serde::Serialize;
use std::fmt;
use tributary_lineage::{ExprNode, QueryAnalysis};

const RULE: usize = 70;

#[derive(Serialize)]
struct JsonReport<'a> {
    query: &'a str,
    sql: &'a str,
    #[serde(flatten)]
    analysis: &'a QueryAnalysis,
}

/// Renders one analyzed query in the requested format.
pub fn render(
    name: &str,
    sql: &str,
    analysis: &QueryAnalysis,
    format: OutputFormat,
    sorted_output: bool,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&JsonReport { query: name, sql, analysis })
        }
        OutputFormat::Text => Ok(render_text(sql, analysis, sorted_output, ExprNode::pretty)),
        OutputFormat::Tree => Ok(render_text(sql, analysis, sorted_output, ExprNode::tree_string)),
    }
}

fn render_text(
    sql: &str,
    analysis: &QueryAnalysis,
    sorted_output: bool,
    expression: fn(&ExprNode) -> String,
) -> String {
    TextReport { sql, analysis, sorted_output, expression }.to_string()
}

struct TextReport<'a> {
    sql: &'a str,
    analysis: &'a QueryAnalysis,
    sorted_output: bool,
    expression: fn(&ExprNode) -> String,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = format!("   {}", "-".repeat(RULE));
        let analysis = self.analysis;

        writeln!(f, "Query: {}", self.sql)?;
        writeln!(f, "{}", "=".repeat(80))?;

        writeln!(f, "\nOUTPUT COLUMNS (Result Set):\n{rule}")?;
        for column in &analysis.output_columns {
            let nullability = if column.nullable { "" } else { " NOT NULL" };
            writeln!(f, "   {:<30} {}{}", column.name, column.data_type, nullability)?;
        }

        writeln!(f, "\nINPUT COLUMNS (Source Tables):\n{rule}")?;
        let mut inputs: Vec<&String> = analysis.input_columns.iter().collect();
        if self.sorted_output {
            inputs.sort();
        }
        for input in inputs {
            writeln!(f, "   {input}")?;
        }

        writeln!(f, "\nCOLUMN LINEAGE (Output -> Expression -> Source Columns):\n{rule}")?;
        for record in &analysis.lineage {
            writeln!(f, "\n   {}:", record.output_column)?;
            let rendered = (self.expression)(&record.expression);
            let mut lines = rendered.lines();
            writeln!(f, "      Expression: {}", lines.next().unwrap_or_default())?;
            for line in lines {
                writeln!(f, "                  {line}")?;
            }
            let sources: Vec<&str> = record.source_columns.iter().map(String::as_str).collect();
            writeln!(f, "      Source columns: [{}]", sources.join(", "))?;
        }

        // Table names are kept ordered by the analyzer; `sorted_output` only
        // affects the input column listing.
        writeln!(f, "\nTABLES REFERENCED:\n{rule}")?;
        for table in &analysis.tables {
            writeln!(f, "   {table}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::{company_catalog, demo_queries};
    use tributary_lineage::analyze;

    fn computed() -> (String, QueryAnalysis) {
        let catalog = company_catalog();
        let query = demo_queries(&catalog)
            .unwrap()
            .into_iter()
            .find(|q| q.name == "computed")
            .unwrap();
        let analysis = analyze(&query.plan, &query.output_schema).unwrap();
        (query.sql.to_string(), analysis)
    }

    #[test]
    fn test_text_report_sections() {
        let (sql, analysis) = computed();
        let text = render("computed", &sql, &analysis, OutputFormat::Text, true).unwrap();

        assert!(text.starts_with("Query: SELECT FIRST_NAME"));
        assert!(text.contains("OUTPUT COLUMNS (Result Set):"));
        assert!(text.contains("   EMPLOYEES.DEPARTMENT_ID\n"));
        assert!(text.contains("\n   NEW_SALARY:\n      Expression: *(EMPLOYEES.SALARY, 1.1)\n"));
        assert!(text.contains("      Source columns: [EMPLOYEES.FIRST_NAME, EMPLOYEES.LAST_NAME]\n"));
        assert!(text.ends_with("TABLES REFERENCED:\n   ----------------------------------------------------------------------\n   EMPLOYEES\n"));
    }

    #[test]
    fn test_sorted_input_columns() {
        let (sql, analysis) = computed();
        let text = render("computed", &sql, &analysis, OutputFormat::Text, true).unwrap();
        let department = text.find("   EMPLOYEES.DEPARTMENT_ID\n").unwrap();
        let first_name = text.find("   EMPLOYEES.FIRST_NAME\n").unwrap();
        let salary = text.find("   EMPLOYEES.SALARY\n").unwrap();
        assert!(department < first_name && first_name < salary);
    }

    #[test]
    fn test_tree_report_indents_continuation_lines() {
        let (sql, analysis) = computed();
        let text = render("computed", &sql, &analysis, OutputFormat::Tree, true).unwrap();
        assert!(text.contains("      Expression: └── [*]\n"));
        assert!(text.contains("                      ├── [Column] EMPLOYEES.SALARY\n"));
        assert!(text.contains("                      └── [Literal] 1.1\n"));
    }

    #[test]
    fn test_json_report() {
        let (sql, analysis) = computed();
        let json = render("computed", &sql, &analysis, OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["query"], "computed");
        assert_eq!(value["tables"], serde_json::json!(["EMPLOYEES"]));
        assert_eq!(value["lineage"][1]["output_column"], "NEW_SALARY");
        assert_eq!(
            value["lineage"][1]["source_columns"],
            serde_json::json!(["EMPLOYEES.SALARY"])
        );
    }
}
