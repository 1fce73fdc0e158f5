//! Main Tributary crate
//!
//! Runs column lineage analysis over the bundled demo queries and renders
//! one report per query.

pub mod config;
pub mod demo;
pub mod error;
pub mod report;

use crate::config::OutputFormat;
use crate::error::CliError;
use tracing::info;
use tributary_lineage::analyze;

/// Analyzes the demo queries (only `only` when given) and returns the
/// rendered reports joined in order.
pub fn run(only: Option<&str>, format: OutputFormat, sorted_output: bool) -> Result<String, CliError> {
    let catalog = demo::company_catalog();
    let queries: Vec<_> = demo::demo_queries(&catalog)?
        .into_iter()
        .filter(|query| only.map_or(true, |name| query.name == name))
        .collect();
    if let Some(name) = only {
        if queries.is_empty() {
            return Err(CliError::UnknownQuery(name.to_string()));
        }
    }

    let mut reports = Vec::with_capacity(queries.len());
    for query in &queries {
        info!(query = query.name, "analyzing");
        let analysis = analyze(&query.plan, &query.output_schema)?;
        reports.push(report::render(query.name, query.sql, &analysis, format, sorted_output)?);
    }
    Ok(reports.join("\n"))
}
