use thiserror::Error;

/// Unified error type for Tributary crates.
///
/// Lineage that cannot be traced to a single physical column is not an
/// error; these variants only describe plans that break their own schema
/// arithmetic, or lookups that failed while a plan was being built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Column index {index} is out of bounds for {node} with {width} output columns")]
    IndexOutOfBounds { node: &'static str, index: usize, width: usize },
    #[error("Output schema has {actual} columns but {node} produces {expected}")]
    OutputSchemaMismatch { node: &'static str, expected: usize, actual: usize },
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Column {column} not found in table {table}")]
    ColumnNotFound { table: String, column: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn out_of_bounds(node: &'static str, index: usize, width: usize) -> Self {
        Error::IndexOutOfBounds { node, index, width }
    }
}
