use crate::error::{Error, Result};
use arrow::datatypes::SchemaRef;
use std::collections::HashMap;

/// In-memory registry of physical table schemas, keyed by table name.
///
/// Lookups are case-insensitive: names are stored upper-cased, the way an
/// unquoted SQL identifier would be folded.
pub struct MemoryCatalog {
    pub tables: HashMap<String, SchemaRef>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    pub fn register_table(&mut self, name: &str, schema: SchemaRef) {
        self.tables.insert(name.to_uppercase(), schema);
    }

    pub fn get_table(&self, name: &str) -> Option<SchemaRef> {
        self.tables.get(&name.to_uppercase()).cloned()
    }

    /// Like [`MemoryCatalog::get_table`], but a missing table is an error.
    pub fn table(&self, name: &str) -> Result<SchemaRef> {
        self.get_table(name).ok_or_else(|| Error::TableNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{DataType, Field, Schema};
    use std::sync::Arc;

    fn regions() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("REGION_ID", DataType::Int32, false),
            Field::new("REGION_NAME", DataType::Utf8, true),
        ]))
    }

    #[test]
    fn test_register_and_get_is_case_insensitive() {
        let mut catalog = MemoryCatalog::new();
        catalog.register_table("regions", regions());

        let schema = catalog.get_table("REGIONS").expect("table should be registered");
        assert_eq!(schema.fields().len(), 2);
        assert!(catalog.get_table("Regions").is_some());
    }

    #[test]
    fn test_missing_table_is_error() {
        let catalog = MemoryCatalog::new();
        assert_eq!(catalog.table("nope"), Err(Error::TableNotFound("nope".to_string())));
    }
}
