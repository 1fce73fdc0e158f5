//! Common crate
//!
//! Shared error handling and the table-schema catalog for Tributary.
//!
//! # Example
//! ```rust
//! use tributary_common::Error;
//! let err = Error::out_of_bounds("TableScan", 4, 3);
//! assert!(err.to_string().contains("TableScan"));
//! ```

pub mod catalog;
pub mod error;

pub use arrow::datatypes::{Schema, SchemaRef};
pub use catalog::MemoryCatalog;
pub use error::{Error, Result};
