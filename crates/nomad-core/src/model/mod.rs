//! Column schema and the per-type schema registry.
//!
//! - `Column` describes one attribute and never changes after declaration.
//! - `SchemaBuilder` collects declarations (inheriting a parent's columns).
//! - `Schema` is the frozen result every record of the type shares.

mod column;
mod schema;


use crate::codec::CodecError;
use thiserror::Error as ThisError;

// re-exports
pub use column::{Column, ColumnOptions, ColumnType};
pub use schema::{Schema, SchemaBuilder};

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("invalid default for column '{column}' of '{schema}': {source}")]
    InvalidDefault {
        schema: String,
        column: String,
        source: CodecError,
    },
}
