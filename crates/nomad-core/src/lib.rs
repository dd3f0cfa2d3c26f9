//! Core runtime for nomad: typed columns, records, the value codec, wire
//! formatters and the persistence indirection, plus the vocabulary exported
//! via the `prelude`.

// public exports are one module level down
pub mod codec;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod obs;
pub mod persist;
pub mod record;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks or codec internals are re-exported here.
///

pub mod prelude {
    pub use crate::{
        config::{CoreConfig, MissingStrategyPolicy, ZonePolicy},
        model::{ColumnOptions, ColumnType, Schema, SchemaBuilder},
        persist::{Persist, RecordState, SaveStatus, Transacted, TransactionHook},
        record::Record,
        types::{Date, DateTime, Decimal, TimeOfDay},
        value::Value,
    };
}
