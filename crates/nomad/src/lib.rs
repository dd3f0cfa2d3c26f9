//! ## Crate layout
//! - `core`: schema registry, records, the value codec, wire formatters,
//!   persistence and observability.
//! - `error`: the public error type with a stable kind and origin taxonomy.
//!
//! The `prelude` module carries everything needed to declare a schema,
//! build records and move them across the three wire formats.

pub use nomad_core as core;

pub mod error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::format::SerializedAttributes;
pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        core::prelude::*,
        error::{Error, ErrorKind},
    };
}
