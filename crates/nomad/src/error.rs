use derive_more::Display;
use nomad_core::error::{ErrorDetail, ErrorOrigin as CoreErrorOrigin, InternalError};
use nomad_core::persist::PersistError;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        let kind = match &err.detail {
            Some(ErrorDetail::Codec(_)) => ErrorKind::Codec,
            Some(ErrorDetail::Config(_)) => ErrorKind::Config,
            Some(ErrorDetail::Persist(PersistError::NoStrategy { .. })) => {
                ErrorKind::MissingStrategy
            }
            Some(ErrorDetail::Persist(PersistError::TransactionAborted)) => ErrorKind::Rollback,
            Some(ErrorDetail::Schema(_)) => ErrorKind::Schema,
            None => ErrorKind::Internal,
        };

        Self::new(kind, err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// A well-formed value does not fit its column type.
    Codec,

    /// `save` found no strategy, hook or permissive policy.
    MissingStrategy,

    /// A rollback signal escaped a transaction wrapper.
    Rollback,

    /// A schema declaration could not be frozen.
    Schema,

    Config,

    /// Raised by a caller-supplied strategy, or a bug.
    Internal,
}

///
/// ErrorOrigin
/// Public origin taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Format,
    Persist,
    Record,
    Schema,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Codec => Self::Codec,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Format => Self::Format,
            CoreErrorOrigin::Persist => Self::Persist,
            CoreErrorOrigin::Record => Self::Record,
            CoreErrorOrigin::Schema => Self::Schema,
        }
    }
}

///
/// TESTS
///
