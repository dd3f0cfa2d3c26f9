use crate::{codec::CodecError, config::ConfigError, model::SchemaError, persist::PersistError};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// The public facade maps this into its own `Error`; the shape here may change.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// Names the failing module; `origin` names the layer that surfaced it.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Re-tag the layer the error surfaced from, keeping its detail.
    #[must_use]
    pub const fn with_origin(mut self, origin: ErrorOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Construct an error raised from inside a save or destroy strategy.
    pub fn strategy(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Persist, message)
    }

    /// The rollback signal: raise this inside a transaction to abort it
    /// without surfacing an error to the caller.
    #[must_use]
    pub fn transaction_aborted() -> Self {
        PersistError::TransactionAborted.into()
    }

    #[must_use]
    pub const fn is_transaction_aborted(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Persist(PersistError::TransactionAborted))
        )
    }

    #[must_use]
    pub const fn is_no_strategy(&self) -> bool {
        matches!(
            self.detail,
            Some(ErrorDetail::Persist(PersistError::NoStrategy { .. }))
        )
    }

    /// Borrow the codec failure carried by this error, if any.
    #[must_use]
    pub const fn codec_error(&self) -> Option<&CodecError> {
        match &self.detail {
            Some(ErrorDetail::Codec(err)) => Some(err),
            _ => None,
        }
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("{0}")]
    Codec(CodecError),
    #[error("{0}")]
    Config(ConfigError),
    #[error("{0}")]
    Persist(PersistError),
    #[error("{0}")]
    Schema(SchemaError),
}

impl From<CodecError> for InternalError {
    fn from(err: CodecError) -> Self {
        Self {
            class: ErrorClass::Conversion,
            origin: ErrorOrigin::Codec,
            message: err.to_string(),
            detail: Some(ErrorDetail::Codec(err)),
        }
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self {
            class: ErrorClass::Config,
            origin: ErrorOrigin::Config,
            message: err.to_string(),
            detail: Some(ErrorDetail::Config(err)),
        }
    }
}

impl From<PersistError> for InternalError {
    fn from(err: PersistError) -> Self {
        let class = match err {
            PersistError::NoStrategy { .. } => ErrorClass::Unsupported,
            PersistError::TransactionAborted => ErrorClass::Aborted,
        };

        Self {
            class,
            origin: ErrorOrigin::Persist,
            message: err.to_string(),
            detail: Some(ErrorDetail::Persist(err)),
        }
    }
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        Self {
            class: ErrorClass::Conversion,
            origin: ErrorOrigin::Schema,
            message: err.to_string(),
            detail: Some(ErrorDetail::Schema(err)),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Aborted,
    Config,
    Conversion,
    Internal,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Aborted => "aborted",
            Self::Config => "config",
            Self::Conversion => "conversion",
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Codec,
    Config,
    Format,
    Persist,
    Record,
    Schema,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Codec => "codec",
            Self::Config => "config",
            Self::Format => "format",
            Self::Persist => "persist",
            Self::Record => "record",
            Self::Schema => "schema",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnType;

    #[test]
    fn codec_errors_keep_their_detail() {
        let err: InternalError = CodecError::InvalidInteger {
            input: "abc".to_string(),
        }
        .into();

        assert_eq!(err.class, ErrorClass::Conversion);
        assert_eq!(err.origin, ErrorOrigin::Codec);
        assert!(matches!(
            err.codec_error(),
            Some(CodecError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn rollback_signal_is_recognized() {
        let err = InternalError::transaction_aborted();
        assert!(err.is_transaction_aborted());
        assert_eq!(err.class, ErrorClass::Aborted);

        let other = InternalError::strategy("disk full");
        assert!(!other.is_transaction_aborted());
    }

    #[test]
    fn display_with_class_prefixes_origin_and_class() {
        let err: InternalError = CodecError::TypeMismatch {
            kind: ColumnType::Integer,
            found: "Bool",
        }
        .into();

        assert!(err.display_with_class().starts_with("codec:conversion: "));
    }
}
