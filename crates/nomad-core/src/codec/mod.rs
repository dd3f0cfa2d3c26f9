//! Typed value codec.
//!
//! One serialize/deserialize rule per [`ColumnType`], shared by every
//! formatter. The codec is strict: text that does not parse for its column
//! type is a [`CodecError`]. Escaping and ordering are formatter concerns.

mod binary;
mod coerce;


use crate::{
    config::{ConfigError, ZonePolicy},
    model::ColumnType,
    types::{Date, DateTime, Decimal, TimeOfDay},
    value::Value,
};
use thiserror::Error as ThisError;
use time::UtcOffset;

///
/// CodecError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum CodecError {
    #[error("cannot hold {found} in a {kind} column")]
    TypeMismatch { kind: ColumnType, found: &'static str },

    #[error("{found} value out of range for a {kind} column")]
    OutOfRange { kind: ColumnType, found: &'static str },

    #[error("invalid integer: '{input}'")]
    InvalidInteger { input: String },

    #[error("invalid float: '{input}'")]
    InvalidFloat { input: String },

    #[error("invalid decimal: '{input}'")]
    InvalidDecimal { input: String },

    #[error("invalid boolean: '{input}'")]
    InvalidBoolean { input: String },

    #[error("invalid date: '{input}'")]
    InvalidDate { input: String },

    #[error("invalid date-time: '{input}'")]
    InvalidDateTime { input: String },

    #[error("invalid time of day: '{input}'")]
    InvalidTime { input: String },

    #[error("binary text holds non-byte character U+{code:04X}")]
    InvalidBinary { code: u32 },
}

///
/// Codec
///
/// Carries the zone every date-time is normalized to before formatting.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Codec {
    offset: UtcOffset,
}

impl Codec {
    pub const UTC: Self = Self {
        offset: UtcOffset::UTC,
    };

    pub fn new(zone: ZonePolicy) -> Result<Self, ConfigError> {
        Ok(Self {
            offset: zone.offset()?,
        })
    }

    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Canonical text for `value` in a `kind` column; `None` iff the value
    /// is null.
    pub fn serialize(&self, value: &Value, kind: ColumnType) -> Result<Option<String>, CodecError> {
        let text = match (kind, value) {
            (_, Value::Null) => return Ok(None),

            (ColumnType::Integer, Value::Int(i)) => i.to_string(),
            (ColumnType::Float, Value::Float(f)) => f.to_string(),
            (ColumnType::Decimal, Value::Decimal(d)) => d.to_string(),
            (ColumnType::ShortText | ColumnType::LongText, Value::Text(s)) => s.clone(),
            (ColumnType::Boolean, Value::Bool(b)) => b.to_string(),
            (ColumnType::Date, Value::Date(d)) => d.to_string(),
            (ColumnType::DateTime | ColumnType::Timestamp, Value::DateTime(dt)) => {
                dt.to_offset(self.offset).to_string()
            }
            (ColumnType::TimeOfDay, Value::Time(t)) => t.anchored(self.offset).to_string(),
            (ColumnType::Binary, Value::Blob(bytes)) => binary::to_text(bytes),

            (kind, other) => {
                return Err(CodecError::TypeMismatch {
                    kind,
                    found: other.label(),
                });
            }
        };

        Ok(Some(text))
    }

    /// Inverse of [`serialize`](Self::serialize); `None` decodes to null.
    pub fn deserialize(&self, text: Option<&str>, kind: ColumnType) -> Result<Value, CodecError> {
        let Some(text) = text else {
            return Ok(Value::Null);
        };

        match kind {
            ColumnType::Integer => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| CodecError::InvalidInteger {
                    input: text.to_string(),
                }),

            ColumnType::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| CodecError::InvalidFloat {
                    input: text.to_string(),
                }),

            ColumnType::Decimal => text
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| CodecError::InvalidDecimal {
                    input: text.to_string(),
                }),

            ColumnType::ShortText | ColumnType::LongText => Ok(Value::Text(text.to_string())),

            ColumnType::Boolean => parse_bool(text).map(Value::Bool),

            ColumnType::Date => {
                Date::parse(text)
                    .map(Value::Date)
                    .ok_or_else(|| CodecError::InvalidDate {
                        input: text.to_string(),
                    })
            }

            ColumnType::DateTime | ColumnType::Timestamp => DateTime::parse(text)
                .map(Value::DateTime)
                .ok_or_else(|| CodecError::InvalidDateTime {
                    input: text.to_string(),
                }),

            ColumnType::TimeOfDay => DateTime::parse(text)
                .map(|dt| TimeOfDay::from_datetime(dt, self.offset))
                .or_else(|| TimeOfDay::parse_clock(text))
                .map(Value::Time)
                .ok_or_else(|| CodecError::InvalidTime {
                    input: text.to_string(),
                }),

            ColumnType::Binary => binary::from_text(text).map(Value::Blob),
        }
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::UTC
    }
}

fn parse_bool(text: &str) -> Result<bool, CodecError> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(CodecError::InvalidBoolean {
            input: text.to_string(),
        }),
    }
}
