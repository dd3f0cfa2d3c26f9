
use crate::types::{Date, DateTime, Decimal, TimeOfDay};

///
/// Value
///
/// Typed attribute value held by a record.
///
/// Null → the attribute is unset (SQL NULL).
///

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Date(Date),
    DateTime(DateTime),
    Decimal(Decimal),
    Float(f64),
    Int(i64),
    #[default]
    Null,
    Text(String),
    Time(TimeOfDay),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Stable human-readable variant label for diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Blob(_) => "Blob",
            Self::Bool(_) => "Bool",
            Self::Date(_) => "Date",
            Self::DateTime(_) => "DateTime",
            Self::Decimal(_) => "Decimal",
            Self::Float(_) => "Float",
            Self::Int(_) => "Int",
            Self::Null => "Null",
            Self::Text(_) => "Text",
            Self::Time(_) => "Time",
        }
    }

    ///
    /// ACCESSORS
    ///

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_date(&self) -> Option<Date> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_datetime(&self) -> Option<DateTime> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_time(&self) -> Option<TimeOfDay> {
        match self {
            Self::Time(t) => Some(*t),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_for_value! {
    bool => Bool,
    Date => Date,
    DateTime => DateTime,
    Decimal => Decimal,
    f32 => Float,
    f64 => Float,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Int,
    u16 => Int,
    u32 => Int,
    String => Text,
    TimeOfDay => Time,
    Vec<u8> => Blob,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Self::Blob(b.to_vec())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
