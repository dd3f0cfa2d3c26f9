use crate::value::Value;
use std::{fmt, str::FromStr};

///
/// ColumnType
///
/// Logical value kind of a column. Every codec branch is selected from this.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnType {
    Binary,
    Boolean,
    Date,
    DateTime,
    Decimal,
    Float,
    Integer,
    LongText,
    ShortText,
    TimeOfDay,
    Timestamp,
}

impl ColumnType {
    pub const ALL: [Self; 11] = [
        Self::Integer,
        Self::ShortText,
        Self::LongText,
        Self::Float,
        Self::Decimal,
        Self::DateTime,
        Self::Timestamp,
        Self::TimeOfDay,
        Self::Date,
        Self::Binary,
        Self::Boolean,
    ];

    /// Declaration label, as written in a migration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::LongText => "text",
            Self::ShortText => "string",
            Self::TimeOfDay => "time",
            Self::Timestamp => "timestamp",
        }
    }

    /// The column type a bare value would be declared with.
    #[must_use]
    pub const fn natural(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(_) => Some(Self::Binary),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Date(_) => Some(Self::Date),
            Value::DateTime(_) => Some(Self::DateTime),
            Value::Decimal(_) => Some(Self::Decimal),
            Value::Float(_) => Some(Self::Float),
            Value::Int(_) => Some(Self::Integer),
            Value::Null => None,
            Value::Text(_) => Some(Self::ShortText),
            Value::Time(_) => Some(Self::TimeOfDay),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown column type: '{s}'"))
    }
}

///
/// ColumnOptions
///
/// Declaration options, mirroring `add_column` in a migration.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ColumnOptions {
    pub limit: Option<u32>,
    pub null: bool,
    pub default: Value,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

impl ColumnOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn null(mut self, null: bool) -> Self {
        self.null = null;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    #[must_use]
    pub const fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    #[must_use]
    pub const fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl Default for ColumnOptions {
    fn default() -> Self {
        Self {
            limit: None,
            null: true,
            default: Value::Null,
            precision: None,
            scale: None,
        }
    }
}

///
/// Column
///
/// Immutable descriptor of one declared attribute.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnType,
    nullable: bool,
    default: Value,
    limit: Option<u32>,
    precision: Option<u32>,
    scale: Option<u32>,
}

impl Column {
    /// `default` must already be coerced to `kind`.
    pub(crate) fn new(name: String, kind: ColumnType, options: ColumnOptions) -> Self {
        Self {
            name,
            kind,
            nullable: options.null,
            default: options.default,
            limit: options.limit,
            precision: options.precision,
            scale: options.scale,
        }
    }

    pub(crate) fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ColumnType {
        self.kind
    }

    #[must_use]
    pub const fn nullable(&self) -> bool {
        self.nullable
    }

    /// Declared default; `Value::Null` when none was given.
    #[must_use]
    pub const fn default(&self) -> &Value {
        &self.default
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub const fn precision(&self) -> Option<u32> {
        self.precision
    }

    #[must_use]
    pub const fn scale(&self) -> Option<u32> {
        self.scale
    }

    /// Declared type rendered with its size options, e.g. `string(100)` or
    /// `decimal(5,2)`.
    #[must_use]
    pub fn sql_type(&self) -> String {
        let label = self.kind.as_str();

        match (self.kind, self.limit, self.precision, self.scale) {
            (ColumnType::Decimal, _, Some(p), Some(s)) => format!("{label}({p},{s})"),
            (ColumnType::Decimal, _, Some(p), None) => format!("{label}({p})"),
            (ColumnType::Decimal, ..) => label.to_string(),
            (_, Some(limit), ..) => format!("{label}({limit})"),
            _ => label.to_string(),
        }
    }
}
