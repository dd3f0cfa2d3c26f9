
use crate::{
    error::{ErrorOrigin, InternalError},
    model::{Column, Schema},
    obs::sink::{self, MetricsEvent},
    persist::{RecordState, Strategy},
    value::Value,
};
use std::{fmt, sync::Arc};

///
/// Record
///
/// One in-memory instance of a schema: a value slot per declared column,
/// plus its optional save and destroy strategies.
///
/// Every value stored here has already been coerced to its column type.
///

#[derive(Clone)]
pub struct Record {
    pub(crate) schema: Arc<Schema>,
    pub(crate) values: Vec<Value>,
    pub(crate) save_strategy: Option<Strategy>,
    pub(crate) destroy_strategy: Option<Strategy>,
    pub(crate) state: RecordState,
}

impl Record {
    /// A record holding every column's default.
    #[must_use]
    pub fn new(schema: &Arc<Schema>) -> Self {
        Self {
            schema: Arc::clone(schema),
            values: schema.columns().iter().map(|c| c.default().clone()).collect(),
            save_strategy: None,
            destroy_strategy: None,
            state: RecordState::Unsaved,
        }
    }

    /// Defaults first, then each pair coerced into its column.
    /// Unknown names are ignored.
    pub fn from_values<I, K, V>(schema: &Arc<Schema>, values: I) -> Result<Self, InternalError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        for (name, value) in values {
            record.set(name.as_ref(), value)?;
        }

        Ok(record)
    }

    #[must_use]
    pub const fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    #[must_use]
    pub const fn state(&self) -> RecordState {
        self.state
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.position(name).map(|pos| &self.values[pos])
    }

    /// Coerce `value` to the column's type and store it.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), InternalError> {
        let Some(pos) = self.schema.position(name) else {
            self.skip_unknown(name);
            return Ok(());
        };

        let kind = self.schema.columns()[pos].kind();
        self.values[pos] = self
            .schema
            .codec()
            .coerce(value.into(), kind)
            .map_err(|err| InternalError::from(err).with_origin(ErrorOrigin::Record))?;

        Ok(())
    }

    /// Columns paired with their values, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = (&Column, &Value)> {
        self.schema.columns().iter().zip(&self.values)
    }

    /// Store an already-decoded value at a known position.
    pub(crate) fn put(&mut self, pos: usize, value: Value) {
        self.values[pos] = value;
    }

    pub(crate) fn skip_unknown(&self, name: &str) {
        tracing::debug!(schema = %self.schema.name(), column = name, "unknown column skipped");
        sink::record(MetricsEvent::ColumnSkipped {
            schema: self.schema.name(),
        });
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (column, value) in self.values() {
            map.entry(&column.name(), value);
        }

        map.finish()
    }
}
