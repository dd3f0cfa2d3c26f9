use crate::{
    codec::Codec,
    config::CoreConfig,
    error::InternalError,
    model::{Column, ColumnOptions, ColumnType, SchemaError},
    persist::{DirectTransaction, Persist, TransactionHook},
};
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Schema
///
/// Frozen, ordered column registry for one record type.
///
/// Parent columns come first in parent order, followed by the type's own
/// declarations. Names are unique; a redeclared name keeps the position of
/// its first occurrence.
///

pub struct Schema {
    name: String,
    parent: Option<String>,
    columns: Vec<Column>,
    positions: BTreeMap<String, usize>,
    sorted: Vec<usize>,
    config: CoreConfig,
    codec: Codec,
    persist: Option<Arc<dyn Persist>>,
    transaction: Arc<dyn TransactionHook>,
}

impl Schema {
    /// Start a root record type with no inherited columns.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            parent: None,
            columns: Vec::new(),
            positions: BTreeMap::new(),
            config: CoreConfig::default(),
            persist: None,
            transaction: Arc::new(DirectTransaction),
        }
    }

    /// Start a subtype: a by-value copy of this schema's columns, config and
    /// hooks, ready for further declarations.
    #[must_use]
    pub fn extend(&self, name: impl Into<String>) -> SchemaBuilder {
        let mut builder = SchemaBuilder {
            name: name.into(),
            parent: Some(self.name.clone()),
            columns: self.columns.clone(),
            positions: BTreeMap::new(),
            config: self.config.clone(),
            persist: self.persist.clone(),
            transaction: Arc::clone(&self.transaction),
        };
        builder.reset_column_information();

        builder
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|pos| &self.columns[pos])
    }

    /// Declaration-order position of a column.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Columns in name order, paired with their declaration position.
    pub fn sorted_columns(&self) -> impl Iterator<Item = (usize, &Column)> {
        self.sorted.iter().map(|&pos| (pos, &self.columns[pos]))
    }

    pub fn sorted_column_names(&self) -> impl Iterator<Item = &str> {
        self.sorted_columns().map(|(_, column)| column.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    #[must_use]
    pub const fn codec(&self) -> &Codec {
        &self.codec
    }

    pub(crate) fn persist_hook(&self) -> Option<&dyn Persist> {
        self.persist.as_deref()
    }

    pub(crate) fn transaction_hook(&self) -> &dyn TransactionHook {
        self.transaction.as_ref()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("columns", &self.columns)
            .field("config", &self.config)
            .field("persist", &self.persist.is_some())
            .finish_non_exhaustive()
    }
}

///
/// SchemaBuilder
///
/// Mutable at definition time only; [`build`](Self::build) freezes it.
///

pub struct SchemaBuilder {
    name: String,
    parent: Option<String>,
    columns: Vec<Column>,
    positions: BTreeMap<String, usize>,
    config: CoreConfig,
    persist: Option<Arc<dyn Persist>>,
    transaction: Arc<dyn TransactionHook>,
}

impl SchemaBuilder {
    /// Declare a column with default options.
    #[must_use]
    pub fn attribute(self, name: impl Into<String>, kind: ColumnType) -> Self {
        self.attribute_with(name, kind, ColumnOptions::default())
    }

    /// Declare a column; works like `add_column` in a migration.
    #[must_use]
    pub fn attribute_with(
        mut self,
        name: impl Into<String>,
        kind: ColumnType,
        options: ColumnOptions,
    ) -> Self {
        self.declare_column(name, kind, options);
        self
    }

    /// Append a column, or replace an existing one of the same name in place.
    pub fn declare_column(
        &mut self,
        name: impl Into<String>,
        kind: ColumnType,
        options: ColumnOptions,
    ) -> &mut Self {
        let name = name.into();
        let position = self.positions.get(&name).copied();
        let column = Column::new(name, kind, options);

        match position {
            Some(pos) => self.columns[pos] = column,
            None => self.columns.push(column),
        }
        self.reset_column_information();

        self
    }

    /// Rebuild derived lookup metadata from the declared columns.
    /// Declared columns are never touched.
    pub fn reset_column_information(&mut self) {
        self.positions = self
            .columns
            .iter()
            .enumerate()
            .map(|(pos, column)| (column.name().to_string(), pos))
            .collect();
    }

    #[must_use]
    pub fn config(mut self, config: CoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Type-level persistence, used when a record has no save strategy.
    #[must_use]
    pub fn persist_with(mut self, persist: impl Persist + 'static) -> Self {
        self.persist = Some(Arc::new(persist));
        self
    }

    /// Replace the transaction wrapper around `save`.
    #[must_use]
    pub fn transaction_with(mut self, hook: impl TransactionHook + 'static) -> Self {
        self.transaction = Arc::new(hook);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Freeze the schema. Each declared default is coerced to its column
    /// type under the final config.
    pub fn build(self) -> Result<Arc<Schema>, InternalError> {
        let codec = Codec::new(self.config.zone)?;

        let columns = self
            .columns
            .into_iter()
            .map(|column| {
                let default = codec
                    .coerce(column.default().clone(), column.kind())
                    .map_err(|source| SchemaError::InvalidDefault {
                        schema: self.name.clone(),
                        column: column.name().to_string(),
                        source,
                    })?;

                Ok::<_, SchemaError>(column.with_default(default))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        let mut sorted: Vec<usize> = (0..columns.len()).collect();
        sorted.sort_by(|&a, &b| columns[a].name().cmp(columns[b].name()));

        tracing::debug!(
            schema = %self.name,
            columns = columns.len(),
            "schema built"
        );

        Ok(Arc::new(Schema {
            name: self.name,
            parent: self.parent,
            columns,
            positions: self.positions,
            sorted,
            config: self.config,
            codec,
            persist: self.persist,
            transaction: self.transaction,
        }))
    }
}
