//! Wire formatters.
//!
//! Three encodings share the typed value codec:
//! - raw `(name, text)` pairs,
//! - a percent-encoded query string,
//! - a flat JSON object.
//!
//! Every encoder walks the columns in name order, so output is
//! deterministic regardless of declaration order. Decoders start from the
//! schema's defaults and tolerate structurally broken documents; a
//! well-formed value of the wrong type still fails loudly in the codec.

mod json;
mod query;


use crate::{error::InternalError, model::Schema, record::Record};
use derive_more::{Deref, IntoIterator};
use std::sync::Arc;

///
/// SerializedAttributes
///
/// Name-sorted `(column, text)` pairs; `None` marks a null column.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct SerializedAttributes(#[into_iterator(owned, ref)] Vec<(String, Option<String>)>);

impl SerializedAttributes {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.0
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, text)| text.as_deref())
    }
}

impl Record {
    /// Every column, nulls included, as canonical text.
    pub fn to_serialized_attributes(&self) -> Result<SerializedAttributes, InternalError> {
        let codec = self.schema.codec();

        let pairs = self
            .schema
            .sorted_columns()
            .map(|(pos, column)| {
                let text = codec.serialize(&self.values[pos], column.kind())?;
                Ok::<_, InternalError>((column.name().to_string(), text))
            })
            .collect::<Result<Vec<_>, InternalError>>()?;

        Ok(SerializedAttributes(pairs))
    }

    /// Decode one wire entry into its column; unknown names are skipped.
    pub(crate) fn decode_entry(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<(), InternalError> {
        let Some(pos) = self.schema.position(name) else {
            self.skip_unknown(name);
            return Ok(());
        };

        let kind = self.schema.columns()[pos].kind();
        let value = self.schema.codec().deserialize(text, kind)?;
        self.put(pos, value);

        Ok(())
    }
}

impl Schema {
    /// Build a record from any finite pair sequence.
    ///
    /// Absent columns keep their defaults; an explicit `None` binds null.
    pub fn from_serialized_attributes<I, K, S>(
        self: &Arc<Self>,
        pairs: I,
    ) -> Result<Record, InternalError>
    where
        I: IntoIterator<Item = (K, Option<S>)>,
        K: AsRef<str>,
        S: AsRef<str>,
    {
        let mut record = Record::new(self);
        for (name, text) in pairs {
            record.decode_entry(name.as_ref(), text.as_ref().map(AsRef::as_ref))?;
        }

        Ok(record)
    }
}
