use crate::{
    error::InternalError,
    model::Schema,
    obs::sink::{self, MetricsEvent, WireFormat},
    record::Record,
};
use std::{borrow::Cow, sync::Arc};

impl Record {
    /// `name=value` entries joined by `&`, sorted by encoded name.
    /// Null columns are omitted.
    pub fn to_ordered_query_string(&self) -> Result<String, InternalError> {
        let mut entries = Vec::with_capacity(self.schema.len());
        for (name, text) in self.to_serialized_attributes()? {
            if let Some(text) = text {
                entries.push((
                    urlencoding::encode(&name).into_owned(),
                    urlencoding::encode(&text).into_owned(),
                ));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let query = entries
            .iter()
            .map(|(name, text)| format!("{name}={text}"))
            .collect::<Vec<_>>()
            .join("&");

        Ok(query)
    }

    /// Alias for [`to_ordered_query_string`](Self::to_ordered_query_string).
    pub fn serialize(&self) -> Result<String, InternalError> {
        self.to_ordered_query_string()
    }
}

impl Schema {
    /// Decode a query string. `None` or blank input yields defaults only.
    ///
    /// Entries without `=`, or whose escapes do not decode to UTF-8, are
    /// dropped.
    pub fn from_query_string(
        self: &Arc<Self>,
        query: Option<&str>,
    ) -> Result<Record, InternalError> {
        let mut record = Record::new(self);
        let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
            return Ok(record);
        };

        for entry in query.split('&').filter(|entry| !entry.is_empty()) {
            let Some((name, text)) = decode_pair(entry) else {
                tracing::debug!(schema = %self.name(), entry, "malformed query entry dropped");
                sink::record(MetricsEvent::EntryDropped {
                    schema: self.name(),
                    format: WireFormat::QueryString,
                });
                continue;
            };

            record.decode_entry(&name, Some(&text))?;
        }

        Ok(record)
    }

    /// Alias for [`from_query_string`](Self::from_query_string).
    pub fn deserialize(self: &Arc<Self>, query: Option<&str>) -> Result<Record, InternalError> {
        self.from_query_string(query)
    }
}

fn decode_pair(entry: &str) -> Option<(String, String)> {
    let (name, text) = entry.split_once('=')?;

    Some((decode_component(name)?, decode_component(text)?))
}

fn decode_component(raw: &str) -> Option<String> {
    let raw: Cow<'_, str> = if raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    urlencoding::decode(&raw).ok().map(Cow::into_owned)
}
