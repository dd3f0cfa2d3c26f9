use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::Schema,
    obs::sink::{self, MetricsEvent, WireFormat},
    record::Record,
};
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

impl Record {
    /// A flat JSON object with sorted keys; values are strings or `null`.
    pub fn to_ordered_json(&self) -> Result<String, InternalError> {
        let object: Map<String, JsonValue> = self
            .to_serialized_attributes()?
            .into_iter()
            .map(|(name, text)| (name, text.map_or(JsonValue::Null, JsonValue::String)))
            .collect();

        serde_json::to_string(&object).map_err(|err| {
            InternalError::new(ErrorClass::Internal, ErrorOrigin::Format, err.to_string())
        })
    }
}

impl Schema {
    /// Decode a JSON object.
    ///
    /// `None`, blank input, a parse failure or a non-object document all
    /// yield defaults only. Numbers and booleans are read as their text;
    /// nested arrays and objects are dropped.
    pub fn from_json(self: &Arc<Self>, json: Option<&str>) -> Result<Record, InternalError> {
        let mut record = Record::new(self);
        let Some(json) = json.map(str::trim).filter(|j| !j.is_empty()) else {
            return Ok(record);
        };

        let object = match serde_json::from_str::<JsonValue>(json) {
            Ok(JsonValue::Object(object)) => object,
            Ok(other) => {
                tracing::warn!(
                    schema = %self.name(),
                    kind = json_kind(&other),
                    "json document is not an object"
                );
                self.decode_fallback();
                return Ok(record);
            }
            Err(err) => {
                tracing::warn!(
                    schema = %self.name(),
                    error = %err,
                    "json document failed to parse"
                );
                self.decode_fallback();
                return Ok(record);
            }
        };

        for (name, value) in object {
            let text = match value {
                JsonValue::Null => None,
                JsonValue::String(s) => Some(s),
                JsonValue::Bool(b) => Some(b.to_string()),
                JsonValue::Number(n) => Some(n.to_string()),
                other @ (JsonValue::Array(_) | JsonValue::Object(_)) => {
                    tracing::debug!(
                        schema = %self.name(),
                        column = %name,
                        kind = json_kind(&other),
                        "nested json entry dropped"
                    );
                    sink::record(MetricsEvent::EntryDropped {
                        schema: self.name(),
                        format: WireFormat::Json,
                    });
                    continue;
                }
            };

            record.decode_entry(&name, text.as_deref())?;
        }

        Ok(record)
    }

    fn decode_fallback(&self) {
        sink::record(MetricsEvent::DecodeFallback {
            schema: self.name(),
            format: WireFormat::Json,
        });
    }
}

const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
