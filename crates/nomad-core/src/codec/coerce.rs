use crate::{
    codec::{Codec, CodecError},
    model::ColumnType,
    types::{DateTime, Decimal, TimeOfDay},
    value::Value,
};

// i64 bounds as f64: MIN is exact, MAX rounds up to 2^63.
#[expect(clippy::cast_precision_loss)]
const I64_MIN_F64: f64 = i64::MIN as f64;
#[expect(clippy::cast_precision_loss)]
const I64_MAX_F64: f64 = i64::MAX as f64;

impl Codec {
    /// Coerce `value` so it can be held by a `kind` column.
    ///
    /// This is the single casting rule used by record construction, setters,
    /// declared defaults and every deserializer. Text is parsed with
    /// [`deserialize`](Self::deserialize), so it is as strict as the wire.
    pub fn coerce(&self, value: Value, kind: ColumnType) -> Result<Value, CodecError> {
        let mismatch = |found: &Value| CodecError::TypeMismatch {
            kind,
            found: found.label(),
        };
        let out_of_range = |found: &Value| CodecError::OutOfRange {
            kind,
            found: found.label(),
        };

        match (kind, value) {
            (_, Value::Null) => Ok(Value::Null),

            // text columns
            (ColumnType::ShortText | ColumnType::LongText, v @ Value::Text(_)) => Ok(v),
            (ColumnType::ShortText | ColumnType::LongText, Value::Blob(bytes)) => {
                String::from_utf8(bytes)
                    .map(Value::Text)
                    .map_err(|err| mismatch(&Value::Blob(err.into_bytes())))
            }
            (ColumnType::ShortText | ColumnType::LongText, other) => {
                let natural = ColumnType::natural(&other).ok_or_else(|| mismatch(&other))?;
                self.serialize(&other, natural)
                    .map(|text| text.map_or(Value::Null, Value::Text))
            }

            // binary
            (ColumnType::Binary, v @ Value::Blob(_)) => Ok(v),
            (ColumnType::Binary, Value::Text(s)) => Ok(Value::Blob(s.into_bytes())),

            // everything else parses text the way the wire does
            (kind, Value::Text(s)) => self.deserialize(Some(&s), kind),

            // integer
            (ColumnType::Integer, v @ Value::Int(_)) => Ok(v),
            (ColumnType::Integer, v @ Value::Float(f)) => {
                float_to_int(f).map(Value::Int).ok_or_else(|| out_of_range(&v))
            }
            (ColumnType::Integer, v @ Value::Decimal(d)) => d
                .trunc_to_i64()
                .map(Value::Int)
                .ok_or_else(|| out_of_range(&v)),

            // float
            (ColumnType::Float, v @ Value::Float(_)) => Ok(v),
            (ColumnType::Float, Value::Int(i)) => Ok(Value::Float(int_to_float(i))),
            (ColumnType::Float, v @ Value::Decimal(d)) => {
                d.to_f64().map(Value::Float).ok_or_else(|| out_of_range(&v))
            }

            // decimal
            (ColumnType::Decimal, v @ Value::Decimal(_)) => Ok(v),
            (ColumnType::Decimal, Value::Int(i)) => Ok(Value::Decimal(Decimal::from(i))),
            (ColumnType::Decimal, v @ Value::Float(f)) => Decimal::from_f64(f)
                .map(Value::Decimal)
                .ok_or_else(|| out_of_range(&v)),

            // boolean
            (ColumnType::Boolean, v @ Value::Bool(_)) => Ok(v),
            (ColumnType::Boolean, Value::Int(0)) => Ok(Value::Bool(false)),
            (ColumnType::Boolean, Value::Int(1)) => Ok(Value::Bool(true)),

            // calendar
            (ColumnType::Date, v @ Value::Date(_)) => Ok(v),
            (ColumnType::Date, Value::DateTime(dt)) => {
                Ok(Value::Date(dt.to_offset(self.offset()).date()))
            }
            (ColumnType::DateTime | ColumnType::Timestamp, v @ Value::DateTime(_)) => Ok(v),
            (ColumnType::DateTime | ColumnType::Timestamp, Value::Date(d)) => {
                Ok(Value::DateTime(DateTime::midnight(d, self.offset())))
            }
            (ColumnType::TimeOfDay, v @ Value::Time(_)) => Ok(v),
            (ColumnType::TimeOfDay, Value::DateTime(dt)) => {
                Ok(Value::Time(TimeOfDay::from_datetime(dt, self.offset())))
            }

            (_, other) => Err(mismatch(&other)),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
const fn int_to_float(i: i64) -> f64 {
    i as f64
}

#[expect(clippy::cast_possible_truncation)]
fn float_to_int(f: f64) -> Option<i64> {
    let t = f.trunc();

    (t.is_finite() && (I64_MIN_F64..I64_MAX_F64).contains(&t)).then(|| t as i64)
}
