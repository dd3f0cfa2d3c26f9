use nomad::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn person() -> Arc<Schema> {
    Schema::builder("Person")
        .attribute("first_name", ColumnType::ShortText)
        .attribute("last_name", ColumnType::ShortText)
        .attribute_with(
            "balance",
            ColumnType::Decimal,
            ColumnOptions::new().precision(10).scale(2),
        )
        .build()
        .unwrap()
}

fn all_types() -> Arc<Schema> {
    let mut builder = Schema::builder("AllTypes");
    for kind in ColumnType::ALL {
        builder.declare_column(format!("{kind}_attribute"), kind, ColumnOptions::new());
    }

    builder.build().unwrap()
}

#[test]
fn joe_blow_query_string() {
    let schema = person();
    let record =
        Record::from_values(&schema, [("first_name", "Joe"), ("last_name", "Blow")]).unwrap();

    assert_eq!(record.serialize().unwrap(), "first_name=Joe&last_name=Blow");

    let decoded = schema.deserialize(Some("first_name=Joe&last_name=Blow")).unwrap();
    assert_eq!(decoded.get("first_name"), Some(&Value::from("Joe")));
    assert_eq!(decoded.get("last_name"), Some(&Value::from("Blow")));
    assert_eq!(decoded.get("balance"), Some(&Value::Null));
}

#[test]
fn whitespace_query_yields_defaults() {
    let schema = Schema::builder("Greeter")
        .attribute_with(
            "greeting",
            ColumnType::ShortText,
            ColumnOptions::new().default_value("hi"),
        )
        .build()
        .unwrap();

    let record = schema.from_query_string(Some("   ")).unwrap();
    assert_eq!(record.get("greeting"), Some(&Value::from("hi")));
    assert_eq!(record, schema.from_query_string(None).unwrap());
}

#[test]
fn subtype_serializes_inherited_columns() {
    let parent = person();
    let child = parent
        .extend("Employee")
        .attribute("badge", ColumnType::Integer)
        .build()
        .unwrap();
    let record = Record::from_values(&child, [("first_name", "Ann"), ("badge", "7")]).unwrap();

    assert_eq!(
        record.to_ordered_json().unwrap(),
        r#"{"badge":"7","balance":null,"first_name":"Ann","last_name":null}"#
    );
}

#[test]
fn configured_zone_applies_to_every_date_time() {
    let config = CoreConfig::from_toml_str("[zone]\nfixed = 60\n").unwrap();
    let schema = Schema::builder("Event")
        .config(config)
        .attribute("at", ColumnType::DateTime)
        .attribute("clock", ColumnType::TimeOfDay)
        .build()
        .unwrap();

    let record = Record::from_values(
        &schema,
        [
            ("at", Value::DateTime(DateTime::UNIX_EPOCH)),
            ("clock", Value::Time(TimeOfDay::from_hms(8, 0, 0).unwrap())),
        ],
    )
    .unwrap();

    let pairs = record.to_serialized_attributes().unwrap();
    assert_eq!(pairs.get("at"), Some(Some("01 Jan 1970 01:00:00 +0100")));
    assert_eq!(pairs.get("clock"), Some(Some("01 Jan 2000 08:00:00 +0100")));
    assert_eq!(schema.from_serialized_attributes(pairs).unwrap(), record);
}

#[test]
fn missing_strategy_surfaces_as_public_error() {
    let mut record = Record::new(&person());

    let err: Error = record.save().unwrap_err().into();
    assert_eq!(err.kind, ErrorKind::MissingStrategy);
    assert_eq!(err.origin, nomad::ErrorOrigin::Persist);
}

#[test]
fn coercion_failure_surfaces_from_the_record() {
    let err: Error = Record::from_values(&person(), [("balance", "lots")])
        .unwrap_err()
        .into();
    assert_eq!(err.kind, ErrorKind::Codec);
    assert_eq!(err.origin, nomad::ErrorOrigin::Record);
}

#[test]
fn save_and_destroy_through_strategies() {
    let mut record = Record::from_values(&person(), [("first_name", "Joe")]).unwrap();
    record
        .to_save(|r| {
            assert_eq!(r.get("first_name"), Some(&Value::from("Joe")));
            Ok(())
        })
        .to_destroy(|_| Ok(()));

    assert_eq!(record.save().unwrap(), SaveStatus::Saved);
    assert_eq!(record.destroy().unwrap().state(), RecordState::Destroyed);
}

// ---- round-trip law ----------------------------------------------------

fn value_for(kind: ColumnType) -> BoxedStrategy<Value> {
    let value = match kind {
        ColumnType::Integer => any::<i64>().prop_map(Value::Int).boxed(),
        ColumnType::ShortText | ColumnType::LongText => {
            any::<String>().prop_map(Value::Text).boxed()
        }
        ColumnType::Float => (-1.0e12f64..1.0e12).prop_map(Value::Float).boxed(),
        ColumnType::Decimal => (any::<i64>(), 0u32..10)
            .prop_map(|(mantissa, scale)| Value::Decimal(Decimal::new(mantissa, scale)))
            .boxed(),
        ColumnType::DateTime | ColumnType::Timestamp => (-2_000_000_000i64..4_000_000_000)
            .prop_filter_map("in range", DateTime::from_unix_timestamp)
            .prop_map(Value::DateTime)
            .boxed(),
        ColumnType::TimeOfDay => (0u8..24, 0u8..60, 0u8..60)
            .prop_filter_map("valid clock", |(h, m, s)| TimeOfDay::from_hms(h, m, s))
            .prop_map(Value::Time)
            .boxed(),
        ColumnType::Date => (1900i32..2100, 1u8..=12, 1u8..=28)
            .prop_filter_map("valid date", |(y, m, d)| Date::new_checked(y, m, d))
            .prop_map(Value::Date)
            .boxed(),
        ColumnType::Binary => prop::collection::vec(any::<u8>(), 0..24)
            .prop_map(Value::Blob)
            .boxed(),
        ColumnType::Boolean => any::<bool>().prop_map(Value::Bool).boxed(),
    };

    prop::option::of(value)
        .prop_map(|value| value.unwrap_or(Value::Null))
        .boxed()
}

fn record_values() -> impl Strategy<Value = Vec<(String, Value)>> {
    ColumnType::ALL
        .into_iter()
        .map(|kind| value_for(kind).prop_map(move |value| (format!("{kind}_attribute"), value)))
        .collect::<Vec<_>>()
}

proptest! {
    #[test]
    fn every_formatter_round_trips_every_type(values in record_values()) {
        let schema = all_types();
        let record = Record::from_values(&schema, values).unwrap();

        let pairs = record.to_serialized_attributes().unwrap();
        prop_assert_eq!(&schema.from_serialized_attributes(pairs).unwrap(), &record);

        let query = record.to_ordered_query_string().unwrap();
        prop_assert_eq!(&schema.from_query_string(Some(&query)).unwrap(), &record);

        let json = record.to_ordered_json().unwrap();
        prop_assert_eq!(&schema.from_json(Some(&json)).unwrap(), &record);
    }
}
