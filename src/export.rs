use anyhow::{Context, Result};
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// Convert a BSON document to JSON, stringifying non-native types
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect(),
    )
}

/// Convert a BSON value to JSON. Native scalars, arrays and nested documents
/// pass through; everything else (ObjectId, dates, Decimal128, ...) becomes
/// its string form.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(i) => Value::from(i),
        Bson::Int64(i) => Value::from(i),
        Bson::Double(d) => serde_json::Number::from_f64(d)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(d.to_string())),
        Bson::String(s) => Value::String(s),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        Bson::Document(document) => document_to_json(document),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.to_string()),
        ),
        other => Value::String(other.to_string()),
    }
}

/// Write values as a JSON array pretty-printed with 4-space indentation
pub fn write_pretty_json<W: Write>(writer: W, values: &[Value]) -> Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    values
        .serialize(&mut serializer)
        .context("Failed to serialize export")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};

    #[test]
    fn test_object_id_stringified() {
        let oid = ObjectId::new();
        let value = bson_to_json(Bson::ObjectId(oid));
        assert_eq!(value, Value::String(oid.to_hex()));
    }

    #[test]
    fn test_datetime_stringified() {
        let dt = DateTime::from_millis(1_700_000_000_000);
        let value = bson_to_json(Bson::DateTime(dt));
        match value {
            Value::String(s) => assert!(s.starts_with("2023-11-14T")),
            other => panic!("expected string, got {:?}", other),
        }
    }

    #[test]
    fn test_native_scalars_pass_through() {
        assert_eq!(bson_to_json(Bson::Null), Value::Null);
        assert_eq!(bson_to_json(Bson::Boolean(true)), Value::Bool(true));
        assert_eq!(bson_to_json(Bson::Int32(42)), Value::from(42));
        assert_eq!(bson_to_json(Bson::Int64(1_000_000)), Value::from(1_000_000));
        assert_eq!(
            bson_to_json(Bson::String("PM-KISAN".to_string())),
            Value::String("PM-KISAN".to_string())
        );
    }

    #[test]
    fn test_nested_document_converted() {
        let oid = ObjectId::new();
        let document = doc! {
            "_id": oid,
            "scheme_name": "PM-KISAN",
            "tags": ["income support", "dbt"],
            "meta": { "level": "Central", "rank": 1i32 },
        };

        let value = document_to_json(document);
        assert_eq!(value["_id"], Value::String(oid.to_hex()));
        assert_eq!(value["scheme_name"], "PM-KISAN");
        assert_eq!(value["tags"][1], "dbt");
        assert_eq!(value["meta"]["level"], "Central");
        assert_eq!(value["meta"]["rank"], 1);
    }

    #[test]
    fn test_write_pretty_json_four_space_indent() {
        let values = vec![document_to_json(doc! { "scheme_name": "KCC" })];

        let mut out = Vec::new();
        write_pretty_json(&mut out, &values).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\n    {"));
        assert!(text.contains("\n        \"scheme_name\": \"KCC\""));

        let parsed: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_entry_count_preserved() {
        let documents = vec![
            doc! { "scheme_name": "A" },
            doc! { "scheme_name": "B" },
            doc! { "scheme_name": "C" },
        ];
        let values: Vec<Value> = documents.into_iter().map(document_to_json).collect();

        let mut out = Vec::new();
        write_pretty_json(&mut out, &values).unwrap();

        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
