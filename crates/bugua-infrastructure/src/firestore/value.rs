//! Conversion between plain JSON and Firestore typed values.
//!
//! Firestore documents wrap every value in a single-key object naming its
//! type (`{"stringValue": "..."}`, `{"mapValue": {"fields": {...}}}`, ...).

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

/// Encodes one JSON value as a Firestore value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // int64 travels as a decimal string
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encodes a JSON object as a Firestore `fields` map.
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Decodes one Firestore value back to plain JSON.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" | "doubleValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => decode_fields(inner.get("fields").unwrap_or(&Value::Null)),
        _ => Value::Null,
    }
}

/// Decodes a Firestore `fields` map into a JSON object.
pub fn decode_fields(fields: &Value) -> Value {
    let map = fields
        .as_object()
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (k.clone(), decode_value(v)))
                .collect()
        })
        .unwrap_or_default();
    Value::Object(map)
}

/// Serializes `value` straight into a Firestore `fields` map.
pub fn to_fields<T: Serialize>(value: &T) -> serde_json::Result<Value> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(encode_fields(&map)),
        other => Ok(json!({ "value": encode_value(&other) })),
    }
}

/// Deserializes a Firestore `fields` map.
pub fn from_fields<T: DeserializeOwned>(fields: &Value) -> serde_json::Result<T> {
    serde_json::from_value(decode_fields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: i64,
        score: f64,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[test]
    fn test_encode_shapes() {
        let fields = to_fields(&Doc {
            name: "卦".into(),
            count: 3,
            score: -7.5,
            tags: vec!["牽制格".into()],
            note: None,
        })
        .unwrap();

        assert_eq!(fields["name"], json!({ "stringValue": "卦" }));
        assert_eq!(fields["count"], json!({ "integerValue": "3" }));
        assert_eq!(fields["score"], json!({ "doubleValue": -7.5 }));
        assert_eq!(
            fields["tags"],
            json!({ "arrayValue": { "values": [{ "stringValue": "牽制格" }] } })
        );
        assert_eq!(fields["note"], json!({ "nullValue": null }));
    }

    #[test]
    fn test_decode_server_document() {
        let fields = json!({
            "name": { "stringValue": "x" },
            "count": { "integerValue": "42" },
            "score": { "doubleValue": 1.5 },
            "tags": { "arrayValue": {} },
            "note": { "nullValue": null }
        });
        let doc: Doc = from_fields(&fields).unwrap();
        assert_eq!(doc.count, 42);
        assert!(doc.tags.is_empty());
        assert!(doc.note.is_none());
    }

    #[test]
    fn test_timestamp_decodes_as_string() {
        let decoded = decode_value(&json!({ "timestampValue": "2024-01-01T00:00:00Z" }));
        assert_eq!(decoded, json!("2024-01-01T00:00:00Z"));
    }
}
