//! Translation between plain JSON values and the store's typed value
//! encoding. On the wire every field value is a single-keyed object such as
//! `{"stringValue": "x"}`; integers are carried as decimal strings.

use serde_json::{json, Map, Value};

pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), encode(value)))
        .collect()
}

pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), decode(value)))
        .collect()
}

pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn decode(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };

    if obj.contains_key("nullValue") {
        return Value::Null;
    }
    if let Some(b) = obj.get("booleanValue") {
        return b.clone();
    }
    if let Some(i) = obj.get("integerValue") {
        // Decimal string on the wire; fall back to the raw value if it does
        // not parse.
        return match i.as_str().and_then(|s| s.parse::<i64>().ok()) {
            Some(n) => Value::from(n),
            None => i.clone(),
        };
    }
    if let Some(d) = obj.get("doubleValue") {
        return d.clone();
    }
    for key in ["stringValue", "timestampValue", "referenceValue", "bytesValue"] {
        if let Some(s) = obj.get(key) {
            return s.clone();
        }
    }
    if let Some(array) = obj.get("arrayValue") {
        let values = array
            .get("values")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(decode).collect())
            .unwrap_or_default();
        return Value::Array(values);
    }
    if let Some(map) = obj.get("mapValue") {
        let fields = map
            .get("fields")
            .and_then(Value::as_object)
            .map(decode_fields)
            .unwrap_or_default();
        return Value::Object(fields);
    }

    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_round_trip() {
        for value in [
            json!(null),
            json!(true),
            json!(false),
            json!(42),
            json!(-7),
            json!(2.5),
            json!("hello"),
            json!(""),
        ] {
            assert_eq!(decode(&encode(&value)), value, "round trip of {value}");
        }
    }

    #[test]
    fn integers_are_strings_on_the_wire() {
        assert_eq!(encode(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(decode(&json!({ "integerValue": "42" })), json!(42));
    }

    #[test]
    fn nested_structures_round_trip() {
        let value = json!({
            "slots": ["10:00", "11:00"],
            "meta": { "count": 2, "open": true },
        });
        assert_eq!(decode(&encode(&value)), value);
    }

    #[test]
    fn booking_fields_encode_to_wire_shape() {
        let mut fields = Map::new();
        fields.insert("date".into(), json!("2024-01-01"));
        fields.insert("recurring".into(), json!(false));

        let encoded = encode_fields(&fields);
        assert_eq!(encoded["date"], json!({ "stringValue": "2024-01-01" }));
        assert_eq!(encoded["recurring"], json!({ "booleanValue": false }));
    }

    #[test]
    fn timestamps_decode_to_strings() {
        assert_eq!(
            decode(&json!({ "timestampValue": "2024-01-01T10:00:00Z" })),
            json!("2024-01-01T10:00:00Z")
        );
    }

    #[test]
    fn unknown_wire_values_decode_to_null() {
        assert_eq!(decode(&json!({ "geoPointValue": {} })), Value::Null);
        assert_eq!(decode(&json!("bare")), Value::Null);
    }
}
