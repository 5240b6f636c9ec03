use serde::Deserialize;
use serde_json::{Map, Value};

/// Create-booking payload. Required fields are kept as raw JSON values so the
/// presence check matches JS truthiness: null, `false`, `0`, and `""` all
/// fail it, exactly like a missing field.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub date: Option<Value>,
    pub time: Option<Value>,
    #[serde(default)]
    pub recurring: Option<Value>,
    #[serde(rename = "clientName")]
    pub client_name: Option<Value>,
    pub phone: Option<Value>,
    #[serde(rename = "callType")]
    pub call_type: Option<Value>,
}

impl NewBooking {
    /// date, time, clientName, phone, and callType must all be truthy;
    /// recurring is optional and never inspected.
    pub fn has_required_fields(&self) -> bool {
        [
            &self.date,
            &self.time,
            &self.client_name,
            &self.phone,
            &self.call_type,
        ]
        .into_iter()
        .all(|field| field.as_ref().is_some_and(truthy))
    }

    /// The field map stored for this booking. `recurring` is stored verbatim
    /// when present and omitted when absent.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("date".into(), self.date.unwrap_or(Value::Null));
        fields.insert("time".into(), self.time.unwrap_or(Value::Null));
        if let Some(recurring) = self.recurring {
            fields.insert("recurring".into(), recurring);
        }
        fields.insert("clientName".into(), self.client_name.unwrap_or(Value::Null));
        fields.insert("phone".into(), self.phone.unwrap_or(Value::Null));
        fields.insert("callType".into(), self.call_type.unwrap_or(Value::Null));
        fields
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn booking(body: Value) -> NewBooking {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn complete_payload_passes() {
        let b = booking(json!({
            "date": "2024-01-01",
            "time": "10:00",
            "recurring": false,
            "clientName": "Jane Doe",
            "phone": "555-1234",
            "callType": "intro",
        }));
        assert!(b.has_required_fields());
    }

    #[test]
    fn recurring_is_optional() {
        let b = booking(json!({
            "date": "2024-01-01",
            "time": "10:00",
            "clientName": "Jane Doe",
            "phone": "555-1234",
            "callType": "intro",
        }));
        assert!(b.has_required_fields());
        assert!(!b.into_fields().contains_key("recurring"));
    }

    #[test]
    fn missing_required_field_fails() {
        let b = booking(json!({ "date": "2024-01-01" }));
        assert!(!b.has_required_fields());
    }

    #[test]
    fn falsy_values_fail_the_presence_check() {
        for falsy in [json!(""), json!(0), json!(false), json!(null)] {
            let b = booking(json!({
                "date": "2024-01-01",
                "time": "10:00",
                "clientName": falsy.clone(),
                "phone": "555-1234",
                "callType": "intro",
            }));
            assert!(!b.has_required_fields(), "expected {falsy} to fail");
        }
    }

    #[test]
    fn stored_fields_keep_submitted_values() {
        let b = booking(json!({
            "date": "2024-01-01",
            "time": "10:00",
            "recurring": true,
            "clientName": "Jane Doe",
            "phone": "555-1234",
            "callType": "intro",
        }));
        let fields = b.into_fields();
        assert_eq!(fields["date"], json!("2024-01-01"));
        assert_eq!(fields["recurring"], json!(true));
        assert_eq!(fields["clientName"], json!("Jane Doe"));
        assert_eq!(fields.len(), 6);
    }
}
