use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored document: store-assigned id plus every stored field, passed
/// through verbatim. Both the users and bookings collections are schemaless
/// from this system's perspective, so no field is renamed or dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}
