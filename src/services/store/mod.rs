pub mod firestore;
mod value;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::Document;

pub const USERS_COLLECTION: &str = "users";
pub const BOOKINGS_COLLECTION: &str = "bookings";

/// Contract of the managed document store. Documents live in named
/// collections and carry a store-assigned id; the store is consumed as an
/// opaque collaborator and never reimplemented here.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection, in the store's iteration order.
    async fn list(&self, collection: &str) -> anyhow::Result<Vec<Document>>;

    /// Creates a document with a store-assigned id and returns that id.
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> anyhow::Result<String>;

    /// Deletes by id. The store performs no existence check, so deleting an
    /// unknown id succeeds.
    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()>;
}
