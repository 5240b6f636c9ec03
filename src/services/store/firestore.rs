use std::sync::{Arc, OnceLock};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use super::{value, DocumentStore};
use crate::config::ServiceAccount;
use crate::models::Document;

const FIRESTORE_BASE: &str = "https://firestore.googleapis.com/v1";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;
const LIST_PAGE_SIZE: u32 = 300;

static HANDLE: OnceLock<Arc<Firestore>> = OnceLock::new();

#[derive(Serialize)]
struct TokenClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Document store backed by the Firestore REST API. Authenticates with a
/// service-account JWT exchanged for a bearer token, which is cached for its
/// lifetime minus a refresh margin.
pub struct Firestore {
    documents_url: String,
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    http: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl Firestore {
    /// Process-wide store handle. The first call builds the client from the
    /// resolved credentials; repeated initialization attempts return the
    /// existing handle.
    pub fn connect(account: &ServiceAccount) -> anyhow::Result<Arc<Self>> {
        if let Some(handle) = HANDLE.get() {
            return Ok(Arc::clone(handle));
        }

        let store = Arc::new(Self::new(account)?);
        Ok(Arc::clone(HANDLE.get_or_init(|| store)))
    }

    fn new(account: &ServiceAccount) -> anyhow::Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .context("service-account private key is not valid RSA PEM")?;

        let token_uri = if account.token_uri.is_empty() {
            DEFAULT_TOKEN_URI.to_string()
        } else {
            account.token_uri.clone()
        };

        Ok(Self {
            documents_url: format!(
                "{FIRESTORE_BASE}/projects/{}/databases/(default)/documents",
                account.project_id
            ),
            client_email: account.client_email.clone(),
            token_uri,
            signing_key,
            http: reqwest::Client::new(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> anyhow::Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        let now = Utc::now();
        let claims = TokenClaims {
            iss: self.client_email.clone(),
            scope: TOKEN_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
        };
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .context("failed to sign token request")?;

        let resp = self
            .http
            .post(&self.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .context("failed to reach token endpoint")?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .context("failed to parse token response")?;

        if !status.is_success() {
            anyhow::bail!("token endpoint error ({status}): {data}");
        }

        let token: TokenResponse =
            serde_json::from_value(data).context("unexpected token response shape")?;

        let ttl = (token.expires_in - TOKEN_REFRESH_MARGIN_SECS).max(0);
        let access = token.access_token.clone();
        *cached = Some(CachedToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(ttl),
        });

        Ok(access)
    }
}

#[async_trait]
impl DocumentStore for Firestore {
    async fn list(&self, collection: &str) -> anyhow::Result<Vec<Document>> {
        let token = self.access_token().await?;
        let url = format!("{}/{collection}", self.documents_url);

        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        // The REST surface pages its listings; the whole collection is
        // fetched here so callers see it unpaginated.
        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&[("pageSize", LIST_PAGE_SIZE.to_string())]);
            if let Some(ref next) = page_token {
                request = request.query(&[("pageToken", next.as_str())]);
            }

            let resp = request.send().await.context("failed to list documents")?;
            let status = resp.status();
            let data: Value = resp.json().await.context("failed to parse list response")?;

            if !status.is_success() {
                anyhow::bail!("store list error ({status}): {data}");
            }

            if let Some(items) = data.get("documents").and_then(Value::as_array) {
                for item in items {
                    documents.push(parse_document(item)?);
                }
            }

            match data.get("nextPageToken").and_then(Value::as_str) {
                Some(next) if !next.is_empty() => page_token = Some(next.to_string()),
                _ => break,
            }
        }

        Ok(documents)
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> anyhow::Result<String> {
        let token = self.access_token().await?;
        let url = format!("{}/{collection}", self.documents_url);
        let body = serde_json::json!({ "fields": value::encode_fields(&fields) });

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .context("failed to create document")?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .context("failed to parse create response")?;

        if !status.is_success() {
            anyhow::bail!("store create error ({status}): {data}");
        }

        data.get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.rsplit('/').next())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("create response carries no document name"))
    }

    async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<()> {
        let token = self.access_token().await?;
        let url = format!("{}/{collection}/{id}", self.documents_url);

        // Deletes succeed whether or not the document exists.
        self.http
            .delete(&url)
            .bearer_auth(&token)
            .send()
            .await
            .context("failed to delete document")?
            .error_for_status()
            .context("store delete error")?;

        Ok(())
    }
}

fn parse_document(item: &Value) -> anyhow::Result<Document> {
    let id = item
        .get("name")
        .and_then(Value::as_str)
        .and_then(|name| name.rsplit('/').next())
        .ok_or_else(|| anyhow::anyhow!("document carries no name"))?
        .to_string();

    let fields = item
        .get("fields")
        .and_then(Value::as_object)
        .map(value::decode_fields)
        .unwrap_or_default();

    Ok(Document { id, fields })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn document_id_is_the_last_name_segment() {
        let doc = parse_document(&json!({
            "name": "projects/p/databases/(default)/documents/bookings/abc123",
            "fields": {
                "date": { "stringValue": "2024-01-01" },
                "recurring": { "booleanValue": false },
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(doc.id, "abc123");
        assert_eq!(doc.fields["date"], json!("2024-01-01"));
        assert_eq!(doc.fields["recurring"], json!(false));
    }

    #[test]
    fn document_without_fields_is_empty() {
        let doc = parse_document(&json!({
            "name": "projects/p/databases/(default)/documents/users/u1",
        }))
        .unwrap();

        assert_eq!(doc.id, "u1");
        assert!(doc.fields.is_empty());
    }

    #[test]
    fn document_without_name_is_an_error() {
        assert!(parse_document(&json!({ "fields": {} })).is_err());
    }
}
