//! Cloud Firestore REST client for the roster collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::client::{self, ApiError, TokenSource};
use crate::config::FirebaseConfig;
use crate::roster::{COLLECTION, Mahasiswa, NewMahasiswa, RosterService};

#[derive(Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: BTreeMap<String, Value>,
}

/// One element of a `runQuery` response stream. Empty results come back
/// as a single element with no document.
#[derive(Deserialize)]
struct QueryItem {
    #[serde(default)]
    document: Option<Document>,
}

/// Plain string out of a typed Firestore value. Non-string scalars are
/// rendered as text; anything else is treated as absent.
fn field_text(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    if let Some(s) = obj.get("integerValue").and_then(Value::as_str) {
        return Some(s.to_string());
    }
    if let Some(n) = obj.get("doubleValue") {
        return Some(n.to_string());
    }
    obj.get("booleanValue").and_then(Value::as_bool).map(|b| b.to_string())
}

fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn decode_document(doc: Document) -> Mahasiswa {
    let text = |key: &str| doc.fields.get(key).and_then(field_text).unwrap_or_default();
    Mahasiswa {
        id: document_id(&doc.name).to_string(),
        nim: text("nim"),
        nama: text("nama"),
        jurusan: text("jurusan"),
        email: text("email"),
    }
}

fn encode_fields(record: &NewMahasiswa) -> Value {
    json!({
        "fields": {
            "nim": { "stringValue": record.nim },
            "nama": { "stringValue": record.nama },
            "jurusan": { "stringValue": record.jurusan },
            "email": { "stringValue": record.email },
        }
    })
}

fn ordered_query() -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": COLLECTION }],
            "orderBy": [{
                "field": { "fieldPath": "nama" },
                "direction": "ASCENDING",
            }],
        }
    })
}

/// Roster backed by a Firestore database.
pub struct FirestoreRoster {
    http: reqwest::Client,
    /// `{firestore_url}/v1/projects/{project}/databases/(default)/documents`
    documents: String,
    tokens: Arc<dyn TokenSource>,
}

impl FirestoreRoster {
    pub fn new(config: &FirebaseConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            documents: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                config.firestore_url.trim_end_matches('/'),
                config.project_id
            ),
            tokens,
        }
    }
}

#[async_trait::async_trait]
impl RosterService for FirestoreRoster {
    async fn list_ordered_by_name(&self) -> Result<Vec<Mahasiswa>, ApiError> {
        let url = format!("{}:runQuery", self.documents);
        let req = client::authed(self.tokens.as_ref(), self.http.post(url)).await?;
        let resp = req.json(&ordered_query()).send().await?;
        let items: Vec<QueryItem> = client::parse(resp).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| item.document)
            .map(decode_document)
            .collect())
    }

    async fn insert(&self, record: &NewMahasiswa) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.documents, COLLECTION);
        let req = client::authed(self.tokens.as_ref(), self.http.post(url)).await?;
        let resp = req.json(&encode_fields(record)).send().await?;
        let doc: Document = client::parse(resp).await?;
        Ok(document_id(&doc.name).to_string())
    }
}
