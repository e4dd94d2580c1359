//! Document database backend.
//!
//! Each record is one document at `<url>/<collection>/<id>`. Binary
//! attachments are stored inline in the record as data URIs.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::http::{check_status, decode_records};
use super::{Ack, RemoteAdapter, RemoteError};
use crate::record::{embed_data_uri, MaintenanceRecord};

pub struct DocumentAdapter {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    collection: String,
}

/// Listing responses come either bare or wrapped.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Bare(Vec<serde_json::Value>),
    Wrapped { documents: Vec<serde_json::Value> },
}

impl Listing {
    fn into_items(self) -> Vec<serde_json::Value> {
        match self {
            Listing::Bare(items) | Listing::Wrapped { documents: items } => items,
        }
    }
}

impl DocumentAdapter {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        collection: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            collection: collection.to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.collection)
    }

    fn document_url(&self, id: &str) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.collection_url())
            .map_err(|err| RemoteError::Transport(format!("Invalid collection URL: {}", err)))?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport("Collection URL cannot carry paths".to_string()))?
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn decode_listing(body: &str) -> Result<Vec<MaintenanceRecord>, RemoteError> {
        let listing: Listing = serde_json::from_str(body).map_err(|_| {
            RemoteError::Decode(
                "expected a JSON array or an object with a \"documents\" array".to_string(),
            )
        })?;
        Ok(decode_records("document", listing.into_items()))
    }
}

#[async_trait]
impl RemoteAdapter for DocumentAdapter {
    fn name(&self) -> &'static str {
        "document"
    }

    async fn put(&self, record: &MaintenanceRecord) -> Result<Ack, RemoteError> {
        let request = self.client.put(self.document_url(&record.id)?).json(record);
        check_status(self.authorize(request).send().await?).await?;
        debug!(id = %record.id, collection = %self.collection, "document written");
        Ok(Ack)
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceRecord>, RemoteError> {
        let request = self.client.get(self.collection_url());
        let response = check_status(self.authorize(request).send().await?).await?;
        let body = response.text().await?;
        Self::decode_listing(&body)
    }

    async fn remove(&self, id: &str) -> Result<Ack, RemoteError> {
        let request = self.client.delete(self.document_url(id)?);
        let response = self.authorize(request).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(id, "document already absent");
            return Ok(Ack);
        }
        check_status(response).await?;
        Ok(Ack)
    }

    async fn upload_blob(
        &self,
        bytes: &[u8],
        _name: &str,
        mime_type: &str,
    ) -> Result<String, RemoteError> {
        Ok(embed_data_uri(bytes, mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(api_key: Option<&str>) -> DocumentAdapter {
        DocumentAdapter::new(
            Client::new(),
            "https://docs.example.com/v1",
            api_key.map(str::to_string),
            "maintenance_logs",
        )
    }

    #[test]
    fn test_document_url_escapes_id() {
        let adapter = adapter(None);
        assert_eq!(
            adapter.document_url("abc 1/2").unwrap().as_str(),
            "https://docs.example.com/v1/maintenance_logs/abc%201%2F2"
        );
    }

    #[test]
    fn test_decode_bare_and_wrapped_listing() {
        let bare = r#"[{"id": "a", "machine_name": "Press-1"}]"#;
        let wrapped = r#"{"documents": [{"id": "a"}, {"id": "b"}]}"#;
        assert_eq!(DocumentAdapter::decode_listing(bare).unwrap().len(), 1);
        assert_eq!(DocumentAdapter::decode_listing(wrapped).unwrap().len(), 2);
        assert!(matches!(
            DocumentAdapter::decode_listing(r#"{"rows": []}"#),
            Err(RemoteError::Decode(_))
        ));
    }

    #[test]
    fn test_bearer_only_when_key_present() {
        let without = adapter(None);
        let request = without
            .authorize(without.client.get(without.collection_url()))
            .build()
            .unwrap();
        assert!(request.headers().get("authorization").is_none());

        let with = adapter(Some("token"));
        let request = with
            .authorize(with.client.get(with.collection_url()))
            .build()
            .unwrap();
        assert_eq!(request.headers()["authorization"], "Bearer token");
    }

    #[tokio::test]
    async fn test_upload_embeds_inline() {
        let reference = adapter(None)
            .upload_blob(b"hi", "note.txt", "text/plain")
            .await
            .unwrap();
        assert_eq!(reference, "data:text/plain;base64,aGk=");
    }
}
