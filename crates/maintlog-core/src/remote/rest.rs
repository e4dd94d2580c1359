//! Hosted relational API backend (PostgREST conventions).
//!
//! Records live in one table addressed under `/rest/v1/<table>`; attachments
//! go to object storage under `/storage/v1/object/<bucket>`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

use super::http::{check_status, decode_records};
use super::{Ack, RemoteAdapter, RemoteError};
use crate::record::MaintenanceRecord;

const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

pub struct RestAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
    bucket: String,
}

impl RestAdapter {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        table: &str,
        bucket: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: table.to_string(),
            bucket: bucket.to_string(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn upsert_url(&self) -> String {
        format!("{}?on_conflict=id", self.table_url())
    }

    fn list_url(&self) -> String {
        format!("{}?select=*&order=created_at.desc", self.table_url())
    }

    fn delete_url(&self, id: &str) -> Result<Url, RemoteError> {
        let mut url = Url::parse(&self.table_url())
            .map_err(|err| RemoteError::Transport(format!("Invalid table URL: {}", err)))?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id));
        Ok(url)
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, name)
    }

    fn public_url(&self, name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, name
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

#[async_trait]
impl RemoteAdapter for RestAdapter {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn put(&self, record: &MaintenanceRecord) -> Result<Ack, RemoteError> {
        let request = self
            .client
            .post(self.upsert_url())
            .header("Prefer", UPSERT_PREFERENCE)
            .json(&[record]);
        check_status(self.authorize(request).send().await?).await?;
        debug!(id = %record.id, table = %self.table, "record upserted");
        Ok(Ack)
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceRecord>, RemoteError> {
        let request = self.client.get(self.list_url());
        let response = check_status(self.authorize(request).send().await?).await?;
        let rows: Vec<serde_json::Value> = response.json().await?;
        Ok(decode_records(self.name(), rows))
    }

    async fn remove(&self, id: &str) -> Result<Ack, RemoteError> {
        let request = self.client.delete(self.delete_url(id)?);
        check_status(self.authorize(request).send().await?).await?;
        debug!(id, table = %self.table, "record deleted");
        Ok(Ack)
    }

    async fn upload_blob(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<String, RemoteError> {
        let request = self
            .client
            .post(self.object_url(name))
            .header(CONTENT_TYPE, mime_type)
            .header("x-upsert", "true")
            .body(bytes.to_vec());
        check_status(self.authorize(request).send().await?).await?;
        Ok(self.public_url(name))
    }
}
