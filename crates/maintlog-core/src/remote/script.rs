//! Spreadsheet-script endpoint backend.
//!
//! The endpoint is a single URL taking `POST { "action": ..., ...fields }`
//! and answering `{ "success": bool, "logs"?, "error"?, "downloadUrl"? }`.
//! It has no delete action.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::http::{check_status, decode_records};
use super::{Ack, RemoteAdapter, RemoteError};
use crate::record::MaintenanceRecord;

pub struct ScriptAdapter {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ScriptRequest<'a> {
    CreateLog(&'a MaintenanceRecord),
    GetLogs,
    UploadFile {
        #[serde(rename = "fileName")]
        file_name: &'a str,
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: String,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ScriptResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    logs: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "downloadUrl")]
    download_url: Option<String>,
}

impl ScriptResponse {
    fn into_success(self) -> Result<Self, RemoteError> {
        if self.success {
            return Ok(self);
        }
        Err(RemoteError::Rejected(
            self.error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "endpoint reported failure".to_string()),
        ))
    }
}

impl ScriptAdapter {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn call(&self, request: &ScriptRequest<'_>) -> Result<ScriptResponse, RemoteError> {
        let response = self.client.post(&self.url).json(request).send().await?;
        let body = check_status(response).await?.text().await?;
        let parsed: ScriptResponse = serde_json::from_str(&body)?;
        parsed.into_success()
    }
}

#[async_trait]
impl RemoteAdapter for ScriptAdapter {
    fn name(&self) -> &'static str {
        "script"
    }

    async fn put(&self, record: &MaintenanceRecord) -> Result<Ack, RemoteError> {
        self.call(&ScriptRequest::CreateLog(record)).await?;
        debug!(id = %record.id, "record sent to script endpoint");
        Ok(Ack)
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceRecord>, RemoteError> {
        let response = self.call(&ScriptRequest::GetLogs).await?;
        Ok(decode_records(self.name(), response.logs.unwrap_or_default()))
    }

    async fn remove(&self, _id: &str) -> Result<Ack, RemoteError> {
        Err(RemoteError::Unsupported {
            backend: "script",
            operation: "remove",
        })
    }

    async fn upload_blob(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> Result<String, RemoteError> {
        let response = self
            .call(&ScriptRequest::UploadFile {
                file_name: name,
                mime_type,
                data: STANDARD.encode(bytes),
            })
            .await?;
        response
            .download_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| RemoteError::Decode("upload response has no downloadUrl".to_string()))
    }
}
