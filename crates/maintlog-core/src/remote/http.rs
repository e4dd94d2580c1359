//! Helpers shared by the HTTP adapters.

use reqwest::{Client, Response, Url};
use tracing::warn;

use super::{RemoteError, RemoteOptions};
use crate::record::MaintenanceRecord;

const MAX_ERROR_BODY: usize = 512;

pub(crate) fn client(options: &RemoteOptions) -> Result<Client, RemoteError> {
    Client::builder()
        .timeout(options.timeout)
        .user_agent(concat!("maintlog/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|err| RemoteError::Transport(format!("Cannot build HTTP client: {}", err)))
}

/// Pass successful responses through; turn anything else into `Status`.
pub(crate) async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body: truncate_body(body.trim()),
    })
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Trim a configured base URL and make sure it can carry paths.
pub(crate) fn base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|err| format!("invalid URL \"{}\": {}", raw, err))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
        return Err(format!("URL \"{}\" must be an http(s) address", raw));
    }
    Ok(trimmed.to_string())
}

/// Decode a JSON array of records, skipping elements that do not decode.
pub(crate) fn decode_records(
    backend: &'static str,
    items: Vec<serde_json::Value>,
) -> Vec<MaintenanceRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(backend, error = %err, "skipping undecodable remote record");
                None
            }
        })
        .collect()
}
