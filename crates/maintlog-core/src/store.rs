//! The record store.
//!
//! Owns the in-memory collection and applies the local-first policy: every
//! mutation is validated, written to the local slot, and only then mirrored
//! to the remote. Mirrors run as detached tasks and their failures are
//! logged, never returned.
//!
//! The local slot only ever changes through `create`, `update` and `delete`.
//! A remote listing can shape the view returned by `load`, but it is never
//! written back, and ids deleted locally stay out of the view.

use std::collections::{BTreeSet, HashSet};
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{MaintlogError, Result};
use crate::record::{embed_data_uri, new_record_id, MaintenanceRecord, RecordInput, DEFAULT_CREATED_BY};
use crate::remote::{Ack, RemoteAdapter, RemoteError};
use crate::storage::LocalStore;

/// How a successful remote fetch shapes the view on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Local records as stored; remote-only records are added
    Merge,
    /// The remote result replaces the view
    RemoteAuthoritative,
    /// The remote result is fetched and discarded
    #[default]
    MirrorOnly,
}

impl LoadPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadPolicy::Merge => "merge",
            LoadPolicy::RemoteAuthoritative => "remote_authoritative",
            LoadPolicy::MirrorOnly => "mirror_only",
        }
    }
}

impl FromStr for LoadPolicy {
    type Err = MaintlogError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "merge" => Ok(LoadPolicy::Merge),
            "remote_authoritative" | "remote" => Ok(LoadPolicy::RemoteAuthoritative),
            "mirror_only" | "local" => Ok(LoadPolicy::MirrorOnly),
            other => Err(MaintlogError::InvalidInput(format!(
                "Unknown load policy \"{}\" (expected merge, remote_authoritative or mirror_only)",
                other
            ))),
        }
    }
}

pub struct RecordStore {
    /// What callers see, newest first
    records: Vec<MaintenanceRecord>,
    /// Contents of the local slot
    stored: Vec<MaintenanceRecord>,
    deleted: BTreeSet<String>,
    local: Box<dyn LocalStore>,
    remote: Arc<dyn RemoteAdapter>,
    policy: LoadPolicy,
    user: String,
    pending: Vec<JoinHandle<()>>,
}

impl RecordStore {
    /// Open the store over a local slot and a remote.
    ///
    /// The local slot is read immediately; a missing or corrupt slot yields
    /// an empty collection.
    pub fn new(local: Box<dyn LocalStore>, remote: Arc<dyn RemoteAdapter>) -> Self {
        let stored = local.read_all();
        let deleted = local.read_deleted().into_iter().collect();
        debug!(count = stored.len(), location = %local.describe(), "record store opened");
        Self {
            records: stored.clone(),
            stored,
            deleted,
            local,
            remote,
            policy: LoadPolicy::default(),
            user: DEFAULT_CREATED_BY.to_string(),
            pending: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: LoadPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Author stamped on new records. Blank names fall back to the default.
    pub fn with_user(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.user = if name.trim().is_empty() {
            DEFAULT_CREATED_BY.to_string()
        } else {
            name.trim().to_string()
        };
        self
    }

    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn remote_name(&self) -> &'static str {
        self.remote.name()
    }

    pub fn local_description(&self) -> String {
        self.local.describe()
    }

    /// Current view, newest first.
    pub fn records(&self) -> &[MaintenanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&MaintenanceRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Create a record and prepend it to the collection.
    ///
    /// # Errors
    ///
    /// - `MaintlogError::Validation` if the input is invalid
    /// - `MaintlogError::Storage` if the local write fails; the collection is
    ///   left unchanged
    pub fn create(&mut self, input: RecordInput) -> Result<MaintenanceRecord> {
        input.validate()?;
        let record = input.into_record(new_record_id(), Utc::now(), self.user.clone());

        let mut stored = self.stored.clone();
        stored.insert(0, record.clone());
        self.persist(stored)?;
        self.records.insert(0, record.clone());
        info!(id = %record.id, machine = %record.machine_name, "record created");

        self.mirror_put(record.clone());
        Ok(record)
    }

    /// Refresh the view from the local slot and, when enabled, the remote.
    ///
    /// Never fails. Remote errors are logged and the local view is kept.
    pub async fn load(&mut self) -> &[MaintenanceRecord] {
        self.stored = self.local.read_all();
        self.deleted = self.local.read_deleted().into_iter().collect();
        self.records = self.stored.clone();
        info!(count = self.records.len(), "loaded local slot");

        if !self.remote.is_enabled() {
            return &self.records;
        }

        match self.remote.get_all().await {
            Ok(remote) => self.apply_remote(remote),
            Err(err) => {
                warn!(backend = self.remote.name(), error = %err, "remote load failed; keeping local records");
            }
        }
        &self.records
    }

    fn apply_remote(&mut self, remote: Vec<MaintenanceRecord>) {
        info!(
            backend = self.remote.name(),
            count = remote.len(),
            policy = self.policy.as_str(),
            "fetched remote records"
        );

        let remote: Vec<MaintenanceRecord> = latest_by_id(remote)
            .into_iter()
            .filter(|record| !self.deleted.contains(&record.id))
            .collect();

        self.records = match self.policy {
            LoadPolicy::MirrorOnly => return,
            LoadPolicy::RemoteAuthoritative => newest_first(remote),
            LoadPolicy::Merge => merge_views(remote, &self.stored),
        };
    }

    /// Case-insensitive search over machine, operator, section and sub-part.
    ///
    /// A blank term matches every record. Order is preserved.
    pub fn query(&self, term: &str) -> Vec<&MaintenanceRecord> {
        let needle = term.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    /// Replace every form field of an existing record.
    ///
    /// `id`, `created_at` and `created_by` are kept. A record that only came
    /// from the remote is stored locally from then on.
    ///
    /// # Errors
    ///
    /// - `MaintlogError::NotFound` if no record has this id
    /// - `MaintlogError::Validation` if the input is invalid
    /// - `MaintlogError::Storage` if the local write fails; the collection is
    ///   left unchanged
    pub fn update(&mut self, id: &str, input: RecordInput) -> Result<MaintenanceRecord> {
        let index = self.position(id)?;
        input.validate()?;

        let existing = &self.records[index];
        let replacement = input.into_record(
            existing.id.clone(),
            existing.created_at,
            existing.created_by.clone(),
        );

        let mut stored = self.stored.clone();
        match stored.iter().position(|record| record.id == replacement.id) {
            Some(slot_index) => stored[slot_index] = replacement.clone(),
            None => {
                stored.push(replacement.clone());
                stored = newest_first(stored);
            }
        }
        self.persist(stored)?;
        self.records[index] = replacement.clone();
        info!(id = %replacement.id, "record updated");

        self.mirror_put(replacement.clone());
        Ok(replacement)
    }

    /// Remove a record.
    ///
    /// # Errors
    ///
    /// - `MaintlogError::NotFound` if no record has this id
    /// - `MaintlogError::Storage` if the local write fails; the collection is
    ///   left unchanged
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let index = self.position(id)?;
        let stored: Vec<MaintenanceRecord> = self
            .stored
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect();
        self.persist(stored)?;
        let removed = self.records.remove(index);
        self.remember_deleted(&removed.id);
        info!(id = %removed.id, "record deleted");

        if self.remote.is_enabled() {
            let remote = Arc::clone(&self.remote);
            let id = removed.id;
            self.spawn_mirror("remove", id.clone(), async move { remote.remove(&id).await });
        }
        Ok(())
    }

    /// Resolve a full id or a unique id prefix.
    ///
    /// # Errors
    ///
    /// - `MaintlogError::NotFound` if nothing matches
    /// - `MaintlogError::InvalidInput` if the prefix is blank or ambiguous
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(MaintlogError::InvalidInput("Record id is empty".to_string()));
        }
        if let Some(record) = self.get(prefix) {
            return Ok(record.id.clone());
        }

        let matches: Vec<&str> = self
            .records
            .iter()
            .filter(|record| record.id.starts_with(prefix))
            .map(|record| record.id.as_str())
            .collect();

        match matches.as_slice() {
            [] => Err(MaintlogError::missing_record(prefix)),
            [only] => Ok(only.to_string()),
            many => Err(MaintlogError::InvalidInput(format!(
                "Id prefix \"{}\" is ambiguous ({} records match)",
                prefix,
                many.len()
            ))),
        }
    }

    /// Store an attachment and return a reference for `image_ref` or
    /// `quotation_ref`.
    ///
    /// Uploads through the remote when one is enabled; otherwise, or when
    /// the upload fails, the bytes are embedded as a data URI. Never fails.
    pub async fn attach(&self, bytes: &[u8], name: &str, mime_type: &str) -> String {
        if !self.remote.is_enabled() {
            return embed_data_uri(bytes, mime_type);
        }

        let object_name = format!("{}-{}", new_record_id(), sanitize_object_name(name));
        match self.remote.upload_blob(bytes, &object_name, mime_type).await {
            Ok(reference) => {
                debug!(object = %object_name, "attachment uploaded");
                reference
            }
            Err(err) => {
                warn!(backend = self.remote.name(), error = %err, "attachment upload failed; embedding inline");
                embed_data_uri(bytes, mime_type)
            }
        }
    }

    /// Wait for every in-flight mirror to finish.
    pub async fn settle(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(err) = handle.await {
                warn!(error = %err, "remote mirror task did not complete");
            }
        }
    }

    /// Number of mirror tasks still running.
    pub fn pending_mirrors(&self) -> usize {
        self.pending
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Write `stored` to the local slot and adopt it only if the write
    /// succeeds.
    fn persist(&mut self, stored: Vec<MaintenanceRecord>) -> Result<()> {
        self.local.write_all(&stored)?;
        self.stored = stored;
        Ok(())
    }

    fn remember_deleted(&mut self, id: &str) {
        if !self.deleted.insert(id.to_string()) {
            return;
        }
        let ids: Vec<String> = self.deleted.iter().cloned().collect();
        if let Err(err) = self.local.write_deleted(&ids) {
            warn!(id, error = %err, "cannot record deleted id; a remote listing may show it again");
        }
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| MaintlogError::missing_record(id))
    }

    fn mirror_put(&mut self, record: MaintenanceRecord) {
        if !self.remote.is_enabled() {
            return;
        }
        let remote = Arc::clone(&self.remote);
        let id = record.id.clone();
        self.spawn_mirror("put", id, async move { remote.put(&record).await });
    }

    fn spawn_mirror<F>(&mut self, operation: &'static str, id: String, call: F)
    where
        F: Future<Output = std::result::Result<Ack, RemoteError>> + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!(operation, id = %id, "no async runtime; skipping remote mirror");
            return;
        };

        self.pending.retain(|handle| !handle.is_finished());
        let backend = self.remote.name();
        let handle = runtime.spawn(async move {
            match call.await {
                Ok(Ack) => debug!(backend, operation, id = %id, "remote mirror completed"),
                Err(err @ RemoteError::Unsupported { .. }) => {
                    debug!(backend, operation, id = %id, error = %err, "remote mirror skipped")
                }
                Err(err) => {
                    warn!(backend, operation, id = %id, error = %err, "remote mirror failed")
                }
            }
        });
        self.pending.push(handle);
    }
}

/// Union of local and remote by id. The local copy wins; records only the
/// remote holds are added. Result is newest first.
fn merge_views(remote: Vec<MaintenanceRecord>, local: &[MaintenanceRecord]) -> Vec<MaintenanceRecord> {
    let seen: HashSet<&str> = local.iter().map(|record| record.id.as_str()).collect();
    let mut merged = local.to_vec();
    merged.extend(remote.into_iter().filter(|record| !seen.contains(record.id.as_str())));
    newest_first(merged)
}

/// One record per id. Append-only backends list every `put`, so the last
/// row for an id is the newest copy.
fn latest_by_id(records: Vec<MaintenanceRecord>) -> Vec<MaintenanceRecord> {
    let mut seen = HashSet::new();
    let mut latest: Vec<MaintenanceRecord> = records
        .into_iter()
        .rev()
        .filter(|record| seen.insert(record.id.clone()))
        .collect();
    latest.reverse();
    latest
}

fn newest_first(mut records: Vec<MaintenanceRecord>) -> Vec<MaintenanceRecord> {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records
}

fn sanitize_object_name(name: &str) -> String {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches(['.', '_']).is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn record_at(id: &str, machine: &str, minutes: i64) -> MaintenanceRecord {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        RecordInput::new(machine, "Line A", "Motor").into_record(
            id.to_string(),
            base + Duration::minutes(minutes),
            "User".to_string(),
        )
    }

    #[test]
    fn test_merge_local_wins_and_adds_remote_only() {
        let local = vec![
            record_at("offline", "Lathe-2", 30),
            record_at("shared", "Press-1 (edited)", 10),
        ];
        let remote = vec![record_at("shared", "Press-1", 10), record_at("other", "Drill", 20)];

        let merged = merge_views(remote, &local);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["offline", "other", "shared"]);
        assert_eq!(merged[2].machine_name, "Press-1 (edited)");
    }

    #[test]
    fn test_merge_with_empty_remote_keeps_local() {
        let local = vec![record_at("a", "Press-1", 1)];
        assert_eq!(merge_views(Vec::new(), &local), local);
    }

    #[test]
    fn test_latest_by_id_keeps_last_row() {
        let records = vec![
            record_at("a", "first", 1),
            record_at("b", "other", 1),
            record_at("a", "second", 1),
        ];
        let latest = latest_by_id(records);
        let names: Vec<&str> = latest.iter().map(|r| r.machine_name.as_str()).collect();
        assert_eq!(names, vec!["other", "second"]);
    }

    #[test]
    fn test_default_policy_is_mirror_only() {
        assert_eq!(LoadPolicy::default(), LoadPolicy::MirrorOnly);
    }

    #[test]
    fn test_newest_first_is_stable() {
        let records = vec![
            record_at("x", "a", 5),
            record_at("y", "b", 5),
            record_at("z", "c", 9),
        ];
        let ids: Vec<String> = newest_first(records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["z", "x", "y"]);
    }

    #[test]
    fn test_load_policy_from_str() {
        assert_eq!("merge".parse::<LoadPolicy>().unwrap(), LoadPolicy::Merge);
        assert_eq!(
            "remote-authoritative".parse::<LoadPolicy>().unwrap(),
            LoadPolicy::RemoteAuthoritative
        );
        assert_eq!("Mirror_Only".parse::<LoadPolicy>().unwrap(), LoadPolicy::MirrorOnly);
        assert!("newest".parse::<LoadPolicy>().is_err());
    }

    #[test]
    fn test_sanitize_object_name() {
        assert_eq!(sanitize_object_name("motor photo.jpg"), "motor_photo.jpg");
        assert_eq!(sanitize_object_name("/tmp/scans/quote.pdf"), "quote.pdf");
        assert_eq!(sanitize_object_name("..."), "file");
        assert_eq!(sanitize_object_name(""), "file");
    }
}
