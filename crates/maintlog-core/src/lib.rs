//! # Maintlog Core
//!
//! Core library for Maintlog - a local-first maintenance log for shop-floor
//! machines.
//!
//! This crate provides the record model, local persistence, remote mirroring
//! adapters and the record store that ties them together, independent of any
//! presentation layer.
//!
//! ## Architecture
//!
//! - **record**: Maintenance records, material lines and form input
//! - **storage**: Local slot persistence (`LocalStore` and implementations)
//! - **remote**: Best-effort remote adapters (relational API, document store,
//!   spreadsheet-script endpoint, or none)
//! - **store**: The record store and its local-first consistency policy
//! - **export**: Tabular flattening (CSV, JSON, JSONL) and report rows
//!
//! ## Consistency
//!
//! The local write is the durability boundary. Remote calls are mirrors:
//! they run after the local write has succeeded and their failures are
//! logged, never returned.

pub mod error;
pub mod export;
pub mod fs;
pub mod record;
pub mod remote;
pub mod storage;
pub mod store;

pub use error::{MaintlogError, Result};
pub use record::{MaintenanceRecord, MaterialLine, RecordInput};
pub use remote::{RemoteAdapter, RemoteConfig, RemoteError};
pub use storage::LocalStore;
pub use store::{LoadPolicy, RecordStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
