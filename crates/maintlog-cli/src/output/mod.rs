//! Output formatting helpers for the CLI.
//!
//! This module provides formatting utilities for displaying maintenance
//! records in various formats (JSON, table, plain text).

mod json;
mod text;

// Re-export public API
pub use json::{print_json, records_json};
pub use text::{print_record, print_record_list};
