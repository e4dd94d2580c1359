//! Application-level utilities for the Maintlog CLI.
//!
//! This module provides:
//! - Path resolution for the config file and data directory
//! - The application context that opens the record store

mod context;
mod resolver;

// Re-export public API
pub use context::AppContext;
