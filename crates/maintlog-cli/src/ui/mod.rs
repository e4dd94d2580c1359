//! UI primitives for the Maintlog CLI.
//!
//! This module provides:
//! - **Context**: Terminal detection and output mode (json, plain, pretty)
//! - **Theme**: Badge tokens and color styles
//! - **Render**: Tables, headers, receipts, hints, formatted text
//! - **Format**: String utilities (truncate, wrap, align)
//!
//! # Usage
//!
//! ```ignore
//! use crate::ui::{UiContext, Badge};
//! use crate::ui::render::{header, table, badge, hint};
//!
//! let ctx = app.ui_context(args.json, format);
//!
//! if ctx.mode.is_json() {
//!     // Handle JSON output separately
//!     return Ok(());
//! }
//!
//! println!("{}", header(&ctx, "list", None));
//! println!("{}", table(&ctx, &columns, &rows));
//! println!("{}", hint(&ctx, "maintlog show <id>"));
//! ```

mod context;
pub mod format;
pub mod render;
pub mod theme;

// Re-export core types at module level
pub use context::UiContext;
pub use theme::Badge;

// Re-export commonly used render functions
pub use render::{
    badge, blank_line, header, hint, kv, print, print_error, receipt, simple_table,
    table, Column,
};

// Re-export commonly used format functions
pub use format::{format_datetime, short_id, single_line, truncate};
