//! Input and parsing helper functions for the CLI.
//!
//! This module provides utilities for:
//! - Form prompts, confirmations and attachment reading (`input`)
//! - Material, format and MIME type parsing (`parsing`)

mod input;
mod parsing;

// Re-export public API
pub use input::{confirm, is_interactive, prompt_text, read_attachment};
pub use parsing::{parse_materials, parse_output_format, OutputFormat};
