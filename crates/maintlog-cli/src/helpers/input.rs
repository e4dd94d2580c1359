//! Input handling helpers for form prompts and attachments.

use std::io::IsTerminal;
use std::path::Path;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use crate::errors::CliError;

use super::parsing::mime_for_path;

/// Prompts are only shown when both stdin and stdout are terminals.
pub fn is_interactive(no_input: bool) -> bool {
    !no_input && std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Prompt for a line of text. Required prompts repeat until non-blank.
pub fn prompt_text(label: &str, default: Option<&str>, required: bool) -> anyhow::Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(label)
        .allow_empty(!required);
    if let Some(value) = default.filter(|v| !v.is_empty()) {
        input = input.default(value.to_string());
    }
    if required {
        input = input.validate_with(|value: &String| -> Result<(), &str> {
            if value.trim().is_empty() {
                Err("This field is required")
            } else {
                Ok(())
            }
        });
    }
    let value = input
        .interact_text()
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", label, e))?;
    Ok(value.trim().to_string())
}

/// Ask a yes/no question.
pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

/// A file read for upload.
#[derive(Debug)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub name: String,
    pub mime_type: &'static str,
}

pub fn read_attachment(path: &Path) -> anyhow::Result<Attachment> {
    let bytes = std::fs::read(path).map_err(|e| {
        CliError::invalid_input(format!(
            "Cannot read attachment {}: {}",
            path.display(),
            e
        ))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());
    Ok(Attachment {
        bytes,
        name,
        mime_type: mime_for_path(path),
    })
}
