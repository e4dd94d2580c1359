//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes so scripts can tell a missing
//! record from a rejected form or a failed disk write.

use std::fmt;

use maintlog_core::MaintlogError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, record)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<MaintlogError>() {
        Some(MaintlogError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(MaintlogError::Validation(_)) | Some(MaintlogError::InvalidInput(_)) => {
            exit_codes::INVALID_INPUT
        }
        Some(MaintlogError::Storage(_)) => exit_codes::STORAGE_FAILED,
        None => exit_codes::GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_codes() {
        let err = anyhow::Error::new(CliError::not_found("Record not found", "Hint: list"));
        assert_eq!(exit_code_for(&err), exit_codes::NOT_FOUND);

        let err = anyhow::Error::new(CliError::invalid_input("bad"));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (MaintlogError::NotFound("x".into()), exit_codes::NOT_FOUND),
            (MaintlogError::Validation("x".into()), exit_codes::INVALID_INPUT),
            (MaintlogError::InvalidInput("x".into()), exit_codes::INVALID_INPUT),
            (MaintlogError::Storage("x".into()), exit_codes::STORAGE_FAILED),
        ];
        for (core, expected) in cases {
            assert_eq!(exit_code_for(&anyhow::Error::new(core)), expected);
        }
        assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), exit_codes::GENERAL);
    }

    #[test]
    fn test_not_found_display_includes_hint() {
        let err = CliError::not_found("Record abc not found", "Hint: Run `maintlog list`.");
        assert_eq!(
            err.to_string(),
            "Record abc not found\nHint: Run `maintlog list`."
        );
    }
}
