//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and by clap for usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const GENERAL: i32 = 1;

    /// Resource not found (config file, record).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, including form validation failures.
    pub const INVALID_INPUT: i32 = 4;

    /// The local slot could not be written.
    pub const STORAGE_FAILED: i32 = 5;
}

/// Default number of records shown by `list`.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Environment variable holding the remote API key.
pub const API_KEY_ENV: &str = "MAINTLOG_REMOTE_API_KEY";

/// Environment variable holding a full log filter directive.
pub const LOG_ENV: &str = "MAINTLOG_LOG";
