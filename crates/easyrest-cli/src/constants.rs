//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (store, cache, config, I/O)
/// - 2: Misuse of shell command (reserved by shells and clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Unknown schema, disabled operation, or missing document.
    pub const NOT_FOUND: i32 = 3;

    /// Document failed validation or the input was not usable JSON.
    pub const INVALID_INPUT: i32 = 4;
}
