//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;
use std::io::IsTerminal;

use owo_colors::OwoColorize;

use easyrest_core::{ErrorClass, ServiceError};

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Unknown schema, disabled operation, or missing document
    NotFound {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input; `details` holds one line per problem
    InvalidInput {
        message: String,
        details: Vec<String>,
    },

    /// Store, cache, or unexpected failure; message is safe to show
    Failure(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput { message, details } => {
                write!(f, "{}", message)?;
                for detail in details {
                    write!(f, "\n  {}", detail)?;
                }
                Ok(())
            }
            CliError::Failure(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create an InvalidInput error with no detail lines.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput {
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput { .. } => exit_codes::INVALID_INPUT,
            CliError::Failure(_) => exit_codes::FAILURE,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        print_error(&self.to_string());
        std::process::exit(self.exit_code())
    }
}

impl From<&ServiceError> for CliError {
    fn from(err: &ServiceError) -> Self {
        match err {
            ServiceError::InputNotValid(violations) => CliError::InvalidInput {
                message: "Input not valid".to_string(),
                details: violations.clone(),
            },
            ServiceError::UnknownSchema(_) => CliError::NotFound {
                message: err.to_string(),
                hint: Some("Hint: Run `easyrest schemas` to see declared slugs.".to_string()),
            },
            _ => match err.class() {
                ErrorClass::NotFound => CliError::NotFound {
                    message: err.to_string(),
                    hint: None,
                },
                ErrorClass::InvalidInput => CliError::invalid_input(err.user_message()),
                ErrorClass::Internal => CliError::Failure(err.user_message()),
            },
        }
    }
}

/// Map any error reaching `main` onto a `CliError`.
pub fn classify(err: anyhow::Error) -> CliError {
    if let Some(service) = err.downcast_ref::<ServiceError>() {
        return CliError::from(service);
    }
    match err.downcast::<CliError>() {
        Ok(cli) => cli,
        Err(err) => CliError::Failure(format!("{:#}", err)),
    }
}

fn print_error(message: &str) {
    let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    if color {
        eprintln!("{} {}", "Error:".red().bold(), message);
    } else {
        eprintln!("Error: {}", message);
    }
}
