//! Error types for the tether CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.
//!
//! Only binary-resolution errors (`ConfigError`, `DiscoveryError`) are hard
//! failures. Everything downstream of a successful agent run (session-log
//! harvesting, usage aggregation, audit events) degrades to zero/default
//! values instead of erroring.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for tether operations.
///
/// Each variant maps to a specific exit code so the harness can distinguish
/// resolution failures from ordinary usage mistakes.
#[derive(Error, Debug)]
pub enum TetherError {
    /// User provided invalid arguments or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// An explicitly configured binary path does not exist. Never triggers
    /// fallback discovery.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// No agent binary was found via override or fallback discovery.
    #[error("Discovery failed: {0}")]
    DiscoveryError(String),

    /// Git operation failed while locating the repository root.
    #[error("Git operation failed: {0}")]
    GitError(String),
}

impl TetherError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TetherError::UserError(_) => exit_codes::USER_ERROR,
            TetherError::ConfigError(_) => exit_codes::CONFIG_FAILURE,
            TetherError::DiscoveryError(_) => exit_codes::DISCOVERY_FAILURE,
            TetherError::GitError(_) => exit_codes::GIT_FAILURE,
        }
    }
}

/// Result type alias for tether operations.
pub type Result<T> = std::result::Result<T, TetherError>;
