//! Error types for retag-core

use std::fmt;
use thiserror::Error;

/// Result type alias using retag-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Registry mutation performed while moving the latest tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOp {
    Pull,
    Tag,
    Push,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationOp::Pull => write!(f, "pull"),
            MutationOp::Tag => write!(f, "tag"),
            MutationOp::Push => write!(f, "push"),
        }
    }
}

/// Core error types for retag
#[derive(Error, Debug)]
pub enum Error {
    /// Bad, conflicting or malformed input. Raised before any registry call.
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Manifest inspection failed. The comparator downgrades this to an
    /// indeterminate result instead of failing the run.
    #[error("Failed to inspect manifest for {reference}: {message}")]
    Inspection { reference: String, message: String },

    /// Pull, tag or push failed while retagging
    #[error("docker {operation} failed for {reference}: {message}")]
    Mutation {
        operation: MutationOp,
        reference: String,
        message: String,
    },

    /// Registry tool binary could not be located
    #[error("{tool} not found in PATH")]
    ToolNotFound { tool: String },

    /// Registry tool did not finish in time
    #[error("Command timed out after {secs}s: {command}")]
    Timeout { command: String, secs: u64 },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an inspection error
    pub fn inspection(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Inspection {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a mutation error
    pub fn mutation(
        operation: MutationOp,
        reference: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mutation {
            operation,
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create a tool not found error
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a timeout error
    pub fn timeout(command: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            command: command.into(),
            secs,
        }
    }

    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
