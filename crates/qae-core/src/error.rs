//! Error types for QAE Core
//!
//! The engine's analyses never fail. Errors come from the surfaces around
//! them:
//! - Sequence edits that would break ordering invariants
//! - Repository lookups and writes
//! - Loading and validating configuration

use qae_step::StepError;
use std::path::PathBuf;

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Step sequence operation failed
    #[error("step error: {0}")]
    Step(#[from] StepError),

    /// Repository operation failed
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Check if the error is a missing test
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound(_)))
    }
}

/// Test repository errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No test with this id
    #[error("test not found: {0}")]
    NotFound(String),

    /// A test with this id already exists
    #[error("test already exists: {0}")]
    AlreadyExists(String),
}

impl RepositoryError {
    /// Create a not-found error
    #[inline]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    /// Create an already-exists error
    #[inline]
    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists(id.into())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for the schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid-value error
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
