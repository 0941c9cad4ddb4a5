//! Error types for the taskdeck crate.

use thiserror::Error;

/// Comprehensive error types for task tracking and generation
#[derive(Error, Debug, Clone)]
pub enum TrackerError {
    // Task errors
    #[error("Task '{task_id}' not found")]
    TaskNotFound { task_id: String },

    #[error("Invalid status: '{status}'")]
    InvalidStatus { status: String },

    #[error("Invalid priority: '{priority}'")]
    InvalidPriority { priority: String },

    #[error("Invalid energy level: '{level}'")]
    InvalidEnergyLevel { level: String },

    #[error("Invalid due date: '{value}'")]
    InvalidDueDate { value: String },

    // Storage errors
    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Failed to read file '{path}': {reason}")]
    FileReadError { path: String, reason: String },

    #[error("Failed to write file '{path}': {reason}")]
    FileWriteError { path: String, reason: String },

    #[error("Failed to parse JSON: {reason}")]
    JsonParseError { reason: String },

    #[error("Project not initialized. Run initialize() first.")]
    NotInitialized,

    // Configuration errors
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    // Generation errors: retryable class
    #[error("Candidate '{candidate}' is rate limited")]
    RateLimited { candidate: String },

    #[error("Candidate '{candidate}' is unavailable: {reason}")]
    Unavailable { candidate: String, reason: String },

    #[error("Candidate '{candidate}' timed out")]
    Timeout { candidate: String },

    #[error("Candidate '{candidate}' returned an empty response")]
    EmptyResponse { candidate: String },

    // Generation errors: fatal class
    #[error("Candidate '{candidate}' rejected the request: {reason}")]
    BadRequest { candidate: String, reason: String },

    #[error("Authentication failed for provider '{provider}'")]
    AuthFailure { provider: String },

    #[error("Prompt is too long: {len} characters (maximum {max})")]
    PromptTooLong { len: usize, max: usize },

    // Generation errors: terminal class
    #[error("All generation candidates failed: {attempted:?}")]
    Exhausted { attempted: Vec<String> },

    #[error("Could not extract structured content: {reason}")]
    RepairFailure { reason: String },

    #[error("Generation provider '{provider}' is not configured")]
    ProviderNotConfigured { provider: String },
}

impl TrackerError {
    /// Whether the orchestrator may advance to the next candidate after this
    /// failure.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Unavailable { .. }
                | Self::Timeout { .. }
                | Self::EmptyResponse { .. }
        )
    }

    /// Quota-class failures earn the long backoff before the next candidate.
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Fatal generation failures abort the whole operation without trying the
    /// remaining candidates.
    pub fn is_fatal_generation(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. } | Self::AuthFailure { .. } | Self::PromptTooLong { .. }
        )
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseError {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
