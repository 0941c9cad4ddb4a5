//! Configuration entities.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrackerConfig {
    /// Generation fallback settings
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Global settings
    #[serde(default)]
    pub global: GlobalSettings,
}

impl TrackerConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the default configuration; a malformed file is
    /// an error.
    pub fn from_file(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => {
                serde_json::from_str(&content).map_err(|e| TrackerError::ConfigError {
                    reason: format!("{}: {e}", path.display()),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(TrackerError::FileReadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// One generation candidate: a provider/model pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateSettings {
    /// Provider name (e.g., "gemini", "openrouter")
    pub provider: String,

    /// Model ID
    pub model: String,
}

/// Generation fallback settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Ordered candidate list, fastest/cheapest first
    #[serde(default = "default_candidates")]
    pub candidates: Vec<CandidateSettings>,

    /// Per-candidate request timeout in seconds
    #[serde(default = "default_request_timeout", rename = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,

    /// Backoff after quota-class failures, in seconds
    #[serde(default = "default_quota_backoff", rename = "quotaBackoffSecs")]
    pub quota_backoff_secs: u64,

    /// Backoff after generic transient failures, in seconds
    #[serde(
        default = "default_transient_backoff",
        rename = "transientBackoffSecs"
    )]
    pub transient_backoff_secs: u64,

    /// Maximum accepted input prompt length in characters
    #[serde(default = "default_max_prompt_length", rename = "maxPromptLength")]
    pub max_prompt_length: usize,
}

fn default_candidates() -> Vec<CandidateSettings> {
    vec![
        CandidateSettings {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
        },
        CandidateSettings {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
        },
        CandidateSettings {
            provider: "openrouter".to_string(),
            model: "meta-llama/llama-3.3-70b-instruct:free".to_string(),
        },
        CandidateSettings {
            provider: "openrouter".to_string(),
            model: "deepseek/deepseek-chat:free".to_string(),
        },
    ]
}

const fn default_request_timeout() -> u64 {
    30
}

const fn default_quota_backoff() -> u64 {
    20
}

const fn default_transient_backoff() -> u64 {
    2
}

const fn default_max_prompt_length() -> usize {
    8000
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            request_timeout_secs: default_request_timeout(),
            quota_backoff_secs: default_quota_backoff(),
            transient_backoff_secs: default_transient_backoff(),
            max_prompt_length: default_max_prompt_length(),
        }
    }
}

/// Global configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Log level
    #[serde(default = "default_log_level", rename = "logLevel")]
    pub log_level: String,

    /// Maximum number of breakdown steps per task
    #[serde(default = "default_max_subtasks", rename = "maxSubtasks")]
    pub max_subtasks: usize,

    /// Default priority for new tasks
    #[serde(default = "default_priority", rename = "defaultPriority")]
    pub default_priority: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_max_subtasks() -> usize {
    super::task::MAX_SUBTASKS
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_subtasks: default_max_subtasks(),
            default_priority: default_priority(),
        }
    }
}
