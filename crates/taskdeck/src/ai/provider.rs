//! Generation provider trait and common types.
//!
//! Defines the interface that all generation backends must implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AIRole {
    /// System message (sets context/behavior)
    System,
    /// User message (input)
    User,
    /// Assistant message (model response)
    Assistant,
}

/// A message in a conversation with a generation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIMessage {
    /// Role of the message sender
    pub role: AIRole,
    /// Content of the message
    pub content: String,
}

impl AIMessage {
    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: AIRole::Assistant,
            content: content.into(),
        }
    }
}

/// Token usage information from a generation response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: u32,
    /// Number of output tokens
    pub output_tokens: u32,
    /// Total tokens (input + output)
    pub total_tokens: u32,
}

/// Response from a generation model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AIResponse {
    /// Generated text content
    pub text: String,
    /// Token usage information
    pub usage: TokenUsage,
    /// Model that generated the response
    pub model: String,
    /// Provider that generated the response
    pub provider: String,
}

/// Options for text generation.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 to 1.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
    /// Whether to request JSON output
    pub json_mode: bool,
}

/// Trait for generation providers.
///
/// All backends (Gemini, OpenRouter, etc.) must implement this trait.
/// Failures are returned pre-classified into the crate error taxonomy so the
/// fallback orchestrator can decide between retrying the next candidate and
/// aborting.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Get the provider name (e.g., "gemini", "openrouter").
    fn name(&self) -> &'static str;

    /// Get the environment variable name for the API key.
    fn api_key_env_var(&self) -> &'static str;

    /// Check if the provider is configured (has API key).
    fn is_configured(&self) -> bool;

    /// Get the list of supported models.
    fn supported_models(&self) -> Vec<&str>;

    /// Check if a model is supported.
    fn supports_model(&self, model: &str) -> bool {
        self.supported_models().contains(&model)
    }

    /// Generate text from messages.
    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> TrackerResult<AIResponse>;
}

/// Map an HTTP status code from a provider API into the error taxonomy.
///
/// 429 is quota-class; 5xx is transient; 401/403 and other 4xx are fatal.
pub(crate) fn classify_status(
    provider: &str,
    candidate: &str,
    status: u16,
    message: String,
) -> TrackerError {
    match status {
        429 => TrackerError::RateLimited {
            candidate: candidate.to_string(),
        },
        401 | 403 => TrackerError::AuthFailure {
            provider: provider.to_string(),
        },
        400..=499 => TrackerError::BadRequest {
            candidate: candidate.to_string(),
            reason: message,
        },
        _ => TrackerError::Unavailable {
            candidate: candidate.to_string(),
            reason: message,
        },
    }
}

/// Map a reqwest transport error into the error taxonomy.
pub(crate) fn classify_transport(candidate: &str, err: &reqwest::Error) -> TrackerError {
    if err.is_timeout() {
        TrackerError::Timeout {
            candidate: candidate.to_string(),
        }
    } else {
        TrackerError::Unavailable {
            candidate: candidate.to_string(),
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = AIMessage::system("context");
        assert_eq!(msg.role, AIRole::System);
        assert_eq!(msg.content, "context");

        let msg = AIMessage::user("hello");
        assert_eq!(msg.role, AIRole::User);

        let msg = AIMessage::assistant("hi");
        assert_eq!(msg.role, AIRole::Assistant);
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status("gemini", "gemini/flash", 429, String::new()),
            TrackerError::RateLimited { .. }
        ));
        assert!(matches!(
            classify_status("gemini", "gemini/flash", 401, String::new()),
            TrackerError::AuthFailure { .. }
        ));
        assert!(matches!(
            classify_status("gemini", "gemini/flash", 400, String::new()),
            TrackerError::BadRequest { .. }
        ));
        assert!(matches!(
            classify_status("gemini", "gemini/flash", 503, String::new()),
            TrackerError::Unavailable { .. }
        ));
    }
}
