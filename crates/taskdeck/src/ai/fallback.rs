//! Generation fallback orchestrator.
//!
//! Tries an ordered list of generation candidates for a single logical
//! request, sequentially (never in parallel) so backoff ordering stays
//! observable and shared quota is not multiplied across candidates. The
//! ordering encodes a preference: fastest/cheapest first, most capable last.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::entities::GenerationSettings;
use crate::errors::{TrackerError, TrackerResult};

use super::provider::{AIMessage, GenerateOptions, TokenUsage};
use super::registry::ProviderRegistry;
use super::repair::OutputShape;

/// One generation candidate: a provider/model pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Registered provider name
    pub provider: String,
    /// Model ID passed to the provider
    pub model: String,
}

impl Candidate {
    /// Create a new candidate.
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }

    /// Candidate identifier, rendered as `provider/model`.
    pub fn id(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

/// Static fallback configuration, read-only at request time.
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Ordered candidate queue
    pub candidates: Vec<Candidate>,
    /// Per-candidate request timeout
    pub request_timeout: Duration,
    /// Backoff after quota-class failures
    pub quota_backoff: Duration,
    /// Backoff after generic transient failures
    pub transient_backoff: Duration,
    /// Maximum accepted input prompt length in characters
    pub max_prompt_len: usize,
}

impl From<&GenerationSettings> for FallbackConfig {
    fn from(settings: &GenerationSettings) -> Self {
        Self {
            candidates: settings
                .candidates
                .iter()
                .map(|c| Candidate::new(&c.provider, &c.model))
                .collect(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            quota_backoff: Duration::from_secs(settings.quota_backoff_secs),
            transient_backoff: Duration::from_secs(settings.transient_backoff_secs),
            max_prompt_len: settings.max_prompt_length,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self::from(&GenerationSettings::default())
    }
}

/// Result of a successful fallback run.
///
/// Only ever produced from a non-empty successful response.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Raw generated text
    pub text: String,
    /// Identifier of the candidate that produced it
    pub candidate: String,
    /// Token usage reported by the provider
    pub usage: TokenUsage,
}

/// Orchestrates sequential fallback across generation candidates.
pub struct FallbackOrchestrator {
    registry: Arc<ProviderRegistry>,
    config: FallbackConfig,
}

impl FallbackOrchestrator {
    /// Create a new orchestrator over an injected provider registry.
    pub fn new(registry: Arc<ProviderRegistry>, config: FallbackConfig) -> Self {
        Self { registry, config }
    }

    /// The active fallback configuration.
    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Convenience wrapper building a system + user message pair.
    pub async fn generate_prompt(
        &self,
        system: &str,
        user: &str,
        shape: OutputShape,
    ) -> TrackerResult<GenerationOutcome> {
        let messages = vec![AIMessage::system(system), AIMessage::user(user)];
        self.generate(&messages, shape).await
    }

    /// Run the fallback state machine once, returning the first success.
    ///
    /// Candidates are consumed strictly in order. Retryable failures
    /// (rate-limit, transient-unavailable, timeout, empty response) advance to
    /// the next candidate after an asynchronous backoff; fatal failures abort
    /// immediately. An exhausted queue yields [`TrackerError::Exhausted`].
    ///
    /// Every await point (the provider call and the backoff sleep) is
    /// cancellation-safe, so callers may race this future against an overall
    /// deadline with `tokio::time::timeout`; the in-flight remote call is
    /// dropped, not aborted remotely.
    pub async fn generate(
        &self,
        messages: &[AIMessage],
        shape: OutputShape,
    ) -> TrackerResult<GenerationOutcome> {
        let prompt_len: usize = messages.iter().map(|m| m.content.len()).sum();
        if prompt_len > self.config.max_prompt_len {
            return Err(TrackerError::PromptTooLong {
                len: prompt_len,
                max: self.config.max_prompt_len,
            });
        }

        let options = GenerateOptions {
            temperature: Some(0.7),
            max_tokens: Some(1024),
            json_mode: shape != OutputShape::FreeText,
            ..Default::default()
        };

        let total = self.config.candidates.len();
        let mut attempted = Vec::with_capacity(total);

        for (idx, candidate) in self.config.candidates.iter().enumerate() {
            let id = candidate.id();
            attempted.push(id.clone());

            let Some(provider) = self.registry.get(&candidate.provider) else {
                tracing::warn!(candidate = %id, "provider not registered, skipping");
                continue;
            };
            if !provider.is_configured() {
                tracing::warn!(
                    candidate = %id,
                    env = provider.api_key_env_var(),
                    "provider not configured, skipping"
                );
                continue;
            }

            tracing::info!(candidate = %id, attempt = idx + 1, total, "trying candidate");

            let call = provider.generate_text(&candidate.model, messages, &options);
            let err = match timeout(self.config.request_timeout, call).await {
                Ok(Ok(response)) => {
                    if response.text.trim().is_empty() {
                        // An empty success is a failure of this candidate
                        TrackerError::EmptyResponse { candidate: id }
                    } else {
                        tracing::debug!(
                            candidate = %id,
                            tokens = response.usage.total_tokens,
                            "candidate succeeded"
                        );
                        return Ok(GenerationOutcome {
                            text: response.text,
                            candidate: id,
                            usage: response.usage,
                        });
                    }
                }
                Ok(Err(e)) => e,
                Err(_) => TrackerError::Timeout { candidate: id },
            };

            if err.is_fatal_generation() {
                tracing::warn!(error = %err, "fatal generation error, aborting fallback");
                return Err(err);
            }

            tracing::warn!(error = %err, "candidate failed");

            if idx + 1 < total {
                let backoff = if err.is_quota() {
                    self.config.quota_backoff
                } else {
                    self.config.transient_backoff
                };
                tracing::debug!(?backoff, "backing off before next candidate");
                sleep(backoff).await;
            }
        }

        Err(TrackerError::Exhausted { attempted })
    }
}
