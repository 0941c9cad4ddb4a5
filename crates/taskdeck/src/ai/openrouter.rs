//! OpenRouter provider implementation (OpenAI-compatible chat completions).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

use super::provider::{
    classify_status, classify_transport, AIMessage, AIResponse, AIRole, GenerateOptions,
    GenerationProvider, TokenUsage,
};

/// OpenRouter API endpoint
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model
const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

/// Known-good OpenRouter models (free tier)
const SUPPORTED_MODELS: &[&str] = &[
    "google/gemini-2.0-flash-exp:free",
    "google/gemma-3-27b-it:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "deepseek/deepseek-chat:free",
    "mistralai/mistral-7b-instruct:free",
];

/// OpenRouter API request message
#[derive(Debug, Serialize)]
struct OpenRouterMessage {
    role: String,
    content: String,
}

/// OpenRouter API response format
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// OpenRouter API request
#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<OpenRouterMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

/// OpenRouter API response choice message
#[derive(Debug, Deserialize)]
struct OpenRouterChoiceMessage {
    content: Option<String>,
}

/// OpenRouter API response choice
#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterChoiceMessage,
}

/// OpenRouter API usage
#[derive(Debug, Default, Deserialize)]
struct OpenRouterUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

/// OpenRouter API response
#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    #[serde(default)]
    choices: Vec<OpenRouterChoice>,
    #[serde(default)]
    model: Option<String>,
    // Free-tier models sometimes omit usage entirely
    #[serde(default)]
    usage: Option<OpenRouterUsage>,
}

/// OpenRouter API error
#[derive(Debug, Deserialize)]
struct OpenRouterError {
    message: String,
}

/// OpenRouter API error response
#[derive(Debug, Deserialize)]
struct OpenRouterErrorResponse {
    error: OpenRouterError,
}

/// OpenRouter provider.
pub struct OpenRouterProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: OPENROUTER_API_URL.to_string(),
        }
    }

    /// Create from environment variable.
    pub fn from_env() -> TrackerResult<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY").ok();
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: OPENROUTER_API_URL.to_string(),
        })
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Convert messages to OpenRouter format.
    fn convert_messages(&self, messages: &[AIMessage]) -> Vec<OpenRouterMessage> {
        messages
            .iter()
            .map(|msg| OpenRouterMessage {
                role: match msg.role {
                    AIRole::System => "system".to_string(),
                    AIRole::User => "user".to_string(),
                    AIRole::Assistant => "assistant".to_string(),
                },
                content: msg.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl GenerationProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn api_key_env_var(&self) -> &'static str {
        "OPENROUTER_API_KEY"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn supported_models(&self) -> Vec<&str> {
        SUPPORTED_MODELS.to_vec()
    }

    fn supports_model(&self, model: &str) -> bool {
        // OpenRouter routes any vendor-namespaced model id
        SUPPORTED_MODELS.contains(&model) || model.contains('/')
    }

    async fn generate_text(
        &self,
        model: &str,
        messages: &[AIMessage],
        options: &GenerateOptions,
    ) -> TrackerResult<AIResponse> {
        let candidate = format!("{}/{model}", self.name());

        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| TrackerError::ProviderNotConfigured {
                provider: self.name().to_string(),
            })?;

        let response_format = options.json_mode.then(|| ResponseFormat {
            format_type: "json_object".to_string(),
        });

        let request = OpenRouterRequest {
            model: model.to_string(),
            messages: self.convert_messages(messages),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            stop: options.stop_sequences.clone(),
            response_format,
        };

        tracing::info!(model, "calling OpenRouter API");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_transport(&candidate, &e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| classify_transport(&candidate, &e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<OpenRouterErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(
                self.name(),
                &candidate,
                status.as_u16(),
                message,
            ));
        }

        let api_response: OpenRouterResponse =
            serde_json::from_str(&body).map_err(|e| TrackerError::Unavailable {
                candidate: candidate.clone(),
                reason: format!("malformed response body: {e}"),
            })?;

        let text = api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        let usage = api_response.usage.unwrap_or_default();

        Ok(AIResponse {
            text,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            },
            model: api_response.model.unwrap_or_else(|| model.to_string()),
            provider: self.name().to_string(),
        })
    }
}

impl Default for OpenRouterProvider {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self {
            client: Client::new(),
            api_key: None,
            base_url: OPENROUTER_API_URL.to_string(),
        })
    }
}

/// Get the default OpenRouter model.
pub fn default_model() -> &'static str {
    DEFAULT_MODEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = OpenRouterProvider::default();
        assert_eq!(provider.name(), "openrouter");
    }

    #[test]
    fn test_supports_namespaced_models() {
        let provider = OpenRouterProvider::default();
        assert!(provider.supports_model("deepseek/deepseek-chat:free"));
        assert!(provider.supports_model("anthropic/claude-3.5-sonnet"));
        assert!(!provider.supports_model("gemini-2.5-flash"));
    }

    #[test]
    fn test_message_conversion() {
        let provider = OpenRouterProvider::default();
        let messages = vec![
            AIMessage::system("You are a task assistant"),
            AIMessage::user("Hello"),
        ];

        let converted = provider.convert_messages(&messages);

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, "system");
        assert_eq!(converted[1].role, "user");
    }

    #[test]
    fn test_response_parsing_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "hello"}}]}"#;
        let parsed: OpenRouterResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("hello"));
        assert!(parsed.usage.is_none());
    }
}
