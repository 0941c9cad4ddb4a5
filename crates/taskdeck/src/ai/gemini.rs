//! Google Gemini provider implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{TrackerError, TrackerResult};

use super::provider::{
    classify_status, classify_transport, AIMessage, AIResponse, AIRole, GenerateOptions,
    GenerationProvider, TokenUsage,
};

/// Gemini API base endpoint
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Supported Gemini models
const SUPPORTED_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// Gemini API content part
#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

/// Gemini API content block
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

/// Gemini API generation config
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
}

/// Gemini API request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

/// Gemini API response candidate
#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

/// Gemini API usage metadata
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Gemini API response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
}

/// Gemini API error
#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
}

/// Gemini API error response
#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiApiError,
}

/// Google Gemini provider.
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    /// Create from environment variable.
    pub fn from_env() -> TrackerResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_API_URL.to_string(),
        })
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Convert messages to Gemini format, extracting the system instruction.
    fn convert_messages(
        &self,
        messages: &[AIMessage],
    ) -> (Option<GeminiContent>, Vec<GeminiContent>) {
        let mut system = None;
        let mut converted = Vec::new();

        for msg in messages {
            match msg.role {
                AIRole::System => {
                    // Gemini uses a separate systemInstruction field
                    system = Some(GeminiContent {
                        role: None,
                        parts: vec![GeminiPart {
                            text: msg.content.clone(),
                        }],
                    });
                }
                AIRole::User => converted.push(GeminiContent {
                    role: Some("user".to_string()),
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                }),
                AIRole::Assistant => converted.push(GeminiContent {
                    role: Some("model".to_string()),
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                }),
            }
        }

        (system, converted)
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn api_key_env_var(&self) -> &'static str {
        "GEMINI_API_KEY"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn supported_models(&self) -> Vec<&str> {
        SUPPORTED_MODELS.to_vec()
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

        let (system_instruction, contents) = self.convert_messages(messages);

        let request = GeminiRequest {
            contents,
            system_instruction,
            generation_config: GeminiGenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
                stop_sequences: options.stop_sequences.clone(),
                response_mime_type: options
                    .json_mode
                    .then(|| "application/json".to_string()),
            },
        };

        tracing::info!(model, "calling Gemini API");

        let url = format!("{}/{model}:generateContent", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
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
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(classify_status(
                self.name(),
                &candidate,
                status.as_u16(),
                message,
            ));
        }

        let api_response: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| TrackerError::Unavailable {
                candidate: candidate.clone(),
                reason: format!("malformed response body: {e}"),
            })?;

        // Concatenate all text parts of the first candidate
        let text = api_response
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default();

        let usage = api_response.usage_metadata.unwrap_or_default();

        Ok(AIResponse {
            text,
            usage: TokenUsage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
                total_tokens: usage.total_token_count,
            },
            model: api_response.model_version.unwrap_or_else(|| model.to_string()),
            provider: self.name().to_string(),
        })
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self {
            client: Client::new(),
            api_key: None,
            base_url: GEMINI_API_URL.to_string(),
        })
    }
}

/// Get the default Gemini model.
pub fn default_model() -> &'static str {
    DEFAULT_MODEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        let provider = GeminiProvider::default();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn test_supported_models() {
        let provider = GeminiProvider::default();
        assert!(provider.supports_model("gemini-2.5-flash"));
        assert!(provider.supports_model("gemini-1.5-pro"));
        assert!(!provider.supports_model("gpt-4o"));
    }

    #[test]
    fn test_message_conversion() {
        let provider = GeminiProvider::default();
        let messages = vec![
            AIMessage::system("You are a task assistant"),
            AIMessage::user("Hello"),
            AIMessage::assistant("Hi there!"),
        ];

        let (system, converted) = provider.convert_messages(&messages);

        assert!(system.is_some());
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role.as_deref(), Some("user"));
        assert_eq!(converted[1].role.as_deref(), Some("model"));
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "[\"a\",\"b\"]"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15},
            "modelVersion": "gemini-2.5-flash"
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.usage_metadata.unwrap().total_token_count, 15);
    }
}
