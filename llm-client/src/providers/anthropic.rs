//! Anthropic API provider
//!
//! Direct HTTP implementation for the Anthropic Messages API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Provider for direct Anthropic API calls
pub struct AnthropicProvider {
    model: String,
    api_key: String,
    endpoint: String,
    client: Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// `base_url` overrides the public API root (e.g. for a proxy).
    pub fn new(model: &str, api_key: String, base_url: Option<&str>) -> Result<Self> {
        let client = Client::new();
        let base_url = base_url.unwrap_or(ANTHROPIC_API_URL).trim_end_matches('/');

        Ok(Self {
            model: model.to_string(),
            api_key,
            endpoint: format!("{}/messages", base_url),
            client,
        })
    }
}

// Anthropic API request/response types

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: ResponseUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Parse the `retry-after` header, when the server sends one in seconds
pub(crate) fn retry_after_secs(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let messages = vec![Message {
            role: "user".to_string(),
            content: request.prompt.clone(),
        }];

        let api_request = MessagesRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(4096),
            system: request.system_prompt.clone(),
            temperature: request.temperature,
            messages,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&api_request)
            .send()
            .await
            .map_err(|e| LlmError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited {
                retry_after: retry_after_secs(&response),
            });
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    error_response.error.message
                } else {
                    error_text
                };

            // Handle 503 (server overloaded) separately for retry logic
            if status.as_u16() == 503 {
                return Err(LlmError::ServerOverloaded { message });
            }

            return Err(LlmError::ApiError {
                message,
                status_code: Some(status.as_u16()),
            });
        }

        let api_response: MessagesResponse =
            response.json().await.map_err(|e| LlmError::ApiError {
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        let content = api_response
            .content
            .first()
            .map(|c| c.text.clone())
            .unwrap_or_default();

        let usage = Some(TokenUsage {
            input_tokens: api_response.usage.input_tokens,
            output_tokens: api_response.usage.output_tokens,
        });

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        "Anthropic API"
    }

    fn is_available(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey {
                provider: "Anthropic".to_string(),
                env_var: "ANTHROPIC_API_KEY".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_override() {
        let provider = AnthropicProvider::new(
            "claude-3-5-haiku-latest",
            "key".into(),
            Some("http://proxy/v1/"),
        )
        .unwrap();
        assert_eq!(provider.endpoint, "http://proxy/v1/messages");

        let provider =
            AnthropicProvider::new("claude-3-5-haiku-latest", "key".into(), None).unwrap();
        assert_eq!(provider.endpoint, "https://api.anthropic.com/v1/messages");
    }

    #[test]
    fn test_request_serialization_includes_temperature() {
        let request = MessagesRequest {
            model: "m".to_string(),
            max_tokens: 64,
            system: None,
            temperature: Some(0.0),
            messages: vec![Message {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_empty_key_is_unavailable() {
        let provider = AnthropicProvider::new("m", "  ".into(), None).unwrap();
        assert!(provider.is_available().is_err());
    }
}
