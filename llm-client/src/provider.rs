use async_trait::async_trait;

use crate::error::Result;

/// Request to send to an LLM provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LlmRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Create a request with only a user prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Trait for LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Execute a completion request
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Get the provider name for display
    fn name(&self) -> &'static str;

    /// Check if the provider is available (API key set, server reachable, etc.)
    fn is_available(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = LlmRequest::new("Summarize this")
            .with_system_prompt("You are terse")
            .with_max_tokens(128)
            .with_temperature(0.0);

        assert_eq!(request.prompt, "Summarize this");
        assert_eq!(request.system_prompt.as_deref(), Some("You are terse"));
        assert_eq!(request.max_tokens, Some(128));
        assert_eq!(request.temperature, Some(0.0));
    }

    #[test]
    fn test_request_defaults() {
        let request = LlmRequest::new("hi");
        assert!(request.system_prompt.is_none());
        assert!(request.max_tokens.is_none());
        assert!(request.temperature.is_none());
    }
}
