//! LLM provider implementations

mod anthropic;
pub mod mock;
mod openai_compatible;

pub use anthropic::AnthropicProvider;
pub use mock::MockProvider;
pub use openai_compatible::OpenAICompatibleProvider;

use crate::config::{ModelPreset, ProviderConfig};
use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenRouter,
    Cerebras,
    Ollama,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openrouter" => Ok(Self::OpenRouter),
            "cerebras" => Ok(Self::Cerebras),
            "ollama" => Ok(Self::Ollama),
            _ => Err(LlmError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::Cerebras => Some("CEREBRAS_API_KEY"),
            Self::Ollama => None,
        }
    }
}

/// Create a provider instance from a preset and optional config
pub fn get_provider(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn LlmProvider>> {
    let kind = ProviderKind::from_str(&preset.provider)?;
    let base_url = provider_config.and_then(|c| c.base_url.as_deref());

    match kind {
        ProviderKind::Anthropic => {
            let api_key = get_api_key(provider_config, "ANTHROPIC_API_KEY", "Anthropic")?;
            Ok(Box::new(AnthropicProvider::new(
                &preset.model,
                api_key,
                base_url,
            )?))
        }
        ProviderKind::OpenRouter => {
            let api_key = get_api_key(provider_config, "OPENROUTER_API_KEY", "OpenRouter")?;
            Ok(Box::new(OpenAICompatibleProvider::openrouter(
                &preset.model,
                api_key,
            )?))
        }
        ProviderKind::Cerebras => {
            let api_key = get_api_key(provider_config, "CEREBRAS_API_KEY", "Cerebras")?;
            Ok(Box::new(OpenAICompatibleProvider::cerebras(
                &preset.model,
                api_key,
            )?))
        }
        ProviderKind::Ollama => Ok(Box::new(OpenAICompatibleProvider::ollama(
            &preset.model,
            base_url,
        )?)),
    }
}

/// Get API key from config or environment variable
fn get_api_key(
    config: Option<&ProviderConfig>,
    env_var: &str,
    provider_name: &str,
) -> Result<String> {
    // Check config first
    if let Some(key) = config.and_then(|c| c.api_key.clone()) {
        return Ok(key);
    }

    // Fall back to environment variable
    std::env::var(env_var).map_err(|_| LlmError::MissingApiKey {
        provider: provider_name.to_string(),
        env_var: env_var.to_string(),
    })
}
