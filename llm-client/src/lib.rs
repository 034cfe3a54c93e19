//! LLM client library for the wordsmith workspace
//!
//! Provides a unified interface for chat-style LLM providers:
//! - Anthropic API (direct)
//! - OpenRouter (multi-model access)
//! - Cerebras (fast Llama inference)
//! - Ollama (local models, no API key)

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::{Config, ModelPreset, ProviderConfig};
pub use error::{LlmError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::{MockProvider, ProviderKind, get_provider};
