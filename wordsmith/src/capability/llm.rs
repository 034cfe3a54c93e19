//! Chat-LLM backend
//!
//! Implements both capabilities on top of an `llm-client` provider.

use anyhow::Context;
use async_trait::async_trait;
use llm_client::{Config, LlmProvider, LlmRequest, get_provider};

use super::{CorrectionCapability, GenerationSettings, LengthBounds, SummarizationCapability};
use crate::error::CapabilityError;

/// Program name used for per-program preset defaults
const PROGRAM: &str = "wordsmith";

const SUMMARY_SYSTEM_PROMPT: &str = "You are an abstractive summarizer. \
Rewrite the user's text as a faithful, fluent summary in your own words. \
Do not add facts that are not in the text. \
Return ONLY the summary, no preamble, no quotes.";

const CORRECTION_SYSTEM_PROMPT: &str = "You are a grammar correction model. \
The input starts with a task prefix followed by the text to correct. \
Fix grammar, spelling, and punctuation while keeping the wording and meaning \
as close to the original as possible. \
Return ONLY the corrected text, without the task prefix and without explanation.";

/// Capabilities backed by a chat LLM
pub struct LlmBackend {
    provider: Box<dyn LlmProvider>,
}

impl LlmBackend {
    /// Create a backend from an llm-client preset
    ///
    /// If preset_name is None, uses the default preset from config.
    pub fn from_config(config: &Config, preset_name: Option<&str>) -> anyhow::Result<Self> {
        let preset_name = preset_name.unwrap_or_else(|| config.get_default_for_program(PROGRAM));
        let preset = config
            .get_preset(preset_name)
            .context(format!("Unknown preset: {}", preset_name))?;

        let provider_config = config.get_provider_config(&preset.provider);
        let provider = get_provider(preset, provider_config).context(format!(
            "Failed to initialize provider '{}' for preset '{}'",
            preset.provider, preset_name
        ))?;
        provider.is_available()?;

        log::debug!(
            "Using LLM provider: {} (model: {})",
            provider.name(),
            preset.model
        );

        Ok(Self::new(provider))
    }

    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    async fn complete(&self, request: LlmRequest) -> Result<String, CapabilityError> {
        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            log::debug!(
                "Tokens: {} in, {} out",
                usage.input_tokens,
                usage.output_tokens
            );
        }

        let content = response.content.trim();
        if content.is_empty() {
            return Err(CapabilityError::EmptyOutput);
        }
        Ok(content.to_string())
    }
}

/// Token budget for a reply of at most `max_words` words.
fn token_budget(max_words: usize) -> u32 {
    let words = u32::try_from(max_words).unwrap_or(u32::MAX / 2);
    words.saturating_mul(2).saturating_add(32)
}

fn summary_instructions(bounds: LengthBounds) -> String {
    format!(
        "{}\n\nThe summary must be between {} and {} words long.",
        SUMMARY_SYSTEM_PROMPT, bounds.min_words, bounds.max_words
    )
}

#[async_trait]
impl SummarizationCapability for LlmBackend {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, CapabilityError> {
        bounds.validate()?;

        let request = LlmRequest::new(text)
            .with_system_prompt(summary_instructions(bounds))
            .with_max_tokens(token_budget(bounds.max_words))
            .with_temperature(0.0);

        self.complete(request).await
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

#[async_trait]
impl CorrectionCapability for LlmBackend {
    async fn correct(
        &self,
        prefixed_text: &str,
        settings: &GenerationSettings,
    ) -> Result<String, CapabilityError> {
        // Chat APIs expose no beam search; greedy decoding is the closest match
        log::debug!(
            "Ignoring num_beams={} for chat provider {}",
            settings.num_beams,
            self.provider.name()
        );

        let request = LlmRequest::new(prefixed_text)
            .with_system_prompt(CORRECTION_SYSTEM_PROMPT)
            .with_temperature(0.0);

        self.complete(request).await
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
