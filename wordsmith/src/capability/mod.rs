//! Model capabilities: the summarization and correction calls the pipelines
//! are built on, plus the backends that implement them.

pub mod huggingface;
pub mod llm;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::WordsmithConfig;
use crate::error::CapabilityError;

pub use huggingface::HuggingFaceClient;
pub use llm::LlmBackend;

/// Output length bounds for one summarization call, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthBounds {
    pub max_words: usize,
    pub min_words: usize,
}

impl LengthBounds {
    pub fn new(max_words: usize, min_words: usize) -> Self {
        Self {
            max_words,
            min_words,
        }
    }

    /// Reject bounds no model can satisfy.
    pub fn validate(&self) -> Result<(), CapabilityError> {
        if self.max_words == 0 || self.max_words < self.min_words {
            return Err(CapabilityError::InvalidBounds {
                max: self.max_words,
                min: self.min_words,
            });
        }
        Ok(())
    }
}

/// Generation settings for the correction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Beam search width
    pub num_beams: u32,
    /// Minimum output length in tokens
    pub min_length: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            num_beams: 5,
            min_length: 1,
        }
    }
}

/// Abstractive summarization.
#[async_trait]
pub trait SummarizationCapability: Send + Sync {
    /// Summarize `text` to a length within `bounds`.
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, CapabilityError>;

    /// Backend name for display
    fn name(&self) -> &str;
}

/// Text-to-text correction of task-prefixed input.
#[async_trait]
pub trait CorrectionCapability: Send + Sync {
    async fn correct(
        &self,
        prefixed_text: &str,
        settings: &GenerationSettings,
    ) -> Result<String, CapabilityError>;

    /// Backend name for display
    fn name(&self) -> &str;
}

/// Supported capability backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted seq2seq models on the Hugging Face Inference API
    #[default]
    Huggingface,
    /// A chat LLM selected from an llm-client preset
    Llm,
}

/// A constructed backend; one value serves both capabilities.
pub enum Backend {
    HuggingFace(HuggingFaceClient),
    Llm(LlmBackend),
}

impl Backend {
    /// Create the backend of the given kind.
    ///
    /// `preset` overrides `llm_preset` from config for the llm backend.
    pub fn create(
        kind: BackendKind,
        config: &WordsmithConfig,
        preset: Option<&str>,
    ) -> anyhow::Result<Self> {
        match kind {
            BackendKind::Huggingface => Ok(Self::HuggingFace(HuggingFaceClient::new(
                &config.huggingface,
            )?)),
            BackendKind::Llm => {
                let llm_config = llm_client::Config::load()?;
                let preset = preset.or(config.llm_preset.as_deref());
                Ok(Self::Llm(LlmBackend::from_config(&llm_config, preset)?))
            }
        }
    }

    pub fn summarization(&self) -> &dyn SummarizationCapability {
        match self {
            Self::HuggingFace(client) => client,
            Self::Llm(backend) => backend,
        }
    }

    pub fn correction(&self) -> &dyn CorrectionCapability {
        match self {
            Self::HuggingFace(client) => client,
            Self::Llm(backend) => backend,
        }
    }
}
