//! wordsmith configuration management.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::capability::{BackendKind, GenerationSettings};
use crate::grammar::DEFAULT_TASK_PREFIX;
use crate::summarizer::{RATIO_PERCENT_RANGE, SummarizerOptions, TargetRatio};
use crate::text::DEFAULT_CHUNK_SIZE;

const DEFAULT_RATIO_PERCENT: u8 = 30;
const DEFAULT_HF_BASE_URL: &str = "https://router.huggingface.co/hf-inference/models";
const DEFAULT_SUMMARIZATION_MODEL: &str = "facebook/bart-large-cnn";
const DEFAULT_CORRECTION_MODEL: &str = "vennify/t5-base-grammar-correction";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsmithConfig {
    /// Which capability backend to call
    #[serde(default)]
    pub backend: BackendKind,

    /// Default summary retention ratio, in percent (10-50)
    #[serde(default = "default_ratio_percent")]
    pub ratio_percent: u8,

    /// llm-client preset for the llm backend. None uses the preset default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_preset: Option<String>,

    #[serde(default)]
    pub summarizer: SummarizerSettings,

    #[serde(default)]
    pub grammar: GrammarSettings,

    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

/// Chunking and recombination thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerSettings {
    /// Words per chunk for long texts
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Texts with at most this many words are summarized in one call
    #[serde(default = "default_short_text_threshold")]
    pub short_text_threshold: usize,

    /// Combined chunk summaries longer than this are re-summarized
    #[serde(default = "default_recombine_threshold")]
    pub recombine_threshold: usize,

    /// Return the combined chunk summaries when re-summarization fails
    #[serde(default)]
    pub keep_combined_on_failure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarSettings {
    /// Task prefix the correction model expects
    #[serde(default = "default_task_prefix")]
    pub prefix: String,

    #[serde(default = "default_num_beams")]
    pub num_beams: u32,

    #[serde(default = "default_min_length")]
    pub min_length: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    /// API token (optional, can use HF_TOKEN instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_hf_base_url")]
    pub base_url: String,

    #[serde(default = "default_summarization_model")]
    pub summarization_model: String,

    #[serde(default = "default_correction_model")]
    pub correction_model: String,

    /// Per-request timeout; cold models can take a while to load
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_ratio_percent() -> u8 {
    DEFAULT_RATIO_PERCENT
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_short_text_threshold() -> usize {
    200
}

fn default_recombine_threshold() -> usize {
    50
}

fn default_task_prefix() -> String {
    DEFAULT_TASK_PREFIX.to_string()
}

fn default_num_beams() -> u32 {
    GenerationSettings::default().num_beams
}

fn default_min_length() -> u32 {
    GenerationSettings::default().min_length
}

fn default_hf_base_url() -> String {
    DEFAULT_HF_BASE_URL.to_string()
}

fn default_summarization_model() -> String {
    DEFAULT_SUMMARIZATION_MODEL.to_string()
}

fn default_correction_model() -> String {
    DEFAULT_CORRECTION_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for WordsmithConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            ratio_percent: default_ratio_percent(),
            llm_preset: None,
            summarizer: SummarizerSettings::default(),
            grammar: GrammarSettings::default(),
            huggingface: HuggingFaceConfig::default(),
        }
    }
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            short_text_threshold: default_short_text_threshold(),
            recombine_threshold: default_recombine_threshold(),
            keep_combined_on_failure: false,
        }
    }
}

impl Default for GrammarSettings {
    fn default() -> Self {
        Self {
            prefix: default_task_prefix(),
            num_beams: default_num_beams(),
            min_length: default_min_length(),
        }
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_hf_base_url(),
            summarization_model: default_summarization_model(),
            correction_model: default_correction_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SummarizerSettings {
    /// Orchestrator options; recombination is on unless the caller turns it off.
    pub fn options(&self) -> SummarizerOptions {
        SummarizerOptions {
            chunk_size: self.chunk_size,
            short_text_threshold: self.short_text_threshold,
            recombine_threshold: self.recombine_threshold,
            keep_combined_on_failure: self.keep_combined_on_failure,
            ..SummarizerOptions::default()
        }
    }
}

impl GrammarSettings {
    pub fn generation(&self) -> GenerationSettings {
        GenerationSettings {
            num_beams: self.num_beams,
            min_length: self.min_length,
        }
    }
}

impl WordsmithConfig {
    /// Get the config file path: ~/.config/wordsmith/wordsmith.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("wordsmith")
            .join("wordsmith.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: WordsmithConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check values serde can't
    pub fn validate(&self) -> Result<()> {
        if !RATIO_PERCENT_RANGE.contains(&self.ratio_percent) {
            bail!(
                "ratio_percent must be between {} and {}, got {}",
                RATIO_PERCENT_RANGE.start(),
                RATIO_PERCENT_RANGE.end(),
                self.ratio_percent
            );
        }
        if self.summarizer.chunk_size == 0 {
            bail!("summarizer.chunk_size must be positive");
        }
        // Recombination input must leave room for a non-empty summary
        if self.summarizer.recombine_threshold == 0 {
            bail!("summarizer.recombine_threshold must be at least 1");
        }
        Ok(())
    }

    /// Default target ratio from `ratio_percent`
    pub fn default_ratio(&self) -> Result<TargetRatio> {
        Ok(TargetRatio::from_percent(self.ratio_percent)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WordsmithConfig::default();
        assert_eq!(config.backend, BackendKind::Huggingface);
        assert_eq!(config.ratio_percent, 30);
        assert_eq!(config.summarizer.chunk_size, 300);
        assert_eq!(config.summarizer.short_text_threshold, 200);
        assert_eq!(config.summarizer.recombine_threshold, 50);
        assert!(!config.summarizer.keep_combined_on_failure);
        assert_eq!(config.grammar.prefix, "grammar: ");
        assert_eq!(config.huggingface.summarization_model, "facebook/bart-large-cnn");
        assert!(config.llm_preset.is_none());
    }

    #[test]
    fn test_config_path() {
        let path = WordsmithConfig::config_path().unwrap();
        assert!(path.ends_with("wordsmith/wordsmith.toml"));
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
backend = "llm"
ratio_percent = 20
llm_preset = "anthropic-haiku"

[summarizer]
chunk_size = 250
keep_combined_on_failure = true

[huggingface]
timeout_secs = 30
"#;
        let config: WordsmithConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend, BackendKind::Llm);
        assert_eq!(config.ratio_percent, 20);
        assert_eq!(config.llm_preset.as_deref(), Some("anthropic-haiku"));
        assert_eq!(config.summarizer.chunk_size, 250);
        assert_eq!(config.summarizer.short_text_threshold, 200);
        assert!(config.summarizer.keep_combined_on_failure);
        assert_eq!(config.huggingface.timeout_secs, 30);
        assert_eq!(
            config.huggingface.correction_model,
            "vennify/t5-base-grammar-correction"
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config: WordsmithConfig = toml::from_str("").unwrap();
        assert_eq!(config.ratio_percent, 30);
        assert_eq!(config.grammar.num_beams, 5);
        assert_eq!(config.grammar.min_length, 1);
    }

    #[test]
    fn test_validate_rejects_out_of_range_ratio() {
        let config = WordsmithConfig {
            ratio_percent: 80,
            ..WordsmithConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = WordsmithConfig::default();
        config.summarizer.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_recombine_threshold() {
        let mut config = WordsmithConfig::default();
        config.summarizer.recombine_threshold = 0;
        assert!(config.validate().is_err());

        config.summarizer.recombine_threshold = 1;
        assert!(config.validate().is_ok());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordsmith.toml");
        std::fs::write(&path, "[summarizer]\nrecombine_threshold = 0\n").unwrap();
        assert!(WordsmithConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wordsmith.toml");

        let mut config = WordsmithConfig::default();
        config.backend = BackendKind::Llm;
        config.summarizer.recombine_threshold = 80;
        config.save_to(&path).unwrap();

        let loaded = WordsmithConfig::load_from(&path).unwrap();
        assert_eq!(loaded.backend, BackendKind::Llm);
        assert_eq!(loaded.summarizer.recombine_threshold, 80);
    }

    #[test]
    fn test_settings_conversion() {
        let config = WordsmithConfig::default();
        let options = config.summarizer.options();
        assert_eq!(options.chunk_size, 300);
        assert!(options.recombine);
        assert_eq!(config.grammar.generation(), GenerationSettings::default());
        assert!((config.default_ratio().unwrap().value() - 0.3).abs() < f64::EPSILON);
    }
}
