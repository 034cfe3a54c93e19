use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{LlmError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default preset to use when no --model flag is provided (fallback)
    #[serde(default = "default_preset")]
    pub default_preset: String,

    /// Per-program default presets (program name -> preset name)
    #[serde(default)]
    pub defaults: HashMap<String, String>,

    /// Named model presets for quick access
    #[serde(default)]
    pub presets: HashMap<String, ModelPreset>,

    /// Provider-specific configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_preset() -> String {
    "ollama".to_string()
}

/// A named model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPreset {
    /// Provider identifier (anthropic, openrouter, cerebras, ollama)
    pub provider: String,

    /// Model name/identifier for the provider
    pub model: String,
}

impl ModelPreset {
    pub fn new(provider: &str, model: &str) -> Self {
        Self {
            provider: provider.to_string(),
            model: model.to_string(),
        }
    }
}

/// Provider-specific configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (optional, can use env var instead)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom base URL (for API providers)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults
    /// when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            std::env::var("HOME").map_err(|_| LlmError::ConfigError("HOME not set".into()))?;
        Ok(PathBuf::from(home).join(".config/wordsmith/llm.toml"))
    }

    /// Get a preset by name
    pub fn get_preset(&self, name: &str) -> Result<&ModelPreset> {
        self.presets
            .get(name)
            .ok_or_else(|| LlmError::InvalidPreset(name.to_string()))
    }

    /// Get the default preset name for a specific program
    ///
    /// Falls back to `default_preset` if no program-specific default is set.
    pub fn get_default_for_program(&self, program: &str) -> &str {
        self.defaults
            .get(program)
            .map(String::as_str)
            .unwrap_or(&self.default_preset)
    }

    /// Get provider config by provider name
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get(provider)
    }
}

impl Default for Config {
    fn default() -> Self {
        let presets = HashMap::from([
            ("ollama".to_string(), ModelPreset::new("ollama", "llama3.2")),
            (
                "anthropic-haiku".to_string(),
                ModelPreset::new("anthropic", "claude-3-5-haiku-latest"),
            ),
            (
                "cerebras-llama".to_string(),
                ModelPreset::new("cerebras", "llama3.1-8b"),
            ),
        ]);

        Self {
            default_preset: default_preset(),
            defaults: HashMap::new(),
            presets,
            providers: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_preset, "ollama");

        let preset = config.get_preset("ollama").unwrap();
        assert_eq!(preset.provider, "ollama");
        assert_eq!(preset.model, "llama3.2");
        assert!(config.presets.contains_key("anthropic-haiku"));
    }

    #[test]
    fn test_invalid_preset() {
        let config = Config::default();
        let result = config.get_preset("nonexistent");
        assert!(matches!(result, Err(LlmError::InvalidPreset(name)) if name == "nonexistent"));
    }

    #[test]
    fn test_config_path() {
        let path = Config::config_path().unwrap();
        assert!(path.ends_with(".config/wordsmith/llm.toml"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
[presets.local]
provider = "ollama"
model = "mistral"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_preset, "ollama");
        assert_eq!(
            config.get_preset("local").unwrap(),
            &ModelPreset::new("ollama", "mistral")
        );
        assert!(config.providers.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("llm.toml");

        let mut config = Config::default();
        config
            .defaults
            .insert("wordsmith".to_string(), "anthropic-haiku".to_string());
        config.providers.insert(
            "ollama".to_string(),
            ProviderConfig {
                api_key: None,
                base_url: Some("http://gpu-box:11434/v1".to_string()),
            },
        );
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.get_default_for_program("wordsmith"), "anthropic-haiku");
        assert_eq!(
            loaded
                .get_provider_config("ollama")
                .and_then(|c| c.base_url.as_deref()),
            Some("http://gpu-box:11434/v1")
        );
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_preset, "ollama");
    }

    #[test]
    fn test_get_default_for_program() {
        let mut config = Config::default();
        assert_eq!(config.get_default_for_program("wordsmith"), "ollama");

        config
            .defaults
            .insert("wordsmith".to_string(), "cerebras-llama".to_string());
        assert_eq!(config.get_default_for_program("wordsmith"), "cerebras-llama");

        // Unknown program should still fall back
        assert_eq!(config.get_default_for_program("other"), "ollama");
    }
}
