//! Error types for the summarization and correction pipelines.

use std::fmt;
use thiserror::Error;

/// Failure of an external model capability.
#[derive(Error, Debug)]
pub enum CapabilityError {
    #[error("invalid length bounds: max_length={max} must be positive and at least min_length={min}")]
    InvalidBounds { max: usize, min: usize },

    #[error("model returned an empty response")]
    EmptyOutput,

    #[error("API token not found. Set {env_var} environment variable or add it to wordsmith.toml.")]
    MissingToken { env_var: String },

    #[error("API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error(transparent)]
    Llm(#[from] llm_client::LlmError),
}

/// The pipeline step whose capability call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ShortText,
    Recombination,
    Correction,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ShortText => "short-text summarization",
            Self::Recombination => "re-summarization",
            Self::Correction => "grammar correction",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum WordsmithError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error("Error during {stage}: {source}")]
    Capability {
        stage: Stage,
        #[source]
        source: CapabilityError,
    },
}

impl WordsmithError {
    pub fn capability(stage: Stage, source: CapabilityError) -> Self {
        Self::Capability { stage, source }
    }
}

pub type Result<T> = std::result::Result<T, WordsmithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_error_message_names_stage() {
        let err = WordsmithError::capability(
            Stage::Recombination,
            CapabilityError::Api {
                message: "model is loading".to_string(),
                status_code: Some(503),
            },
        );
        assert_eq!(
            err.to_string(),
            "Error during re-summarization: API error (HTTP 503): model is loading"
        );
    }

    #[test]
    fn test_stage_labels_read_as_phrases() {
        let err = WordsmithError::capability(Stage::ShortText, CapabilityError::EmptyOutput);
        assert_eq!(
            err.to_string(),
            "Error during short-text summarization: model returned an empty response"
        );
        assert_eq!(Stage::Correction.to_string(), "grammar correction");
    }

    #[test]
    fn test_invalid_bounds_message() {
        let err = CapabilityError::InvalidBounds { max: 10, min: 20 };
        assert!(err.to_string().contains("max_length=10"));
        assert!(err.to_string().contains("min_length=20"));
    }
}
