//! Grammar correction through a task-prefixed text-to-text capability.

use crate::capability::{CorrectionCapability, GenerationSettings};
use crate::error::{Result, Stage, WordsmithError};

/// Prefix the correction model was fine-tuned with.
pub const DEFAULT_TASK_PREFIX: &str = "grammar: ";

pub struct GrammarCorrector<'a> {
    capability: &'a dyn CorrectionCapability,
    prefix: String,
    settings: GenerationSettings,
}

impl<'a> GrammarCorrector<'a> {
    pub fn new(capability: &'a dyn CorrectionCapability, settings: GenerationSettings) -> Self {
        Self {
            capability,
            prefix: DEFAULT_TASK_PREFIX.to_string(),
            settings,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Return a grammar-corrected rewrite of `text`.
    pub async fn correct(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(WordsmithError::Validation(
                "Please enter text to correct.".to_string(),
            ));
        }

        let input = format!("{}{}", self.prefix, text);
        log::debug!(
            "Correcting {} chars with {} (num_beams={}, min_length={})",
            text.len(),
            self.capability.name(),
            self.settings.num_beams,
            self.settings.min_length
        );

        self.capability
            .correct(&input, &self.settings)
            .await
            .map_err(|e| WordsmithError::capability(Stage::Correction, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoCorrector {
        inputs: Mutex<Vec<(String, GenerationSettings)>>,
        fail: bool,
    }

    #[async_trait]
    impl CorrectionCapability for EchoCorrector {
        async fn correct(
            &self,
            prefixed_text: &str,
            settings: &GenerationSettings,
        ) -> std::result::Result<String, CapabilityError> {
            self.inputs
                .lock()
                .unwrap()
                .push((prefixed_text.to_string(), *settings));
            if self.fail {
                return Err(CapabilityError::EmptyOutput);
            }
            Ok("He goes home.".to_string())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_correct_prefixes_input() {
        let capability = EchoCorrector::default();
        let corrector = GrammarCorrector::new(&capability, GenerationSettings::default());

        let corrected = corrector.correct("he go home").await.unwrap();
        assert_eq!(corrected, "He goes home.");

        let inputs = capability.inputs.lock().unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].0, "grammar: he go home");
        assert_eq!(inputs[0].1.num_beams, 5);
        assert_eq!(inputs[0].1.min_length, 1);
    }

    #[tokio::test]
    async fn test_custom_prefix() {
        let capability = EchoCorrector::default();
        let corrector =
            GrammarCorrector::new(&capability, GenerationSettings::default()).with_prefix("fix: ");

        corrector.correct("teh cat").await.unwrap();
        assert_eq!(capability.inputs.lock().unwrap()[0].0, "fix: teh cat");
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let capability = EchoCorrector::default();
        let corrector = GrammarCorrector::new(&capability, GenerationSettings::default());

        let result = corrector.correct("  \n ").await;
        assert!(matches!(result, Err(WordsmithError::Validation(_))));
        assert!(capability.inputs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_surfaced() {
        let capability = EchoCorrector {
            fail: true,
            ..EchoCorrector::default()
        };
        let corrector = GrammarCorrector::new(&capability, GenerationSettings::default());

        let err = corrector.correct("he go home").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error during grammar correction: model returned an empty response"
        );
    }
}
