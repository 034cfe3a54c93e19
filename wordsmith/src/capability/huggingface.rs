//! Hugging Face Inference API backend
//!
//! Calls hosted seq2seq models directly: a summarization model for
//! `SummarizationCapability` and a text2text model for `CorrectionCapability`.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{CorrectionCapability, GenerationSettings, LengthBounds, SummarizationCapability};
use crate::config::HuggingFaceConfig;
use crate::error::CapabilityError;

pub const TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Client for the Hugging Face Inference API
pub struct HuggingFaceClient {
    base_url: String,
    token: String,
    summarization_model: String,
    correction_model: String,
    client: Client,
}

impl HuggingFaceClient {
    /// Create a client from config, reading the token from `HF_TOKEN` when
    /// the config has none.
    pub fn new(config: &HuggingFaceConfig) -> Result<Self, CapabilityError> {
        let token = match &config.api_token {
            Some(token) => token.clone(),
            None => std::env::var(TOKEN_ENV_VAR).map_err(|_| CapabilityError::MissingToken {
                env_var: TOKEN_ENV_VAR.to_string(),
            })?,
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CapabilityError::Api {
                message: format!("Failed to build HTTP client: {}", e),
                status_code: None,
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
            summarization_model: config.summarization_model.clone(),
            correction_model: config.correction_model.clone(),
            client,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn infer<P, T>(
        &self,
        model: &str,
        request: &InferenceRequest<'_, P>,
    ) -> Result<T, CapabilityError>
    where
        P: Serialize + Sync,
        T: DeserializeOwned,
    {
        log::debug!("POST {} ({} chars)", self.model_url(model), request.inputs.len());

        let response = self
            .client
            .post(self.model_url(model))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| CapabilityError::Api {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CapabilityError::Api {
                message: error_message(&error_text),
                status_code: Some(status.as_u16()),
            });
        }

        response.json().await.map_err(|e| CapabilityError::Api {
            message: format!("Failed to parse response: {}", e),
            status_code: None,
        })
    }
}

// Inference API request/response types

#[derive(Debug, Serialize)]
struct InferenceRequest<'a, P> {
    inputs: &'a str,
    parameters: P,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Serialize)]
struct SummarizationParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Debug, Serialize)]
struct Text2TextParameters {
    num_beams: u32,
    min_length: u32,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct GeneratedOutput {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl<'a, P> InferenceRequest<'a, P> {
    fn new(inputs: &'a str, parameters: P) -> Self {
        Self {
            inputs,
            parameters,
            options: InferenceOptions {
                wait_for_model: true,
            },
        }
    }
}

/// Pull the server's message out of an error body, or return the body as is.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

/// Take the first non-empty output text.
fn first_text(texts: impl IntoIterator<Item = String>) -> Result<String, CapabilityError> {
    texts
        .into_iter()
        .next()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(CapabilityError::EmptyOutput)
}

#[async_trait]
impl SummarizationCapability for HuggingFaceClient {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, CapabilityError> {
        bounds.validate()?;

        let request = InferenceRequest::new(
            text,
            SummarizationParameters {
                max_length: bounds.max_words,
                min_length: bounds.min_words,
                do_sample: false,
            },
        );
        let outputs: Vec<SummaryOutput> = self.infer(&self.summarization_model, &request).await?;
        first_text(outputs.into_iter().map(|o| o.summary_text))
    }

    fn name(&self) -> &str {
        &self.summarization_model
    }
}

#[async_trait]
impl CorrectionCapability for HuggingFaceClient {
    async fn correct(
        &self,
        prefixed_text: &str,
        settings: &GenerationSettings,
    ) -> Result<String, CapabilityError> {
        let request = InferenceRequest::new(
            prefixed_text,
            Text2TextParameters {
                num_beams: settings.num_beams,
                min_length: settings.min_length,
            },
        );
        let outputs: Vec<GeneratedOutput> = self.infer(&self.correction_model, &request).await?;
        first_text(outputs.into_iter().map(|o| o.generated_text))
    }

    fn name(&self) -> &str {
        &self.correction_model
    }
}
