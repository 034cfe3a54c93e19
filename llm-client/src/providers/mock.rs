//! Mock LLM provider for testing
//!
//! Provides a scriptable provider that records every request it receives and
//! answers from a queue of canned outcomes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

/// A recorded list of requests, shared with the test that created the mock
pub type RequestLog = Arc<Mutex<Vec<LlmRequest>>>;

/// A canned outcome for one call
enum Scripted {
    Reply(String),
    Fail(LlmError),
}

/// A mock provider that replays scripted outcomes
pub struct MockProvider {
    script: Mutex<VecDeque<Scripted>>,
    /// Response used once the script is exhausted (None = fail)
    fallback: Option<String>,
    requests: RequestLog,
}

impl MockProvider {
    /// Create a provider that always succeeds with `response`
    pub fn always_succeeds(response: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(response.to_string()),
            requests: RequestLog::default(),
        }
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: LlmError) -> Self {
        Self {
            script: Mutex::new(VecDeque::from([Scripted::Fail(error)])),
            fallback: None,
            requests: RequestLog::default(),
        }
    }

    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: LlmError, response: &str) -> Self {
        let script = (0..n)
            .map(|_| Scripted::Fail(clone_error(&error)))
            .collect();
        Self {
            script: Mutex::new(script),
            fallback: Some(response.to_string()),
            requests: RequestLog::default(),
        }
    }

    /// Create a provider that answers with `responses` in order, then repeats the last
    pub fn replies(responses: &[&str]) -> Self {
        Self {
            script: Mutex::new(
                responses
                    .iter()
                    .map(|r| Scripted::Reply(r.to_string()))
                    .collect(),
            ),
            fallback: responses.last().map(|r| r.to_string()),
            requests: RequestLog::default(),
        }
    }

    /// Handle to the requests received so far
    pub fn request_log(&self) -> RequestLog {
        Arc::clone(&self.requests)
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        let next = self.script.lock().ok().and_then(|mut s| {
            // A lone failure is sticky so always_fails keeps failing
            if s.len() == 1 && self.fallback.is_none() {
                s.front().map(|item| match item {
                    Scripted::Reply(text) => Scripted::Reply(text.clone()),
                    Scripted::Fail(err) => Scripted::Fail(clone_error(err)),
                })
            } else {
                s.pop_front()
            }
        });

        let content = match next {
            Some(Scripted::Reply(text)) => text,
            Some(Scripted::Fail(err)) => return Err(err),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LlmError::ProviderUnavailable("mock script exhausted".into()))?,
        };

        Ok(LlmResponse {
            content,
            model: "mock-model".to_string(),
            usage: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone an LlmError (needed because LlmError doesn't implement Clone)
fn clone_error(err: &LlmError) -> LlmError {
    match err {
        LlmError::ServerOverloaded { message } => LlmError::ServerOverloaded {
            message: message.clone(),
        },
        LlmError::MissingApiKey { provider, env_var } => LlmError::MissingApiKey {
            provider: provider.clone(),
            env_var: env_var.clone(),
        },
        LlmError::RateLimited { retry_after } => LlmError::RateLimited {
            retry_after: *retry_after,
        },
        LlmError::ApiError {
            message,
            status_code,
        } => LlmError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        LlmError::ProviderUnavailable(s) => LlmError::ProviderUnavailable(s.clone()),
        LlmError::ConfigError(s) => LlmError::ConfigError(s.clone()),
        LlmError::InvalidPreset(s) => LlmError::InvalidPreset(s.clone()),
        // For Io and Toml errors, we create a generic error since they can't be cloned
        LlmError::Io(_) => LlmError::ConfigError("IO error (mock)".to_string()),
        LlmError::TomlParse(_) => LlmError::ConfigError("TOML parse error (mock)".to_string()),
        LlmError::TomlSerialize(_) => {
            LlmError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds("success");

        let result = provider.complete(LlmRequest::new("test")).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let provider = MockProvider::always_fails(LlmError::ServerOverloaded {
            message: "overloaded".to_string(),
        });

        for _ in 0..3 {
            let result = provider.complete(LlmRequest::new("test")).await;
            assert!(matches!(result, Err(LlmError::ServerOverloaded { .. })));
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fails_then_succeeds() {
        let provider = MockProvider::fails_then_succeeds(
            2,
            LlmError::RateLimited { retry_after: None },
            "success",
        );

        assert!(provider.complete(LlmRequest::new("a")).await.is_err());
        assert!(provider.complete(LlmRequest::new("b")).await.is_err());

        let result = provider.complete(LlmRequest::new("c")).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_replies_in_order_and_records_requests() {
        let provider = MockProvider::replies(&["first", "second"]);
        let log = provider.request_log();

        let a = provider.complete(LlmRequest::new("one")).await.unwrap();
        let b = provider.complete(LlmRequest::new("two")).await.unwrap();
        let c = provider.complete(LlmRequest::new("three")).await.unwrap();

        assert_eq!(a.content, "first");
        assert_eq!(b.content, "second");
        assert_eq!(c.content, "second");

        let prompts: Vec<String> = log.lock().unwrap().iter().map(|r| r.prompt.clone()).collect();
        assert_eq!(prompts, vec!["one", "two", "three"]);
    }
}
