//! Model client: a thin retrying wrapper around a text-completion endpoint.
//!
//! The client is agnostic about what comes back. Analysis callers expect
//! JSON inside the reply and documentation callers expect markdown; both
//! parse (or not) on their own side.

use crate::config::ModelSettings;
use crate::error::Result;
use crate::utils::retry::{with_retry, RetryPolicy};
use async_trait::async_trait;
use std::sync::Arc;

mod openai;
mod types;

pub use openai::OpenAiBackend;
pub use types::CompletionRequest;

/// Transport for a single completion call. No retries at this level.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one request and returns the completion text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Retrying request/response wrapper shared by every analysis and
/// documentation stage of a run.
///
/// Every failure is retried the same way: fixed delay, no backoff, no
/// distinction between error kinds. Identical prompts are sent again; there
/// is no cache.
#[derive(Clone)]
pub struct ModelClient {
    backend: Arc<dyn CompletionBackend>,
    model: String,
    temperature: f32,
    default_max_tokens: u32,
    retry: RetryPolicy,
}

impl ModelClient {
    /// Creates a client over `backend` using the model settings and retry policy
    pub fn new(backend: Arc<dyn CompletionBackend>, settings: &ModelSettings, retry: RetryPolicy) -> Self {
        Self {
            backend,
            model: settings.model.clone(),
            temperature: settings.temperature,
            default_max_tokens: settings.max_tokens,
            retry,
        }
    }

    /// Creates a client talking to an OpenAI-compatible endpoint
    pub fn openai(settings: &ModelSettings, api_key: &str, retry: RetryPolicy) -> Result<Self> {
        let backend = OpenAiBackend::new(settings, api_key)?;
        Ok(Self::new(Arc::new(backend), settings, retry))
    }

    /// Model identifier sent with each request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Queries the model with the configured default output size
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        self.query(prompt, self.default_max_tokens).await
    }

    /// Queries the model, retrying per the policy and returning the last
    /// error once attempts run out.
    pub async fn query(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let preview: String = prompt.trim_start().chars().take(100).collect();
        log::debug!("Querying LLM with prompt: {}...", preview);

        let request = CompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens,
            prompt: prompt.to_string(),
        };
        let max_attempts = self.retry.max_attempts;
        let delay = self.retry.delay;

        with_retry(
            self.retry,
            || self.backend.complete(&request),
            |attempt, err| {
                let kind = if err.is_transient() { "Transient error" } else { "Error" };
                log::warn!(
                    "{} querying LLM (attempt {}/{}): {}",
                    kind,
                    attempt,
                    max_attempts,
                    err
                );
                if attempt < max_attempts {
                    log::info!("Retrying in {:?}...", delay);
                } else {
                    log::error!("Maximum retry attempts reached, giving up");
                }
            },
        )
        .await
    }
}
