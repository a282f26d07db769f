//! Deterministic stand-ins for the model endpoint.
//!
//! [`ScriptedBackend`] answers prompts from a fixed rule list so a full
//! pipeline can run offline with reproducible output.

use crate::config::ModelSettings;
use crate::error::{DocError, Result};
use crate::llm::{CompletionBackend, CompletionRequest, ModelClient};
use crate::utils::retry::RetryPolicy;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Backend answering by the first rule whose pattern occurs in the prompt.
///
/// Rules are checked in the order they were added. Unmatched prompts get
/// the default reply. Every prompt is recorded.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    rules: Vec<(String, Reply)>,
    default_reply: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    /// Backend answering every prompt with `default_reply`
    pub fn new(default_reply: impl Into<String>) -> Self {
        Self {
            default_reply: default_reply.into(),
            ..Self::default()
        }
    }

    /// Answers prompts containing `pattern` with `reply`
    pub fn reply(mut self, pattern: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((pattern.into(), Reply::Text(reply.into())));
        self
    }

    /// Fails prompts containing `pattern` with a model error
    pub fn fail(mut self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.rules.push((pattern.into(), Reply::Fail(message.into())));
        self
    }

    /// Prompts received so far, oldest first
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of prompts received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Wraps a clone of this backend in a client that never sleeps and
    /// tries each prompt once. Call recording is shared with `self`.
    pub fn client(&self) -> ModelClient {
        ModelClient::new(
            Arc::new(self.clone()),
            &ModelSettings::default(),
            RetryPolicy::immediate(1),
        )
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.prompt.clone());
        }
        let reply = self
            .rules
            .iter()
            .find(|(pattern, _)| request.prompt.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Text(self.default_reply.clone()));

        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(message) => Err(DocError::Model(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_matching_rule_wins() -> Result<()> {
        let backend = ScriptedBackend::new("default")
            .reply("alpha", "A")
            .reply("alp", "B");
        let client = backend.client();

        assert_eq!(client.ask("the alpha prompt").await?, "A");
        assert_eq!(client.ask("something else").await?, "default");
        assert_eq!(backend.call_count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_fail_rule() {
        let backend = ScriptedBackend::new("ok").fail("boom", "scripted failure");
        let err = backend.client().ask("go boom").await.unwrap_err();
        assert!(matches!(err, DocError::Model(_)));
    }
}
