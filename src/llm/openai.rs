use super::types::{ChatRequest, ChatResponse, CompletionRequest};
use super::CompletionBackend;
use crate::config::ModelSettings;
use crate::error::{DocError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Backend for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Builds a backend for `settings.endpoint` authenticated with `api_key`
    pub fn new(settings: &ModelSettings, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .user_agent(concat!("llamadocgen/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&ChatRequest::from_completion(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocError::Model(format!(
                "completion request failed: HTTP {}: {}",
                status,
                body.trim()
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        match parsed.into_content() {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(DocError::Model("completion response contained no text".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn settings(endpoint: String) -> ModelSettings {
        ModelSettings {
            endpoint,
            timeout_seconds: 5,
            ..ModelSettings::default()
        }
    }

    fn request(prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".into(),
            temperature: 0.2,
            max_tokens: 4000,
            prompt: prompt.into(),
        }
    }

    #[tokio::test]
    async fn test_posts_single_user_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4",
                "max_tokens": 4000,
                "messages": [{"role": "user", "content": "Describe main.py"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "# Main"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&settings(format!("{}/v1/", server.url())), "sk-test").unwrap();
        let text = backend.complete(&request("Describe main.py")).await.unwrap();

        assert_eq!(text, "# Main");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_model_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&settings(server.url()), "sk-test").unwrap();
        let err = backend.complete(&request("hi")).await.unwrap_err();

        match err {
            DocError::Model(msg) => {
                assert!(msg.contains("429"));
                assert!(msg.contains("rate limited"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_model_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let backend = OpenAiBackend::new(&settings(server.url()), "sk-test").unwrap();
        assert!(matches!(
            backend.complete(&request("hi")).await,
            Err(DocError::Model(_))
        ));
    }
}
