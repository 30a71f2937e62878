//! LLM Client: the single point of entry for all model service calls.
//!
//! Ranking, insights and chat depend only on the `LanguageModel` and `Embedder`
//! traits; `OllamaClient` is the production backend behind both.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub mod testing;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Text-in, text-out model capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError>;

    /// Lightweight connectivity probe: lists the models the service can serve.
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Client for a local Ollama server.
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: String,
        embedding_model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            embedding_model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = read_json(response).await?;

        debug!(
            "LLM call succeeded: model={}, prompt_tokens={:?}, output_tokens={:?}",
            self.model, body.prompt_eval_count, body.eval_count
        );

        Ok(body.response)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let response = self.client.get(self.url("/api/tags")).send().await?;
        let tags: TagsResponse = read_json(response).await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl Embedder for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            prompt: text,
        };

        let response = self
            .client
            .post(self.url("/api/embeddings"))
            .json(&request)
            .send()
            .await?;
        let body: EmbeddingResponse = read_json(response).await?;

        if body.embedding.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(body.embedding)
    }
}

/// Checks the status and decodes the body, surfacing Ollama's `{"error": ...}` message.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, LlmError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(LlmError::Api {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(LlmError::Parse)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<OllamaError>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_ollama_error_field() {
        let body = r#"{"error": "model 'llama2' not found, try pulling it first"}"#;
        assert_eq!(
            error_message(body),
            "model 'llama2' not found, try pulling it first"
        );
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_generate_response_ignores_extra_fields() {
        let json = r#"{
            "model": "llama2",
            "created_at": "2024-01-01T00:00:00Z",
            "response": "Score: 80\nEvaluation: Solid.",
            "done": true,
            "eval_count": 12
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.response.starts_with("Score: 80"));
        assert_eq!(parsed.eval_count, Some(12));
        assert_eq!(parsed.prompt_eval_count, None);
    }

    #[test]
    fn test_tags_response_lists_model_names() {
        let json = r#"{"models": [
            {"name": "llama2:latest", "size": 3825819519},
            {"name": "nomic-embed-text:latest", "size": 274302450}
        ]}"#;
        let tags: TagsResponse = serde_json::from_str(json).unwrap();
        let names: Vec<_> = tags.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["llama2:latest", "nomic-embed-text:latest"]);
    }

    #[test]
    fn test_generate_request_disables_streaming() {
        let request = GenerateRequest {
            model: "llama2",
            prompt: "hello",
            stream: false,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["model"], "llama2");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = OllamaClient::new(
            "http://localhost:11434/",
            "llama2".to_string(),
            "nomic-embed-text".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(client.url("/api/tags"), "http://localhost:11434/api/tags");
        assert_eq!(client.model(), "llama2");
    }
}
