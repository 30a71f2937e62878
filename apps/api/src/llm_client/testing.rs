//! Deterministic stand-ins for the model service, shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Embedder, LanguageModel, LlmError};

/// Replies with a fixed text (or a per-call script) and records every prompt.
pub struct StubModel {
    replies: Vec<String>,
    fail_on_call: Option<usize>,
    reachable: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self::scripted(vec![reply.to_string()])
    }

    /// Call `n` gets `replies[n % len]`.
    pub fn scripted(replies: Vec<String>) -> Self {
        Self {
            replies,
            fail_on_call: None,
            reachable: true,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails the given 1-based call with an API error.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn invoke(&self, prompt: &str) -> Result<String, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.fail_on_call == Some(call) {
            return Err(LlmError::Api {
                status: 500,
                message: format!("stub failure on call {call}"),
            });
        }
        Ok(self.replies[(call - 1) % self.replies.len()].clone())
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        if self.reachable {
            Ok(vec!["llama2:latest".to_string()])
        } else {
            Err(LlmError::Api {
                status: 503,
                message: "connection refused".to_string(),
            })
        }
    }
}

/// Embeds text as counts of a small keyword vocabulary.
pub struct KeywordEmbedder {
    vocabulary: Vec<&'static str>,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: Vec<&'static str>) -> Self {
        Self {
            vocabulary,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            vocabulary: vec![],
            fail: true,
        }
    }
}

impl Default for KeywordEmbedder {
    fn default() -> Self {
        Self::new(vec!["rust", "python", "kubernetes", "java", "design"])
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        if self.fail {
            return Err(LlmError::EmptyContent);
        }
        let lower = text.to_lowercase();
        Ok(self
            .vocabulary
            .iter()
            .map(|word| lower.matches(word).count() as f32)
            .collect())
    }
}
