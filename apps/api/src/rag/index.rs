use serde::Serialize;

use crate::llm_client::{Embedder, LlmError};
use crate::rag::splitter::RecursiveCharacterSplitter;

#[derive(Debug, Clone)]
struct IndexedChunk {
    text: String,
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub text: String,
    pub score: f32,
}

/// In-memory vector index over chunked resume text.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    chunks: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Chunks every text and embeds each chunk, one embedding call per chunk.
    pub async fn build<S: AsRef<str>>(
        embedder: &dyn Embedder,
        splitter: &RecursiveCharacterSplitter,
        texts: &[S],
    ) -> Result<Self, LlmError> {
        let mut chunks = Vec::new();
        for text in texts {
            for chunk in splitter.split_text(text.as_ref()) {
                let embedding = embedder.embed(&chunk).await?;
                chunks.push(IndexedChunk {
                    text: chunk,
                    embedding,
                });
            }
        }
        Ok(Self { chunks })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Top `k` chunks by cosine similarity, most similar first.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .map(|c| SearchResult {
                text: c.text.clone(),
                score: cosine_similarity(query, &c.embedding),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        results
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
