//! Retrieval-augmented chat over the uploaded resumes.
//!
//! Flow: split resumes into overlapping chunks → embed → in-memory index;
//! per question: embed → top-k chunks → QA prompt → one model call.

pub mod index;
pub mod prompts;
pub mod splitter;

use serde::Serialize;
use tracing::{debug, warn};

use crate::llm_client::{Embedder, LanguageModel, LlmError};
use index::{SearchResult, VectorIndex};
use prompts::{CONTEXT_SEPARATOR, QA_PROMPT_TEMPLATE};
use splitter::RecursiveCharacterSplitter;

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: splitter::DEFAULT_CHUNK_SIZE,
            chunk_overlap: splitter::DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

/// Builds the vector index over all resume texts.
pub async fn build_index<S: AsRef<str>>(
    embedder: &dyn Embedder,
    settings: &RetrievalSettings,
    texts: &[S],
) -> Result<VectorIndex, LlmError> {
    let splitter = RecursiveCharacterSplitter::new(settings.chunk_size, settings.chunk_overlap);
    let index = VectorIndex::build(embedder, &splitter, texts).await?;
    debug!("Built vector index: {} chunks from {} texts", index.len(), texts.len());
    Ok(index)
}

/// Answers a question from the `top_k` most relevant chunks.
/// The model's reply is returned verbatim.
pub async fn answer(
    llm: &dyn LanguageModel,
    embedder: &dyn Embedder,
    index: &VectorIndex,
    question: &str,
    top_k: usize,
) -> Result<ChatAnswer, LlmError> {
    if index.is_empty() {
        warn!("Answering with an empty index; the model gets no resume context");
    }
    let query = embedder.embed(question).await?;
    let sources = index.search(&query, top_k);

    let context = sources
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR);
    let prompt = build_qa_prompt(&context, question);

    let answer = llm.invoke(&prompt).await?;
    Ok(ChatAnswer { answer, sources })
}

fn build_qa_prompt(context: &str, question: &str) -> String {
    let (head, tail) = QA_PROMPT_TEMPLATE
        .split_once("{question}")
        .unwrap_or((QA_PROMPT_TEMPLATE, ""));
    format!(
        "{}{}{}",
        head.replacen("{context}", context, 1),
        question,
        tail
    )
}
