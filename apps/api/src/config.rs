use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::rag::RetrievalSettings;

const BYTES_PER_MB: usize = 1024 * 1024;

/// Largest accepted upload cap; keeps the byte count within a 32-bit `usize`.
const MAX_UPLOAD_MB_LIMIT: usize = 4095;

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub llm_timeout_secs: u64,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retrieval_k: usize,
    pub max_upload_mb: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            chat_model: "llama2".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            llm_timeout_secs: 120,
            chunk_size: 1000,
            chunk_overlap: 200,
            retrieval_k: 3,
            max_upload_mb: 25,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            ollama_url: env_or("OLLAMA_URL", defaults.ollama_url),
            chat_model: env_or("CHAT_MODEL", defaults.chat_model),
            embedding_model: env_or("EMBEDDING_MODEL", defaults.embedding_model),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
            chunk_size: parse_env("CHUNK_SIZE", defaults.chunk_size)?,
            chunk_overlap: parse_env("CHUNK_OVERLAP", defaults.chunk_overlap)?,
            retrieval_k: parse_env("RETRIEVAL_K", defaults.retrieval_k)?,
            max_upload_mb: parse_env("MAX_UPLOAD_MB", defaults.max_upload_mb)?,
            port: parse_env("PORT", defaults.port)?,
            rust_log: env_or("RUST_LOG", defaults.rust_log),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn retrieval_settings(&self) -> RetrievalSettings {
        RetrievalSettings {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            top_k: self.retrieval_k,
        }
    }

    /// Request body cap for uploads, in bytes.
    pub fn upload_limit_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(BYTES_PER_MB)
    }

    fn validate(&self) -> Result<()> {
        if self.max_upload_mb == 0 || self.max_upload_mb > MAX_UPLOAD_MB_LIMIT {
            bail!(
                "MAX_UPLOAD_MB must be between 1 and {MAX_UPLOAD_MB_LIMIT}, got {}",
                self.max_upload_mb
            );
        }
        if self.chunk_size == 0 {
            bail!("CHUNK_SIZE must be greater than zero");
        }
        if self.chunk_overlap >= self.chunk_size {
            bail!(
                "CHUNK_OVERLAP ({}) must be smaller than CHUNK_SIZE ({})",
                self.chunk_overlap,
                self.chunk_size
            );
        }
        if self.retrieval_k == 0 {
            bail!("RETRIEVAL_K must be greater than zero");
        }
        Ok(())
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
