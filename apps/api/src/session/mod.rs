//! Per-user analysis sessions.
//!
//! A session owns everything that must survive between requests: the uploaded
//! resumes, the last analysis, the retrieval index and the chat history.
//! Ranking, insights and chat stay pure functions over explicit inputs; only
//! this module mutates state.

pub mod analysis;
pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{CandidateRecord, ResumeDocument};
use crate::models::chat::{ChatMessage, ChatRole};
use crate::rag::index::VectorIndex;

/// Results of a completed analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub job_description: String,
    pub results: Vec<CandidateRecord>,
    pub index: Arc<VectorIndex>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resumes: Vec<ResumeDocument>,
    /// Bumped on every upload; an analysis started on an older revision is discarded.
    pub revision: u64,
    pub analysis: Option<Analysis>,
    pub messages: Vec<ChatMessage>,
}

impl Session {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            resumes: Vec::new(),
            revision: 0,
            analysis: None,
            messages: Vec::new(),
        }
    }

    /// Replaces the resume set. Previous analysis and index no longer apply;
    /// chat history is kept.
    pub fn replace_resumes(&mut self, resumes: Vec<ResumeDocument>) {
        self.resumes = resumes;
        self.revision += 1;
        self.analysis = None;
    }

    /// Stores a finished analysis if the resume set is still the one it ran on.
    pub fn record_analysis(&mut self, revision: u64, analysis: Analysis) -> Result<(), AppError> {
        if revision != self.revision {
            return Err(AppError::Validation(
                "Resumes changed while the analysis was running. Please analyze again."
                    .to_string(),
            ));
        }
        self.analysis = Some(analysis);
        Ok(())
    }

    /// Drops the stored analysis after a failed run on `revision`. A run that
    /// started before the latest upload leaves newer results alone.
    pub fn clear_analysis_for(&mut self, revision: u64) {
        if revision == self.revision {
            self.analysis = None;
        }
    }

    pub fn push_exchange(&mut self, question: &str, answer: &str) {
        self.messages.push(ChatMessage::new(ChatRole::User, question));
        self.messages.push(ChatMessage::new(ChatRole::Assistant, answer));
    }
}

/// In-memory session store shared by all handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Session {
        let session = Session::new();
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    /// Snapshot of a session. The index is shared, not copied.
    pub async fn get(&self, id: Uuid) -> Result<Session, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Applies `f` to the session under the write lock.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Session) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        Ok(f(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
