//! Axum route handlers for the session API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_text, UploadedFile};
use crate::models::candidate::{ranking_table, RankedCandidate, ResumeDocument};
use crate::models::chat::ChatMessage;
use crate::rag::index::SearchResult;
use crate::session::analysis::{
    analyze_candidates, ask, candidate_insights, summarize_top_candidates, InsightsReport,
    TopCandidate,
};
use crate::session::{Analysis, Session};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionOverview {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub resume_names: Vec<String>,
    pub job_description: Option<String>,
    pub analyzed: bool,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub chat_messages: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadedResume {
    pub name: String,
    pub characters: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resumes: Vec<UploadedResume>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub job_description: String,
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Serialize)]
pub struct TopCandidatesResponse {
    pub candidates: Vec<TopCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
    pub sources: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessage>,
}

fn require_analysis(session: &Session) -> Result<&Analysis, AppError> {
    session.analysis.as_ref().ok_or_else(|| {
        AppError::Validation("Please analyze candidates first".to_string())
    })
}

fn ranking_response(analysis: &Analysis) -> RankingResponse {
    RankingResponse {
        job_description: analysis.job_description.clone(),
        candidates: ranking_table(&analysis.results),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.sessions.create().await;
    info!("Created session {}", session.id);
    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionOverview>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(SessionOverview {
        session_id: session.id,
        created_at: session.created_at,
        resume_names: session.resumes.iter().map(|r| r.name.clone()).collect(),
        job_description: session.analysis.as_ref().map(|a| a.job_description.clone()),
        analyzed: session.analysis.is_some(),
        analyzed_at: session.analysis.as_ref().map(|a| a.completed_at),
        chat_messages: session.messages.len(),
    }))
}

/// POST /api/v1/sessions/:id/resumes
///
/// Multipart upload of PDF/DOCX resumes. Replaces the session's resume set;
/// one unreadable file rejects the whole upload.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    state.sessions.get(id).await?;

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;
        files.push(UploadedFile { filename, data });
    }

    if files.is_empty() {
        return Err(AppError::Validation(
            "No resume files uploaded".to_string(),
        ));
    }

    let mut resumes = Vec::with_capacity(files.len());
    for file in files {
        let name = file.filename.clone();
        let text = extract_text(file).await.map_err(|e| {
            warn!("Rejecting upload for session {id}: {e}");
            AppError::from(e)
        })?;
        resumes.push(ResumeDocument { name, text });
    }

    let response = UploadResponse {
        resumes: resumes
            .iter()
            .map(|r| UploadedResume {
                name: r.name.clone(),
                characters: r.text.chars().count(),
            })
            .collect(),
    };

    info!("Session {id}: stored {} resumes", resumes.len());
    state
        .sessions
        .update(id, |session| session.replace_resumes(resumes))
        .await?;

    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/analyze
///
/// Connectivity check → ranking → chat index. A failed analysis clears any
/// previous results so stale rankings are never served.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<RankingResponse>, AppError> {
    let session = state.sessions.get(id).await?;

    let outcome = analyze_candidates(
        state.llm.as_ref(),
        state.embedder.as_ref(),
        &state.config.retrieval_settings(),
        &session.resumes,
        &request.job_description,
    )
    .await;

    let analysis = match outcome {
        Ok(analysis) => analysis,
        Err(e) => {
            if matches!(
                e,
                AppError::ModelUnreachable(_) | AppError::ModelInvocation(_)
            ) {
                state
                    .sessions
                    .update(id, |s| s.clear_analysis_for(session.revision))
                    .await?;
            }
            return Err(e);
        }
    };

    let response = ranking_response(&analysis);
    state
        .sessions
        .update(id, |s| s.record_analysis(session.revision, analysis))
        .await??;

    Ok(Json(response))
}

/// GET /api/v1/sessions/:id/ranking
pub async fn handle_get_ranking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RankingResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = require_analysis(&session)?;
    Ok(Json(ranking_response(analysis)))
}

/// GET /api/v1/sessions/:id/top-candidates
pub async fn handle_top_candidates(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TopCandidatesResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = require_analysis(&session)?;
    let candidates =
        summarize_top_candidates(state.llm.as_ref(), analysis, session.resumes.len()).await?;
    Ok(Json(TopCandidatesResponse { candidates }))
}

/// GET /api/v1/sessions/:id/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InsightsReport>, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = require_analysis(&session)?;
    let report = candidate_insights(state.llm.as_ref(), analysis).await?;
    Ok(Json(report))
}

/// POST /api/v1/sessions/:id/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let analysis = session.analysis.as_ref().ok_or_else(|| {
        AppError::Validation("Please analyze candidates first to enable chat".to_string())
    })?;

    let reply = ask(
        state.llm.as_ref(),
        state.embedder.as_ref(),
        analysis,
        &request.question,
        state.config.retrieval_settings().top_k,
    )
    .await?;

    state
        .sessions
        .update(id, |s| s.push_exchange(&request.question, &reply.answer))
        .await?;

    Ok(Json(ChatResponse {
        answer: reply.answer,
        sources: reply.sources,
    }))
}

/// GET /api/v1/sessions/:id/chat
pub async fn handle_chat_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(ChatHistoryResponse {
        messages: session.messages,
    }))
}
