//! Session-level workflows: analysis, top-candidate summaries, insights, chat.
//!
//! Each function takes its collaborators explicitly and maps model failures
//! onto `AppError`; the handlers only load and store session state.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::insights::{generate_insights, generate_summary};
use crate::llm_client::{Embedder, LanguageModel, LlmError};
use crate::models::candidate::{top_candidates, ResumeDocument};
use crate::rag::{self, ChatAnswer, RetrievalSettings};
use crate::ranking::pipeline::rank_all_resumes;
use crate::session::Analysis;

/// Number of candidates summarised in the top-candidates panel.
pub const TOP_CANDIDATE_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct TopCandidate {
    pub rank: usize,
    pub name: String,
    pub score: u32,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateInsight {
    pub name: String,
    pub score: u32,
    pub insights: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsReport {
    pub overall: String,
    pub candidates: Vec<CandidateInsight>,
}

fn invocation_error(e: LlmError) -> AppError {
    AppError::ModelInvocation(e.to_string())
}

/// Connectivity pre-check. Returns the model names the service reports.
pub async fn check_model_connection(llm: &dyn LanguageModel) -> Result<Vec<String>, AppError> {
    llm.list_models()
        .await
        .map_err(|e| AppError::ModelUnreachable(e.to_string()))
}

/// Full analysis: connectivity check → rank every resume → build the chat index.
/// Any model failure aborts the whole analysis.
pub async fn analyze_candidates(
    llm: &dyn LanguageModel,
    embedder: &dyn Embedder,
    settings: &RetrievalSettings,
    resumes: &[ResumeDocument],
    job_description: &str,
) -> Result<Analysis, AppError> {
    if resumes.is_empty() {
        return Err(AppError::Validation(
            "Please upload resumes to begin analysis".to_string(),
        ));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    check_model_connection(llm).await?;

    info!("Analyzing {} candidates", resumes.len());
    let results = rank_all_resumes(llm, resumes, job_description)
        .await
        .map_err(invocation_error)?;

    let texts: Vec<&str> = resumes.iter().map(|r| r.text.as_str()).collect();
    let index = rag::build_index(embedder, settings, &texts)
        .await
        .map_err(invocation_error)?;
    info!(
        "Analysis complete: {} candidates ranked, {} chunks indexed",
        results.len(),
        index.len()
    );

    Ok(Analysis {
        job_description: job_description.to_string(),
        results,
        index: Arc::new(index),
        completed_at: Utc::now(),
    })
}

/// Summaries for the highest-scoring candidates. Only produced when more
/// than one resume was uploaded.
pub async fn summarize_top_candidates(
    llm: &dyn LanguageModel,
    analysis: &Analysis,
    resume_count: usize,
) -> Result<Vec<TopCandidate>, AppError> {
    if resume_count <= 1 {
        return Ok(Vec::new());
    }

    let mut summaries = Vec::new();
    for (i, record) in top_candidates(&analysis.results, TOP_CANDIDATE_LIMIT)
        .into_iter()
        .enumerate()
    {
        let summary = generate_summary(llm, &record.resume_text)
            .await
            .map_err(invocation_error)?;
        summaries.push(TopCandidate {
            rank: i + 1,
            name: record.name.clone(),
            score: record.score,
            summary,
        });
    }
    Ok(summaries)
}

/// Overall insights across all resumes, then individual insights per
/// candidate in upload order.
pub async fn candidate_insights(
    llm: &dyn LanguageModel,
    analysis: &Analysis,
) -> Result<InsightsReport, AppError> {
    let texts: Vec<&str> = analysis
        .results
        .iter()
        .map(|r| r.resume_text.as_str())
        .collect();
    let overall = generate_insights(llm, &texts, &analysis.job_description)
        .await
        .map_err(invocation_error)?;

    let mut candidates = Vec::with_capacity(analysis.results.len());
    for record in &analysis.results {
        let insights = generate_insights(llm, &[record.resume_text.as_str()], &analysis.job_description)
            .await
            .map_err(invocation_error)?;
        candidates.push(CandidateInsight {
            name: record.name.clone(),
            score: record.score,
            insights,
        });
    }

    Ok(InsightsReport {
        overall,
        candidates,
    })
}

/// Answers a chat question against the session's index.
pub async fn ask(
    llm: &dyn LanguageModel,
    embedder: &dyn Embedder,
    analysis: &Analysis,
    question: &str,
    top_k: usize,
) -> Result<ChatAnswer, AppError> {
    if question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }
    rag::answer(llm, embedder, &analysis.index, question, top_k)
        .await
        .map_err(invocation_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{KeywordEmbedder, StubModel};

    fn resumes(n: usize) -> Vec<ResumeDocument> {
        (0..n)
            .map(|i| ResumeDocument {
                name: format!("candidate_{i}.pdf"),
                text: format!("Candidate {i} knows Rust and Kubernetes."),
            })
            .collect()
    }

    async fn analyzed(llm: &StubModel, n: usize) -> Analysis {
        analyze_candidates(
            llm,
            &KeywordEmbedder::default(),
            &RetrievalSettings::default(),
            &resumes(n),
            "Rust engineer",
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_model_refuses_analysis_without_calls() {
        let llm = StubModel::replying("Score: 80\nEvaluation: ok").unreachable();

        let err = analyze_candidates(
            &llm,
            &KeywordEmbedder::default(),
            &RetrievalSettings::default(),
            &resumes(2),
            "Rust engineer",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::ModelUnreachable(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_job_description_rejected() {
        let llm = StubModel::replying("Score: 80\nEvaluation: ok");
        let err = analyze_candidates(
            &llm,
            &KeywordEmbedder::default(),
            &RetrievalSettings::default(),
            &resumes(1),
            "   ",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_resumes_rejected() {
        let llm = StubModel::replying("Score: 80\nEvaluation: ok");
        let err = analyze_candidates(
            &llm,
            &KeywordEmbedder::default(),
            &RetrievalSettings::default(),
            &[],
            "Rust engineer",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_analysis_ranks_and_indexes() {
        let llm = StubModel::replying("Score: 65\nEvaluation: Reasonable fit.");
        let analysis = analyzed(&llm, 2).await;

        assert_eq!(analysis.results.len(), 2);
        assert_eq!(analysis.results[0].score, 65);
        assert_eq!(analysis.index.len(), 2);
        assert_eq!(analysis.job_description, "Rust engineer");
    }

    #[tokio::test]
    async fn test_invocation_failure_surfaces_message_verbatim() {
        let llm = StubModel::replying("Score: 65\nEvaluation: ok").failing_on_call(2);
        let err = analyze_candidates(
            &llm,
            &KeywordEmbedder::default(),
            &RetrievalSettings::default(),
            &resumes(3),
            "Rust engineer",
        )
        .await
        .unwrap_err();

        match err {
            AppError::ModelInvocation(msg) => assert!(msg.contains("stub failure on call 2")),
            other => panic!("expected ModelInvocation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts_analysis() {
        let llm = StubModel::replying("Score: 65\nEvaluation: ok");
        let err = analyze_candidates(
            &llm,
            &KeywordEmbedder::failing(),
            &RetrievalSettings::default(),
            &resumes(1),
            "Rust engineer",
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::ModelInvocation(_)));
    }

    #[tokio::test]
    async fn test_top_candidates_skipped_for_single_resume() {
        let llm = StubModel::replying("Score: 65\nEvaluation: ok");
        let analysis = analyzed(&llm, 1).await;
        let calls_before = llm.call_count();

        let top = summarize_top_candidates(&llm, &analysis, 1).await.unwrap();

        assert!(top.is_empty());
        assert_eq!(llm.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_top_candidates_capped_at_three_and_sorted() {
        let llm = StubModel::scripted(vec![
            "Score: 10\nEvaluation: a".to_string(),
            "Score: 90\nEvaluation: b".to_string(),
            "Score: 50\nEvaluation: c".to_string(),
            "Score: 70\nEvaluation: d".to_string(),
        ]);
        let analysis = analyzed(&llm, 4).await;

        let top = summarize_top_candidates(&llm, &analysis, 4).await.unwrap();

        let names: Vec<_> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["candidate_1.pdf", "candidate_3.pdf", "candidate_2.pdf"]
        );
        assert_eq!(top[0].rank, 1);
    }

    #[tokio::test]
    async fn test_insights_overall_then_each_candidate() {
        let llm = StubModel::replying("Score: 65\nEvaluation: ok");
        let analysis = analyzed(&llm, 2).await;
        let calls_before = llm.call_count();

        let report = candidate_insights(&llm, &analysis).await.unwrap();

        assert_eq!(report.candidates.len(), 2);
        assert_eq!(llm.call_count(), calls_before + 3);
        let prompts = llm.prompts();
        assert!(prompts[calls_before].contains("Candidate 0 knows Rust and Kubernetes.---Candidate 1"));
        assert!(!prompts[calls_before + 1].contains("---"));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let llm = StubModel::replying("Score: 65\nEvaluation: ok");
        let analysis = analyzed(&llm, 1).await;
        let err = ask(&llm, &KeywordEmbedder::default(), &analysis, " ", 3)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
