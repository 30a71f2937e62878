//! Ranking pipeline: one model call per resume, in upload order.
//!
//! Flow per candidate: build_rank_prompt → LanguageModel::invoke →
//! parse_score_response → CandidateRecord.
//!
//! A failed model call aborts the whole batch; no partial results are returned.

use tracing::{info, warn};

use crate::llm_client::{LanguageModel, LlmError};
use crate::models::candidate::{CandidateRecord, ResumeDocument};
use crate::ranking::parser::{parse_score_response, NO_EVALUATION};
use crate::ranking::prompts::build_rank_prompt;

/// Ranks every resume against the job description, preserving input order.
pub async fn rank_all_resumes(
    llm: &dyn LanguageModel,
    resumes: &[ResumeDocument],
    job_description: &str,
) -> Result<Vec<CandidateRecord>, LlmError> {
    let mut results = Vec::with_capacity(resumes.len());

    for (i, resume) in resumes.iter().enumerate() {
        let record = rank_resume(llm, resume, job_description).await?;
        info!(
            "Ranked candidate {}/{} '{}': score={}",
            i + 1,
            resumes.len(),
            record.name,
            record.score
        );
        results.push(record);
    }

    Ok(results)
}

/// Ranks a single resume.
pub async fn rank_resume(
    llm: &dyn LanguageModel,
    resume: &ResumeDocument,
    job_description: &str,
) -> Result<CandidateRecord, LlmError> {
    let prompt = build_rank_prompt(job_description, &resume.text);
    let reply = llm.invoke(&prompt).await?;

    let parsed = parse_score_response(&reply);
    if parsed.evaluation == NO_EVALUATION {
        warn!(
            "Model reply for '{}' had no Evaluation section: {:?}",
            resume.name,
            reply.chars().take(80).collect::<String>()
        );
    }

    Ok(CandidateRecord {
        name: resume.name.clone(),
        resume_text: resume.text.clone(),
        score: parsed.score,
        evaluation: parsed.evaluation,
    })
}
