//! Insight and summary generators: free-text model output returned verbatim.

pub mod prompts;

use tracing::debug;

use crate::llm_client::{LanguageModel, LlmError};
use prompts::{INSIGHTS_PROMPT_TEMPLATE, RESUME_SEPARATOR, SUMMARY_PROMPT_TEMPLATE};

/// Bullet-point summary of one resume.
pub async fn generate_summary(
    llm: &dyn LanguageModel,
    resume_text: &str,
) -> Result<String, LlmError> {
    let prompt = SUMMARY_PROMPT_TEMPLATE.replacen("{resume_text}", resume_text, 1);
    llm.invoke(&prompt).await
}

/// Insights for one or more resumes against a job description.
/// Multiple resumes are compared within a single prompt.
pub async fn generate_insights<S: AsRef<str>>(
    llm: &dyn LanguageModel,
    resumes: &[S],
    job_description: &str,
) -> Result<String, LlmError> {
    let prompt = build_insights_prompt(resumes, job_description);
    debug!("Generating insights for {} resume(s)", resumes.len());
    llm.invoke(&prompt).await
}

fn build_insights_prompt<S: AsRef<str>>(resumes: &[S], job_description: &str) -> String {
    let joined = resumes
        .iter()
        .map(|r| r.as_ref())
        .collect::<Vec<&str>>()
        .join(RESUME_SEPARATOR);

    let (head, tail) = INSIGHTS_PROMPT_TEMPLATE
        .split_once("{resumes}")
        .unwrap_or((INSIGHTS_PROMPT_TEMPLATE, ""));
    format!(
        "{}{}{}",
        head.replacen("{job_description}", job_description, 1),
        joined,
        tail
    )
}
