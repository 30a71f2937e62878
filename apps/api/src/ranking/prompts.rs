/// Ranking prompt template. Replace `{role}` and `{resume}` before sending.
/// The reply format requested here is what `parser::parse_score_response` reads.
pub const RANK_PROMPT_TEMPLATE: &str = "
You are an expert recruiter analyzing a resume against a job description. 
Provide a score from 0-100 and a concise evaluation.

Job Description:
{role}

Resume:
{resume}

Format your response exactly as:
Score: <number between 0-100>
Evaluation: <3-4 sentence summary of fit>

Focus on:
- Relevant skills match
- Experience alignment
- Qualification gaps
- Overall suitability
";

/// Fills the ranking template. Placeholders are located in the template
/// itself, so braces inside the job description or resume are never replaced.
pub fn build_rank_prompt(job_description: &str, resume_text: &str) -> String {
    let (head, tail) = RANK_PROMPT_TEMPLATE
        .split_once("{resume}")
        .unwrap_or((RANK_PROMPT_TEMPLATE, ""));
    format!(
        "{}{}{}",
        head.replacen("{role}", job_description, 1),
        resume_text,
        tail
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_inputs_and_format_instructions() {
        let prompt = build_rank_prompt("Senior Rust Engineer", "Alice: 8 years of Rust");
        assert!(prompt.contains("Job Description:\nSenior Rust Engineer"));
        assert!(prompt.contains("Resume:\nAlice: 8 years of Rust"));
        assert!(prompt.contains("Score: <number between 0-100>"));
        assert!(prompt.contains("Evaluation: <3-4 sentence summary of fit>"));
        assert!(!prompt.contains("{role}"));
        assert!(!prompt.contains("{resume}"));
    }

    #[test]
    fn test_placeholder_text_inside_inputs_is_left_alone() {
        let prompt = build_rank_prompt("Mention {resume} literally", "Uses {role} templates");
        assert!(prompt.contains("Job Description:\nMention {resume} literally"));
        assert!(prompt.contains("Resume:\nUses {role} templates"));
    }

    #[test]
    fn test_empty_resume_still_builds_prompt() {
        let prompt = build_rank_prompt("Any role", "");
        assert!(prompt.contains("Resume:\n\n"));
    }
}
