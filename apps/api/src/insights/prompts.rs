/// Single-resume summary. Replace `{resume_text}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "
    Summarize this resume in 4-5 bullet points highlighting:
    - Key experience
    - Technical skills
    - Notable achievements
    - Education background
    - Overall strengths
    
    Resume:
    {resume_text}
    ";

/// Resumes-versus-job-description insights. Replace `{job_description}` and `{resumes}`.
pub const INSIGHTS_PROMPT_TEMPLATE: &str = "
    Analyze these resumes in the context of the following job description:
    {job_description}
    
    Provide key insights about:
    1. How well the candidates match the requirements
    2. Notable strengths and weaknesses
    3. Any patterns or interesting observations
    4. Recommendations for further evaluation
    
    For multiple resumes, compare them and highlight:
    - The strongest candidates overall
    - Best fit for specific requirements
    - Any missing skills across candidates
    
    Resumes to analyze:
    {resumes}
    ";

/// Separator placed between resumes in the insights prompt.
pub const RESUME_SEPARATOR: &str = "---";
