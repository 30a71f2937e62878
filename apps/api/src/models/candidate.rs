use serde::{Deserialize, Serialize};

/// Score at or above which a candidate is labelled as meeting the minimum bar.
pub const ELIGIBILITY_THRESHOLD: u32 = 50;

/// One uploaded resume after text extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub name: String,
    pub text: String,
}

/// Result of ranking one resume against one job description.
/// The evaluation doubles as the "overall fit" narrative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub resume_text: String,
    pub score: u32, // 0 – 100
    pub evaluation: String,
}

impl CandidateRecord {
    pub fn is_eligible(&self) -> bool {
        self.score >= ELIGIBILITY_THRESHOLD
    }
}

/// Display row of the ranking table.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub rank: usize, // 1-based
    pub name: String,
    pub score: u32,
    pub eligible: bool,
    pub evaluation: String,
}

/// Sorts records by score, highest first, and labels eligibility.
/// Ties keep their upload order.
pub fn ranking_table(records: &[CandidateRecord]) -> Vec<RankedCandidate> {
    let mut sorted: Vec<&CandidateRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankedCandidate {
            rank: i + 1,
            name: r.name.clone(),
            score: r.score,
            eligible: r.is_eligible(),
            evaluation: r.evaluation.clone(),
        })
        .collect()
}

/// The `limit` highest-scoring records, highest first.
pub fn top_candidates(records: &[CandidateRecord], limit: usize) -> Vec<&CandidateRecord> {
    let mut sorted: Vec<&CandidateRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.score.cmp(&a.score));
    sorted.truncate(limit);
    sorted
}
