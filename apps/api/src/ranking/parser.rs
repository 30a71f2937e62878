//! Lenient parser for the model's reply to the ranking prompt.
//!
//! Never fails: a missing or malformed `Score:` yields 0 and a missing
//! `Evaluation:` section yields `NO_EVALUATION`.

use std::num::IntErrorKind;
use std::sync::LazyLock;

use regex::Regex;

pub const NO_EVALUATION: &str = "No evaluation provided";
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResponse {
    pub score: u32,
    pub evaluation: String,
}

static SCORE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Score:\s*([0-9]+)").expect("valid score regex"));

static EVALUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Evaluation:").expect("valid evaluation regex"));

/// Start of the next labelled section, e.g. "\nStrengths:".
static NEXT_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[A-Za-z ]+:").expect("valid section regex"));

/// Extracts score and evaluation from a free-text model reply.
///
/// - score: first `Score:` followed by digits, clamped to `MAX_SCORE`
/// - evaluation: text after the first `Evaluation:` up to the next
///   `\n<Label>:` line or end of input, trimmed
pub fn parse_score_response(reply: &str) -> ScoreResponse {
    let score = SCORE_RE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|digits| parse_clamped(digits.as_str()))
        .unwrap_or(0);

    let evaluation = EVALUATION_RE
        .find(reply)
        .map(|label| {
            let rest = &reply[label.end()..];
            let end = NEXT_SECTION_RE
                .find(rest)
                .map(|m| m.start())
                .unwrap_or(rest.len());
            rest[..end].trim().to_string()
        })
        .unwrap_or_else(|| NO_EVALUATION.to_string());

    ScoreResponse { score, evaluation }
}

/// A run of digits that overflows `u32` is still a number far above the cap.
fn parse_clamped(digits: &str) -> u32 {
    match digits.parse::<u32>() {
        Ok(n) => n.min(MAX_SCORE),
        Err(e) if e.kind() == &IntErrorKind::PosOverflow => MAX_SCORE,
        Err(_) => 0,
    }
}
