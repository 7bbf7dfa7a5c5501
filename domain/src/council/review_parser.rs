//! Peer review payload parsing.
//!
//! Reviewers are asked for JSON but answer in free text. Extraction tries,
//! in order:
//!
//! 1. the first fenced code block (```` ```json ```` or bare ```` ``` ````)
//! 2. the whole response
//! 3. the span from the first `{` to the last `}`
//!
//! The first candidate that parses as a JSON object wins. Anything else is
//! [`ReviewPayload::Unparsed`], which yields zero reviews for that reviewer.
//! Nothing in here returns an error to the caller.

use super::policy::{NEUTRAL_SCORE, ScoringConfig};
use super::anonymizer::ANONYMOUS_LABELS;
use super::value_objects::PeerReview;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Result of structured payload extraction
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewPayload {
    /// A JSON object was found
    Parsed(Map<String, Value>),
    /// No candidate parsed; carries the raw text
    Unparsed(String),
}

impl ReviewPayload {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ReviewPayload::Parsed(_))
    }
}

/// Locate and parse the JSON object embedded in a model response.
pub fn extract_payload(text: &str) -> ReviewPayload {
    let candidates = [fenced_block(text), Some(text.trim()), brace_span(text)];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            return ReviewPayload::Parsed(map);
        }
    }

    ReviewPayload::Unparsed(text.to_string())
}

/// Body of the first fenced block, with an optional language tag stripped
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip the info string ("json", "JSON", ...) up to the end of the line
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Span from the first `{` to the last `}` inclusive
fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse one reviewer's answer into per-response reviews.
///
/// Every configured criterion gets a score: missing or non-numeric values
/// become [`NEUTRAL_SCORE`], numeric values are clamped into the scale.
/// Criteria not in the rubric are ignored. Fields are read one at a time, so
/// a null or mistyped field only loses that field; entries that are not
/// objects are skipped.
pub fn parse_peer_reviews(
    review_text: &str,
    reviewer_model: &str,
    scoring: &ScoringConfig,
) -> Vec<PeerReview> {
    let map = match extract_payload(review_text) {
        ReviewPayload::Parsed(map) => map,
        ReviewPayload::Unparsed(_) => return Vec::new(),
    };

    let ranking = string_list(map.get("ranking"));
    let Some(evaluations) = map.get("evaluations").and_then(Value::as_array) else {
        return Vec::new();
    };

    evaluations
        .iter()
        .enumerate()
        .filter_map(|(i, evaluation)| {
            let evaluation = evaluation.as_object()?;
            let response_id = evaluation
                .get("response_id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| positional_label(i));

            let scores = evaluation
                .get("scores")
                .and_then(Value::as_object)
                .map(|raw| criterion_scores(raw, scoring))
                .unwrap_or_else(|| criterion_scores(&Map::new(), scoring));

            let rank = ranking
                .iter()
                .position(|id| id == &response_id)
                .map(|p| p + 1)
                .unwrap_or(i + 1);

            Some(
                PeerReview::new(reviewer_model, response_id, scores, rank)
                    .with_strengths(string_list(evaluation.get("strengths")))
                    .with_weaknesses(string_list(evaluation.get("weaknesses"))),
            )
        })
        .collect()
}

/// String entries of a JSON array; anything else is dropped
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn positional_label(index: usize) -> String {
    ANONYMOUS_LABELS
        .get(index)
        .map(|l| l.to_string())
        .unwrap_or_else(|| format!("Response {}", index + 1))
}

fn criterion_scores(raw: &Map<String, Value>, scoring: &ScoringConfig) -> BTreeMap<String, u32> {
    scoring
        .criteria
        .iter()
        .map(|criterion| {
            let score = raw
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(criterion))
                .and_then(|(_, v)| numeric(v))
                .map(|v| scoring.clamp(v))
                .unwrap_or(NEUTRAL_SCORE);
            (criterion.clone(), score)
        })
        .collect()
}

pub(crate) fn numeric(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}
