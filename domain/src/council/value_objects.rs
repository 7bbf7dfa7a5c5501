//! Council value objects - immutable result types for a deliberation.
//!
//! These types represent the outputs of each stage:
//! - [`ModelResponse`] - One backend's answer (stage 1, and every other invocation)
//! - [`PeerReview`] - One reviewer's structured evaluation of one anonymous response
//! - [`DeliberationResult`] - Complete result containing all stages

use super::anonymizer::AnonymousMapping;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response from a single backend invocation
///
/// Failures are data: a response with an error is kept for display but
/// excluded from anonymization and aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    /// Backend that produced this response
    pub model_name: String,
    /// Response text (empty on failure)
    pub response: String,
    /// Wall-clock latency of the invocation in milliseconds
    pub latency_ms: f64,
    /// Error description if the invocation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelResponse {
    /// Creates a successful response.
    pub fn success(
        model_name: impl Into<String>,
        response: impl Into<String>,
        latency_ms: f64,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            response: response.into(),
            latency_ms,
            error: None,
        }
    }

    /// Creates a failed response carrying a description of what went wrong.
    pub fn failure(model_name: impl Into<String>, error: impl Into<String>, latency_ms: f64) -> Self {
        Self {
            model_name: model_name.into(),
            response: String::new(),
            latency_ms,
            error: Some(error.into()),
        }
    }

    /// Returns `true` if the invocation failed.
    ///
    /// An empty error string counts as no error.
    pub fn is_failed(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    pub fn is_success(&self) -> bool {
        !self.is_failed()
    }
}

/// Structured peer review of one anonymous response by one reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReview {
    /// Backend that performed the review
    pub reviewer_model: String,
    /// Anonymous label of the reviewed response (e.g., "Response A")
    pub reviewed_anonymous_id: String,
    /// Score per configured criterion
    pub scores: BTreeMap<String, u32>,
    /// Sum of `scores`
    pub total_score: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    /// 1-based rank assigned by the reviewer
    pub ranking: usize,
}

impl PeerReview {
    /// Creates a review; the total is derived from the scores.
    pub fn new(
        reviewer_model: impl Into<String>,
        reviewed_anonymous_id: impl Into<String>,
        scores: BTreeMap<String, u32>,
        ranking: usize,
    ) -> Self {
        let total_score = scores.values().copied().fold(0, u32::saturating_add);
        Self {
            reviewer_model: reviewer_model.into(),
            reviewed_anonymous_id: reviewed_anonymous_id.into(),
            scores,
            total_score,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            ranking,
        }
    }

    pub fn with_strengths(mut self, strengths: Vec<String>) -> Self {
        self.strengths = strengths;
        self
    }

    pub fn with_weaknesses(mut self, weaknesses: Vec<String>) -> Self {
        self.weaknesses = weaknesses;
        self
    }
}

/// Complete result of a deliberation
///
/// Owned by the caller; the engine keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliberationResult {
    /// The prompt put to the council
    pub prompt: String,
    /// Stage 1: one response per roster entry, in roster order
    pub stage_1_responses: Vec<ModelResponse>,
    /// Stage 2: peer reviews (empty when skipped)
    pub stage_2_reviews: Vec<PeerReview>,
    /// Stage 3: the chairman's synthesis, or a failure marker
    pub stage_3_synthesis: String,
    pub chairman_model: String,
    pub total_latency_ms: f64,
    /// Anonymous label to backend name for the stage 2 pass
    pub anonymous_mapping: AnonymousMapping,
}

impl DeliberationResult {
    /// Returns an iterator over responses without an error.
    pub fn successful_responses(&self) -> impl Iterator<Item = &ModelResponse> {
        self.stage_1_responses.iter().filter(|r| r.is_success())
    }

    /// Returns an iterator over failed responses.
    pub fn failed_responses(&self) -> impl Iterator<Item = &ModelResponse> {
        self.stage_1_responses.iter().filter(|r| r.is_failed())
    }

    /// Names of all participating backends, in roster order
    pub fn models(&self) -> Vec<&str> {
        self.stage_1_responses
            .iter()
            .map(|r| r.model_name.as_str())
            .collect()
    }

    /// True when no stage 1 backend produced a usable answer.
    ///
    /// The engine still returns a result in that case; whether it counts as
    /// a hard failure is up to the caller.
    pub fn all_failed(&self) -> bool {
        self.stage_1_responses.iter().all(|r| r.is_failed())
    }
}
