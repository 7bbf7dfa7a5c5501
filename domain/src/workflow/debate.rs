//! Multi-round debate value objects.

use crate::council::anonymizer::AnonymousMapping;
use crate::council::value_objects::{ModelResponse, PeerReview};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ROUNDS: usize = 2;

/// A validated debate request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateRequest {
    pub topic: String,
    /// Opening round plus `rounds - 1` rebuttal rounds
    pub rounds: usize,
}

impl DebateRequest {
    pub fn new(topic: impl Into<String>, rounds: usize) -> Result<Self, DomainError> {
        if rounds == 0 {
            return Err(DomainError::NoRounds);
        }
        Ok(Self {
            topic: topic.into(),
            rounds,
        })
    }

    pub fn rebuttal_rounds(&self) -> usize {
        self.rounds - 1
    }
}

/// Complete result of a debate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateResult {
    pub topic: String,
    pub opening: Vec<ModelResponse>,
    /// One entry per rebuttal round, each in roster order
    pub rebuttals: Vec<Vec<ModelResponse>>,
    /// Peer reviews of the opening statements
    pub reviews: Vec<PeerReview>,
    pub anonymous_mapping: AnonymousMapping,
    pub chairman_model: String,
    pub verdict: String,
    pub total_latency_ms: f64,
}

impl DebateResult {
    /// Every argument made, opening statements first
    pub fn all_arguments(&self) -> impl Iterator<Item = &ModelResponse> {
        self.opening.iter().chain(self.rebuttals.iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_must_be_positive() {
        assert_eq!(DebateRequest::new("t", 0).unwrap_err(), DomainError::NoRounds);
        assert_eq!(DebateRequest::new("t", 1).unwrap().rebuttal_rounds(), 0);
        assert_eq!(DebateRequest::new("t", 3).unwrap().rebuttal_rounds(), 2);
    }

    #[test]
    fn test_all_arguments_order() {
        let result = DebateResult {
            topic: "t".to_string(),
            opening: vec![ModelResponse::success("a", "open", 1.0)],
            rebuttals: vec![vec![ModelResponse::success("a", "rebut", 1.0)]],
            reviews: vec![],
            anonymous_mapping: AnonymousMapping::default(),
            chairman_model: "a".to_string(),
            verdict: "v".to_string(),
            total_latency_ms: 2.0,
        };
        let texts: Vec<&str> = result.all_arguments().map(|r| r.response.as_str()).collect();
        assert_eq!(texts, vec!["open", "rebut"]);
    }
}
