//! Council policy: who chairs, and how peer review is scored.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Neutral score injected for criteria a reviewer left out
pub const NEUTRAL_SCORE: u32 = 5;

/// How the chairman is chosen for each deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChairmanStrategy {
    /// Always the configured model, if it is on the roster
    Fixed,
    /// Round-robin over the roster across deliberations
    #[default]
    Rotating,
}

impl ChairmanStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            ChairmanStrategy::Fixed => "fixed",
            ChairmanStrategy::Rotating => "rotating",
        }
    }
}

impl std::str::FromStr for ChairmanStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(ChairmanStrategy::Fixed),
            "rotating" | "rotate" => Ok(ChairmanStrategy::Rotating),
            other => Err(DomainError::InvalidPolicy(format!(
                "unknown chairman strategy '{}'",
                other
            ))),
        }
    }
}

/// Scoring rubric handed to every reviewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub criteria: Vec<String>,
    /// Upper bound of each criterion score (lower bound is 1)
    pub scale: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            criteria: ["accuracy", "completeness", "clarity", "insight"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            scale: 10,
        }
    }
}

impl ScoringConfig {
    pub fn new(criteria: Vec<String>, scale: u32) -> Self {
        Self { criteria, scale }
    }

    /// Clamp a raw score into `1..=scale`
    pub fn clamp(&self, score: i64) -> u32 {
        score.clamp(1, self.scale.max(1) as i64) as u32
    }
}

/// Peer review (stage 2) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReviewPolicy {
    pub enabled: bool,
    pub scoring: ScoringConfig,
}

impl Default for PeerReviewPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            scoring: ScoringConfig::default(),
        }
    }
}

/// Council-wide policy (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CouncilPolicy {
    pub chairman_strategy: ChairmanStrategy,
    /// Model name used by the fixed strategy
    pub chairman_fixed_model: Option<String>,
    pub peer_review: PeerReviewPolicy,
}

impl CouncilPolicy {
    /// Pin the chairman to a specific model
    pub fn with_fixed_chairman(mut self, name: impl Into<String>) -> Self {
        self.chairman_strategy = ChairmanStrategy::Fixed;
        self.chairman_fixed_model = Some(name.into());
        self
    }

    pub fn without_peer_review(mut self) -> Self {
        self.peer_review.enabled = false;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.peer_review.scoring = scoring;
        self
    }

    pub fn criteria(&self) -> &[String] {
        &self.peer_review.scoring.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = CouncilPolicy::default();
        assert_eq!(policy.chairman_strategy, ChairmanStrategy::Rotating);
        assert!(policy.peer_review.enabled);
        assert_eq!(policy.criteria().len(), 4);
        assert_eq!(policy.peer_review.scoring.scale, 10);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!(
            "fixed".parse::<ChairmanStrategy>().unwrap(),
            ChairmanStrategy::Fixed
        );
        assert_eq!(
            "Rotating".parse::<ChairmanStrategy>().unwrap(),
            ChairmanStrategy::Rotating
        );
        assert!("random".parse::<ChairmanStrategy>().is_err());
    }

    #[test]
    fn test_with_fixed_chairman() {
        let policy = CouncilPolicy::default().with_fixed_chairman("claude");
        assert_eq!(policy.chairman_strategy, ChairmanStrategy::Fixed);
        assert_eq!(policy.chairman_fixed_model.as_deref(), Some("claude"));
    }

    #[test]
    fn test_scoring_clamp() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.clamp(15), 10);
        assert_eq!(scoring.clamp(-3), 1);
        assert_eq!(scoring.clamp(7), 7);
    }
}
