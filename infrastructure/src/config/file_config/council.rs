//! Council policy from TOML (`[council]` section)
//!
//! ```toml
//! [council]
//! chairman_strategy = "rotating"     # or "fixed"
//! chairman_fixed_model = "claude"
//!
//! [council.peer_review]
//! enabled = true
//!
//! [council.peer_review.scoring]
//! criteria = ["accuracy", "completeness", "clarity", "insight"]
//! scale = 10
//! ```

use council_domain::{
    ChairmanStrategy, ConfigIssue, ConfigIssueCode, CouncilPolicy, PeerReviewPolicy,
    ScoringConfig,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScoringConfig {
    pub criteria: Vec<String>,
    pub scale: u32,
}

impl Default for FileScoringConfig {
    fn default() -> Self {
        let defaults = ScoringConfig::default();
        Self {
            criteria: defaults.criteria,
            scale: defaults.scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePeerReviewConfig {
    pub enabled: bool,
    pub scoring: FileScoringConfig,
}

impl Default for FilePeerReviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scoring: FileScoringConfig::default(),
        }
    }
}

/// Raw council configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// "rotating" or "fixed"
    pub chairman_strategy: String,
    /// Model name used by the fixed strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chairman_fixed_model: Option<String>,
    pub peer_review: FilePeerReviewConfig,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            chairman_strategy: ChairmanStrategy::default().as_str().to_string(),
            chairman_fixed_model: None,
            peer_review: FilePeerReviewConfig::default(),
        }
    }
}

impl FileCouncilConfig {
    /// Parse the chairman strategy, falling back to rotating on bad input
    pub fn parse_strategy(&self) -> (ChairmanStrategy, Vec<ConfigIssue>) {
        match self.chairman_strategy.parse::<ChairmanStrategy>() {
            Ok(strategy) => (strategy, Vec::new()),
            Err(_) => (
                ChairmanStrategy::Rotating,
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidChairmanStrategy,
                    format!(
                        "council.chairman_strategy: unknown value '{}' (expected 'fixed' or 'rotating')",
                        self.chairman_strategy
                    ),
                )],
            ),
        }
    }

    /// Check the scoring rubric
    pub fn scoring_issues(&self) -> Vec<ConfigIssue> {
        let scoring = &self.peer_review.scoring;
        let mut issues = Vec::new();

        if scoring.criteria.iter().all(|c| c.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCriteria,
                "council.peer_review.scoring.criteria: at least one criterion is required",
            ));
        }
        if scoring.scale < 2 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ScaleTooSmall,
                format!(
                    "council.peer_review.scoring.scale: must be at least 2 (got {})",
                    scoring.scale
                ),
            ));
        }
        issues
    }

    pub fn to_policy(&self) -> CouncilPolicy {
        let criteria = self
            .peer_review
            .scoring
            .criteria
            .iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .collect();

        CouncilPolicy {
            chairman_strategy: self.parse_strategy().0,
            chairman_fixed_model: self
                .chairman_fixed_model
                .as_ref()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            peer_review: PeerReviewPolicy {
                enabled: self.peer_review.enabled,
                scoring: ScoringConfig::new(criteria, self.peer_review.scoring.scale),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_policy() {
        assert_eq!(FileCouncilConfig::default().to_policy(), CouncilPolicy::default());
    }

    #[test]
    fn test_parse_fixed_strategy() {
        let config: FileCouncilConfig = toml::from_str(
            r#"
chairman_strategy = "fixed"
chairman_fixed_model = "claude"
"#,
        )
        .unwrap();
        let policy = config.to_policy();

        assert_eq!(policy.chairman_strategy, ChairmanStrategy::Fixed);
        assert_eq!(policy.chairman_fixed_model.as_deref(), Some("claude"));
    }

    #[test]
    fn test_invalid_strategy_is_error() {
        let config = FileCouncilConfig {
            chairman_strategy: "random".to_string(),
            ..Default::default()
        };
        let (strategy, issues) = config.parse_strategy();

        assert_eq!(strategy, ChairmanStrategy::Rotating);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidChairmanStrategy);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_scoring_issues() {
        let mut config = FileCouncilConfig::default();
        assert!(config.scoring_issues().is_empty());

        config.peer_review.scoring.criteria = vec!["  ".to_string()];
        config.peer_review.scoring.scale = 1;
        let codes: Vec<_> = config.scoring_issues().into_iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![ConfigIssueCode::EmptyCriteria, ConfigIssueCode::ScaleTooSmall]
        );
    }

    #[test]
    fn test_criteria_normalized() {
        let mut config = FileCouncilConfig::default();
        config.peer_review.scoring.criteria =
            vec![" Accuracy ".to_string(), "".to_string(), "Depth".to_string()];

        assert_eq!(config.to_policy().criteria(), ["accuracy", "depth"]);
    }
}
