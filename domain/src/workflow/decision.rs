//! Decision support: compare options against criteria.

use crate::council::anonymizer::AnonymousMapping;
use crate::council::review_parser::{ReviewPayload, extract_payload, numeric};
use crate::council::value_objects::{ModelResponse, PeerReview};
use crate::core::error::DomainError;
use crate::core::string::prefix_chars;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Criteria used when the caller names none
pub const DEFAULT_CRITERIA: [&str; 4] = ["feasibility", "cost", "complexity", "maintainability"];

/// Options required for a comparison
pub const MIN_OPTIONS: usize = 2;

/// Analysts score every option on a 1-10 scale
pub const DECISION_SCORE_SCALE: u32 = 10;

/// Raw text kept as reasoning when an analysis cannot be parsed
const UNPARSED_REASONING_CHARS: usize = 500;

/// A validated decision question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision: String,
    pub options: Vec<String>,
    pub criteria: Vec<String>,
}

impl DecisionRequest {
    /// Build a request, trimming entries and dropping blank ones.
    ///
    /// `criteria = None` selects [`DEFAULT_CRITERIA`].
    pub fn new(
        decision: impl Into<String>,
        options: Vec<String>,
        criteria: Option<Vec<String>>,
    ) -> Result<Self, DomainError> {
        let options = clean(options);
        if options.len() < MIN_OPTIONS {
            return Err(DomainError::TooFewOptions {
                required: MIN_OPTIONS,
                found: options.len(),
            });
        }

        let criteria = match criteria {
            Some(criteria) => clean(criteria),
            None => DEFAULT_CRITERIA.iter().map(|c| c.to_string()).collect(),
        };
        if criteria.is_empty() {
            return Err(DomainError::NoCriteria);
        }

        Ok(Self {
            decision: decision.into(),
            options,
            criteria,
        })
    }
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProsCons {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// One backend's structured analysis of the options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionAnalysis {
    pub model_name: String,
    /// option -> criterion -> score
    pub scores: BTreeMap<String, BTreeMap<String, u32>>,
    pub pros_cons: BTreeMap<String, ProsCons>,
    pub recommendation: String,
    pub reasoning: String,
}

impl OptionAnalysis {
    /// Parse an analyst's answer.
    ///
    /// Unparseable answers keep the first 500 characters of the raw text as
    /// reasoning and carry no scores.
    pub fn parse(model_name: impl Into<String>, text: &str) -> Self {
        let model_name = model_name.into();
        let map = match extract_payload(text) {
            ReviewPayload::Parsed(map) => map,
            ReviewPayload::Unparsed(raw) => {
                return Self {
                    model_name,
                    reasoning: prefix_chars(&raw, UNPARSED_REASONING_CHARS).to_string(),
                    ..Default::default()
                };
            }
        };

        Self {
            model_name,
            scores: map
                .get("scores")
                .and_then(Value::as_object)
                .map(option_scores)
                .unwrap_or_default(),
            pros_cons: map
                .get("pros_cons")
                .and_then(|v| serde_json::from_value(v.clone()).ok())
                .unwrap_or_default(),
            recommendation: string_field(&map, "recommendation"),
            reasoning: string_field(&map, "reasoning"),
        }
    }

    /// Score for one option and criterion, if given
    pub fn score(&self, option: &str, criterion: &str) -> Option<u32> {
        self.scores.get(option)?.get(criterion).copied()
    }

    /// Sum of the option's scores over `criteria`; missing scores count as 0
    pub fn option_total(&self, option: &str, criteria: &[String]) -> u32 {
        criteria
            .iter()
            .filter_map(|c| self.score(option, c))
            .fold(0, u32::saturating_add)
    }

    pub fn recommends(&self, option: &str) -> bool {
        self.recommendation.trim().eq_ignore_ascii_case(option.trim())
    }
}

fn option_scores(raw: &Map<String, Value>) -> BTreeMap<String, BTreeMap<String, u32>> {
    raw.iter()
        .filter_map(|(option, criteria)| {
            let criteria = criteria.as_object()?;
            let scores = criteria
                .iter()
                .filter_map(|(c, v)| numeric(v).map(|n| (c.clone(), clamp_score(n))))
                .collect();
            Some((option.clone(), scores))
        })
        .collect()
}

fn clamp_score(score: i64) -> u32 {
    score.clamp(1, i64::from(DECISION_SCORE_SCALE)) as u32
}

fn string_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Aggregated view of one option across all analyses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionScore {
    pub option: String,
    /// Mean of per-analysis totals, ignoring analyses that scored it 0
    pub average_score: f64,
    /// Analyses recommending this option
    pub recommendations: usize,
}

/// Aggregate scores and recommendation counts, in option order.
pub fn aggregate_option_scores(
    analyses: &[OptionAnalysis],
    options: &[String],
    criteria: &[String],
) -> Vec<OptionScore> {
    options
        .iter()
        .map(|option| {
            let totals: Vec<u32> = analyses
                .iter()
                .map(|a| a.option_total(option, criteria))
                .filter(|total| *total > 0)
                .collect();

            let average_score = if totals.is_empty() {
                0.0
            } else {
                totals.iter().copied().map(f64::from).sum::<f64>() / totals.len() as f64
            };

            OptionScore {
                option: option.clone(),
                average_score,
                recommendations: analyses.iter().filter(|a| a.recommends(option)).count(),
            }
        })
        .collect()
}

/// Complete result of a decision run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionResult {
    pub request: DecisionRequest,
    pub responses: Vec<ModelResponse>,
    pub analyses: Vec<OptionAnalysis>,
    pub reviews: Vec<PeerReview>,
    pub anonymous_mapping: AnonymousMapping,
    pub option_scores: Vec<OptionScore>,
    pub chairman_model: String,
    pub recommendation: String,
    pub total_latency_ms: f64,
}
