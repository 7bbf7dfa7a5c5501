//! Aggregation of peer reviews into per-response standings.

use super::anonymizer::AnonymousMapping;
use super::value_objects::PeerReview;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated peer opinion of one anonymous response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseStanding {
    pub anonymous_id: String,
    /// Backend behind the label, if known to the mapping
    pub model_name: Option<String>,
    /// Mean of the reviewers' total scores
    pub average_score: f64,
    pub review_count: usize,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl ResponseStanding {
    /// Model name or "Unknown"
    pub fn display_model(&self) -> &str {
        self.model_name.as_deref().unwrap_or("Unknown")
    }
}

/// Group reviews by reviewed label and average their totals.
///
/// Standings are returned in label order.
pub fn summarize_reviews(reviews: &[PeerReview], mapping: &AnonymousMapping) -> Vec<ResponseStanding> {
    let mut grouped: BTreeMap<&str, Vec<&PeerReview>> = BTreeMap::new();
    for review in reviews {
        grouped
            .entry(review.reviewed_anonymous_id.as_str())
            .or_default()
            .push(review);
    }

    grouped
        .into_iter()
        .map(|(label, group)| {
            let total: f64 = group.iter().map(|r| f64::from(r.total_score)).sum();
            ResponseStanding {
                anonymous_id: label.to_string(),
                model_name: mapping.model_for(label).map(str::to_string),
                average_score: total / group.len() as f64,
                review_count: group.len(),
                strengths: group.iter().flat_map(|r| r.strengths.clone()).collect(),
                weaknesses: group.iter().flat_map(|r| r.weaknesses.clone()).collect(),
            }
        })
        .collect()
}
