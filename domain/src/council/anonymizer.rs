//! Response anonymization for peer review.
//!
//! Valid responses are shuffled and relabelled with a fixed, ordered label
//! set so reviewers cannot tell which backend wrote what. The mapping is
//! scoped to one stage 2 pass and shared by every reviewer prompt in it.

use super::value_objects::ModelResponse;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered anonymous labels. Responses beyond this count are left out of
/// peer review.
pub const ANONYMOUS_LABELS: [&str; 5] = [
    "Response A",
    "Response B",
    "Response C",
    "Response D",
    "Response E",
];

/// Bijection from anonymous label to backend name for one review round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnonymousMapping {
    labels: BTreeMap<String, String>,
}

impl AnonymousMapping {
    /// Backend name behind a label
    pub fn model_for(&self, label: &str) -> Option<&str> {
        self.labels.get(label).map(String::as_str)
    }

    /// Label assigned to a backend, if it took part in the round
    pub fn label_for(&self, model_name: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(_, name)| name.as_str() == model_name)
            .map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(label, model_name)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(l, m)| (l.as_str(), m.as_str()))
    }
}

/// Anonymized view of one response: `(label, text)`
pub type AnonymizedResponse = (String, String);

/// Output of one anonymization pass
#[derive(Debug, Clone, Default)]
pub struct Anonymized {
    pub mapping: AnonymousMapping,
    /// Responses in label order
    pub responses: Vec<AnonymizedResponse>,
}

impl Anonymized {
    /// Responses the given reviewer may see: everything except its own.
    pub fn visible_to(&self, reviewer: &str) -> Vec<AnonymizedResponse> {
        self.responses
            .iter()
            .filter(|(label, _)| self.mapping.model_for(label) != Some(reviewer))
            .cloned()
            .collect()
    }
}

/// Anonymize with the thread-local, OS-seeded generator.
///
/// Each call produces an independent permutation.
pub fn anonymize_responses(responses: &[ModelResponse]) -> Anonymized {
    anonymize_with_rng(responses, &mut rand::thread_rng())
}

/// Anonymize using the supplied generator.
///
/// Failed responses are discarded, the rest shuffled, and labels assigned
/// in order up to [`ANONYMOUS_LABELS`]`.len()`.
pub fn anonymize_with_rng<R: Rng + ?Sized>(responses: &[ModelResponse], rng: &mut R) -> Anonymized {
    let mut valid: Vec<&ModelResponse> = responses.iter().filter(|r| r.is_success()).collect();
    valid.shuffle(rng);

    let mut anonymized = Anonymized::default();
    for (label, response) in ANONYMOUS_LABELS.iter().zip(valid) {
        anonymized
            .mapping
            .labels
            .insert(label.to_string(), response.model_name.clone());
        anonymized
            .responses
            .push((label.to_string(), response.response.clone()));
    }
    anonymized
}
