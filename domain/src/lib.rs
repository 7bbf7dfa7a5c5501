//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a roster of independent model backends that deliberate in
//! three stages:
//!
//! 1. **Independent responses**: every backend answers the prompt on its own
//! 2. **Peer review**: backends score each other's answers under anonymous
//!    labels, never seeing their own
//! 3. **Synthesis**: a chairman, fixed or rotating, merges everything into
//!    one final answer
//!
//! ## Workflows
//!
//! - **Decide**: compare options against criteria and recommend one
//! - **Debate**: opening statements and rebuttal rounds judged by the chairman
//! - **Brainstorm**: idea lists, cross-pollination rounds, then a chairman
//!   synthesis

pub mod config;
pub mod core;
pub mod council;
pub mod prompt;
pub mod workflow;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{
    backend::{BackendConfig, GenerationSettings, InvocationMode, Provider},
    error::DomainError,
};
pub use council::{
    anonymizer::{ANONYMOUS_LABELS, Anonymized, AnonymousMapping, anonymize_responses},
    chairman::ChairmanSelector,
    policy::{ChairmanStrategy, CouncilPolicy, NEUTRAL_SCORE, PeerReviewPolicy, ScoringConfig},
    review_parser::{ReviewPayload, extract_payload, parse_peer_reviews},
    standings::{ResponseStanding, summarize_reviews},
    state::{DeliberationState, Stage},
    value_objects::{DeliberationResult, ModelResponse, PeerReview},
};
pub use prompt::{BrainstormPrompt, DebatePrompt, DecisionPrompt, PromptTemplate};
pub use workflow::{
    brainstorm::{
        BrainstormRequest, BrainstormResult, BrainstormRound, BrainstormStyle, IdeaList,
        parse_ideas,
    },
    debate::{DebateRequest, DebateResult},
    decision::{DecisionRequest, DecisionResult, OptionAnalysis, OptionScore, aggregate_option_scores},
};
