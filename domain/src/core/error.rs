//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Only structural preconditions are errors. A single backend failing is
/// recorded on its [`ModelResponse`](crate::ModelResponse) instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Council requires at least {required} enabled models, found {found}")]
    TooFewBackends { required: usize, found: usize },

    #[error("At least {required} options required for comparison, got {found}")]
    TooFewOptions { required: usize, found: usize },

    #[error("At least one evaluation criterion is required")]
    NoCriteria,

    #[error("At least one round is required")]
    NoRounds,

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Illegal deliberation transition: {from} -> {to}")]
    IllegalTransition { from: String, to: String },
}
