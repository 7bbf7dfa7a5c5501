//! Deliberation stages and the per-deliberation state machine.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Stage of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Stage 1 - every backend answers independently
    Independent,
    /// Stage 2 - backends review each other's anonymized answers
    PeerReview,
    /// Stage 3 - the chairman synthesizes the final answer
    Synthesis,
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Independent => "independent",
            Stage::PeerReview => "peer_review",
            Stage::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Stage::Independent => "Stage 1: Independent Responses",
            Stage::PeerReview => "Stage 2: Peer Review",
            Stage::Synthesis => "Stage 3: Chairman Synthesis",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where a single deliberation currently stands
///
/// ```text
/// Init -> Stage1Running -> Stage1Done -> (Stage2Running -> Stage2Done | Stage2Skipped)
///      -> ChairmanSelected -> Stage3Running -> Complete
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliberationState {
    #[default]
    Init,
    Stage1Running,
    Stage1Done,
    Stage2Running,
    Stage2Done,
    Stage2Skipped,
    ChairmanSelected,
    Stage3Running,
    /// Reached even when synthesis itself failed
    Complete,
}

impl DeliberationState {
    pub fn as_str(&self) -> &str {
        match self {
            DeliberationState::Init => "INIT",
            DeliberationState::Stage1Running => "STAGE1_RUNNING",
            DeliberationState::Stage1Done => "STAGE1_DONE",
            DeliberationState::Stage2Running => "STAGE2_RUNNING",
            DeliberationState::Stage2Done => "STAGE2_DONE",
            DeliberationState::Stage2Skipped => "STAGE2_SKIPPED",
            DeliberationState::ChairmanSelected => "CHAIRMAN_SELECTED",
            DeliberationState::Stage3Running => "STAGE3_RUNNING",
            DeliberationState::Complete => "COMPLETE",
        }
    }

    pub fn can_transition_to(&self, next: DeliberationState) -> bool {
        use DeliberationState::*;
        matches!(
            (self, next),
            (Init, Stage1Running)
                | (Stage1Running, Stage1Done)
                | (Stage1Done, Stage2Running)
                | (Stage1Done, Stage2Skipped)
                | (Stage2Running, Stage2Done)
                | (Stage2Done, ChairmanSelected)
                | (Stage2Skipped, ChairmanSelected)
                | (ChairmanSelected, Stage3Running)
                | (Stage3Running, Complete)
        )
    }

    /// Move to `next`, rejecting transitions the protocol does not allow.
    pub fn advance(&mut self, next: DeliberationState) -> Result<(), DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::IllegalTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        *self = next;
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliberationState::Complete)
    }
}

impl std::fmt::Display for DeliberationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
