//! Application layer for llm-council
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    backend_gateway::{BackendGateway, GatewayError},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_council::{CouncilEngine, MIN_COUNCIL_SIZE, RunCouncilError, RunCouncilInput};
pub use use_cases::run_brainstorm::{BRAINSTORM_SYNTHESIS_FAILED, RunBrainstormUseCase};
pub use use_cases::run_debate::{RunDebateUseCase, VERDICT_FAILED};
pub use use_cases::run_decision::{RECOMMENDATION_FAILED, RunDecisionUseCase};
