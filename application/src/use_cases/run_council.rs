//! Run Council use case
//!
//! Orchestrates the three-stage deliberation.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::fan_out::fan_out;
use council_domain::{
    AnonymousMapping, BackendConfig, ChairmanSelector, CouncilPolicy, DeliberationResult,
    DeliberationState, DomainError, ModelResponse, PeerReview, PromptTemplate, Stage,
    anonymize_responses, parse_peer_reviews, summarize_reviews,
};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Minimum enabled backends for any council workflow
pub const MIN_COUNCIL_SIZE: usize = 2;

/// Errors that stop a deliberation before it starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunCouncilError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for [`CouncilEngine::execute`]
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub skip_peer_review: bool,
    /// Replaces the engine's roster for this deliberation
    pub roster: Option<Vec<BackendConfig>>,
}

impl RunCouncilInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            skip_peer_review: false,
            roster: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn without_peer_review(mut self) -> Self {
        self.skip_peer_review = true;
        self
    }

    pub fn with_roster(mut self, roster: Vec<BackendConfig>) -> Self {
        self.roster = Some(roster);
        self
    }
}

/// The deliberation engine.
///
/// Holds the gateway, the configured roster and policy, and the chairman
/// rotation counter. Safe to share across concurrent deliberations.
pub struct CouncilEngine<G: BackendGateway + 'static> {
    gateway: Arc<G>,
    roster: Vec<BackendConfig>,
    policy: CouncilPolicy,
    chairman: ChairmanSelector,
}

impl<G: BackendGateway + 'static> CouncilEngine<G> {
    pub fn new(gateway: Arc<G>, roster: Vec<BackendConfig>, policy: CouncilPolicy) -> Self {
        Self {
            gateway,
            roster,
            policy,
            chairman: ChairmanSelector::new(),
        }
    }

    /// Replace the chairman selector, e.g. to resume a rotation
    pub fn with_chairman_selector(mut self, selector: ChairmanSelector) -> Self {
        self.chairman = selector;
        self
    }

    pub fn policy(&self) -> &CouncilPolicy {
        &self.policy
    }

    pub(crate) fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    /// Enabled backends of the configured roster
    pub fn enabled_roster(&self) -> Vec<BackendConfig> {
        enabled(&self.roster)
    }

    /// Enabled roster, rejected if it cannot form a council
    pub(crate) fn council_roster(
        &self,
        roster: Option<&[BackendConfig]>,
    ) -> Result<Vec<BackendConfig>, RunCouncilError> {
        let roster = enabled(roster.unwrap_or(&self.roster));
        if roster.len() < MIN_COUNCIL_SIZE {
            return Err(DomainError::TooFewBackends {
                required: MIN_COUNCIL_SIZE,
                found: roster.len(),
            }
            .into());
        }
        Ok(roster)
    }

    // ==================== Stage 1 ====================

    /// Stage 1: every backend answers independently, in roster order
    pub async fn run_stage_1(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        roster: &[BackendConfig],
    ) -> Vec<ModelResponse> {
        self.stage_1(prompt, system_prompt, roster, &NoProgress).await
    }

    pub(crate) async fn stage_1(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        roster: &[BackendConfig],
        progress: &dyn ProgressNotifier,
    ) -> Vec<ModelResponse> {
        info!("Stage 1: querying {} backends", roster.len());
        progress.on_stage_start(Stage::Independent, roster.len());

        let responses = fan_out(
            &self.gateway,
            roster,
            prompt,
            system_prompt,
            Stage::Independent,
            progress,
        )
        .await;

        progress.on_stage_complete(Stage::Independent);
        info!(
            "Stage 1 complete: {}/{} succeeded",
            responses.iter().filter(|r| r.is_success()).count(),
            responses.len()
        );
        responses
    }

    // ==================== Stage 2 ====================

    /// Stage 2: anonymized peer review.
    ///
    /// Returns empty reviews and an empty mapping when peer review is
    /// disabled or fewer than two valid responses exist.
    pub async fn run_stage_2(
        &self,
        original_prompt: &str,
        responses: &[ModelResponse],
        roster: &[BackendConfig],
    ) -> (Vec<PeerReview>, AnonymousMapping) {
        self.stage_2(original_prompt, responses, roster, &NoProgress)
            .await
    }

    pub(crate) async fn stage_2(
        &self,
        original_prompt: &str,
        responses: &[ModelResponse],
        roster: &[BackendConfig],
        progress: &dyn ProgressNotifier,
    ) -> (Vec<PeerReview>, AnonymousMapping) {
        if !self.policy.peer_review.enabled {
            debug!("Peer review disabled by policy");
            progress.on_stage_skipped(Stage::PeerReview, "disabled");
            return (Vec::new(), AnonymousMapping::default());
        }

        let valid = responses.iter().filter(|r| r.is_success()).count();
        if valid < MIN_COUNCIL_SIZE {
            info!("Skipping peer review: {} valid response(s)", valid);
            progress.on_stage_skipped(Stage::PeerReview, "fewer than 2 valid responses");
            return (Vec::new(), AnonymousMapping::default());
        }

        // One shuffle per pass, shared by every reviewer
        let anonymized = anonymize_responses(responses);
        let scoring = &self.policy.peer_review.scoring;

        let assignments: Vec<(&BackendConfig, Vec<(String, String)>)> = roster
            .iter()
            .map(|reviewer| (reviewer, anonymized.visible_to(&reviewer.name)))
            .filter(|(reviewer, visible)| {
                if visible.is_empty() {
                    debug!("{} has no peers to review", reviewer.name);
                }
                !visible.is_empty()
            })
            .collect();

        info!("Stage 2: {} reviewers", assignments.len());
        progress.on_stage_start(Stage::PeerReview, assignments.len());

        let reviews_per_reviewer = join_all(assignments.into_iter().map(
            |(reviewer, visible)| async move {
                let prompt = PromptTemplate::peer_review_prompt(original_prompt, &visible, scoring);
                let response = self
                    .gateway
                    .invoke(reviewer, &prompt, Some(PromptTemplate::review_system()))
                    .await;

                if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
                    warn!("Review by {} failed: {}", reviewer.name, error);
                    progress.on_task_complete(Stage::PeerReview, &reviewer.name, false);
                    return Vec::new();
                }

                let shown: Vec<&str> = visible.iter().map(|(label, _)| label.as_str()).collect();
                let reviews: Vec<PeerReview> =
                    parse_peer_reviews(&response.response, &reviewer.name, scoring)
                        .into_iter()
                        .filter(|review| shown.contains(&review.reviewed_anonymous_id.as_str()))
                        .collect();

                if reviews.is_empty() {
                    warn!("No usable reviews from {}", reviewer.name);
                }
                progress.on_task_complete(Stage::PeerReview, &reviewer.name, !reviews.is_empty());
                reviews
            },
        ))
        .await;

        progress.on_stage_complete(Stage::PeerReview);

        let reviews: Vec<PeerReview> = reviews_per_reviewer.into_iter().flatten().collect();
        info!("Stage 2 complete: {} reviews", reviews.len());
        (reviews, anonymized.mapping)
    }

    // ==================== Stage 3 ====================

    /// Pick the chairman for the next synthesis.
    ///
    /// Each call under rotation advances the engine's counter.
    pub fn select_chairman(&self, roster: &[BackendConfig]) -> Result<BackendConfig, RunCouncilError> {
        self.chairman
            .select(roster, &self.policy)
            .cloned()
            .ok_or_else(|| {
                DomainError::TooFewBackends {
                    required: 1,
                    found: 0,
                }
                .into()
            })
    }

    /// Stage 3: the chairman synthesizes the final answer.
    ///
    /// Never fails; a failed invocation yields "Synthesis failed: <error>".
    pub async fn run_stage_3(
        &self,
        prompt: &str,
        responses: &[ModelResponse],
        reviews: &[PeerReview],
        mapping: &AnonymousMapping,
        chairman: &BackendConfig,
    ) -> String {
        self.stage_3(prompt, responses, reviews, mapping, chairman, &NoProgress)
            .await
    }

    pub(crate) async fn stage_3(
        &self,
        prompt: &str,
        responses: &[ModelResponse],
        reviews: &[PeerReview],
        mapping: &AnonymousMapping,
        chairman: &BackendConfig,
        progress: &dyn ProgressNotifier,
    ) -> String {
        info!("Stage 3: synthesis by {}", chairman.name);
        progress.on_stage_start(Stage::Synthesis, 1);

        let standings = summarize_reviews(reviews, mapping);
        let synthesis_prompt = PromptTemplate::synthesis_prompt(prompt, responses, &standings);
        let response = self
            .gateway
            .invoke(
                chairman,
                &synthesis_prompt,
                Some(PromptTemplate::synthesis_system()),
            )
            .await;

        progress.on_task_complete(Stage::Synthesis, &chairman.name, response.is_success());
        progress.on_stage_complete(Stage::Synthesis);

        match response.error.filter(|e| !e.is_empty()) {
            Some(error) => {
                warn!("Synthesis by {} failed: {}", chairman.name, error);
                format!("Synthesis failed: {}", error)
            }
            None => response.response,
        }
    }

    // ==================== Full deliberation ====================

    /// Execute with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<DeliberationResult, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Run all three stages.
    ///
    /// Fails only when the roster cannot form a council. Backend failures,
    /// unparseable reviews and a failed synthesis are all reported inside
    /// the returned result.
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationResult, RunCouncilError> {
        let roster = self.council_roster(input.roster.as_deref())?;
        let started = Instant::now();
        let mut state = DeliberationState::Init;

        info!("Starting deliberation with {} backends", roster.len());

        state.advance(DeliberationState::Stage1Running)?;
        let responses = self
            .stage_1(&input.prompt, input.system_prompt.as_deref(), &roster, progress)
            .await;
        state.advance(DeliberationState::Stage1Done)?;

        let (reviews, mapping) = if input.skip_peer_review {
            state.advance(DeliberationState::Stage2Skipped)?;
            progress.on_stage_skipped(Stage::PeerReview, "quick mode");
            (Vec::new(), AnonymousMapping::default())
        } else {
            state.advance(DeliberationState::Stage2Running)?;
            let outcome = self
                .stage_2(&input.prompt, &responses, &roster, progress)
                .await;
            state.advance(DeliberationState::Stage2Done)?;
            outcome
        };

        let chairman = self.select_chairman(&roster)?;
        state.advance(DeliberationState::ChairmanSelected)?;
        progress.on_chairman_selected(&chairman.name);

        state.advance(DeliberationState::Stage3Running)?;
        let synthesis = self
            .stage_3(&input.prompt, &responses, &reviews, &mapping, &chairman, progress)
            .await;
        state.advance(DeliberationState::Complete)?;

        let total_latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        info!("Deliberation complete in {:.0}ms", total_latency_ms);

        Ok(DeliberationResult {
            prompt: input.prompt,
            stage_1_responses: responses,
            stage_2_reviews: reviews,
            stage_3_synthesis: synthesis,
            chairman_model: chairman.name,
            total_latency_ms,
            anonymous_mapping: mapping,
        })
    }
}

fn enabled(roster: &[BackendConfig]) -> Vec<BackendConfig> {
    roster.iter().filter(|b| b.enabled).cloned().collect()
}
