//! Run Decision use case
//!
//! Every backend scores the options, the analyses are peer reviewed, and
//! the chairman makes the final recommendation.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_council::{CouncilEngine, RunCouncilError};
use council_domain::{
    DecisionPrompt, DecisionRequest, DecisionResult, OptionAnalysis, Stage,
    aggregate_option_scores,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Recommendation text when the chairman fails
pub const RECOMMENDATION_FAILED: &str = "Recommendation failed.";

/// Use case for decision support
pub struct RunDecisionUseCase<G: BackendGateway + 'static> {
    engine: Arc<CouncilEngine<G>>,
}

impl<G: BackendGateway + 'static> RunDecisionUseCase<G> {
    pub fn new(engine: Arc<CouncilEngine<G>>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self, request: DecisionRequest) -> Result<DecisionResult, RunCouncilError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        request: DecisionRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<DecisionResult, RunCouncilError> {
        let roster = self.engine.council_roster(None)?;
        let started = Instant::now();

        info!(
            "Decision across {} options with {} backends",
            request.options.len(),
            roster.len()
        );

        let analysis_prompt =
            DecisionPrompt::analysis_prompt(&request.decision, &request.options, &request.criteria);
        let responses = self
            .engine
            .stage_1(
                &analysis_prompt,
                Some(DecisionPrompt::analyst_system()),
                &roster,
                progress,
            )
            .await;

        let analyses: Vec<OptionAnalysis> = responses
            .iter()
            .filter(|r| r.is_success())
            .map(|r| OptionAnalysis::parse(&r.model_name, &r.response))
            .collect();

        let review_context = DecisionPrompt::review_context(&request.decision, &request.options);
        let (reviews, anonymous_mapping) = self
            .engine
            .stage_2(&review_context, &responses, &roster, progress)
            .await;

        let chairman = self.engine.select_chairman(&roster)?;
        progress.on_chairman_selected(&chairman.name);
        progress.on_stage_start(Stage::Synthesis, 1);

        let recommendation_prompt =
            DecisionPrompt::recommendation_prompt(&request.decision, &request.options, &analyses);
        let response = self
            .engine
            .gateway()
            .invoke(
                &chairman,
                &recommendation_prompt,
                Some(DecisionPrompt::advisor_system()),
            )
            .await;

        progress.on_task_complete(Stage::Synthesis, &chairman.name, response.is_success());
        progress.on_stage_complete(Stage::Synthesis);

        let recommendation = if response.is_failed() {
            warn!(
                "Recommendation by {} failed: {}",
                chairman.name,
                response.error.as_deref().unwrap_or_default()
            );
            RECOMMENDATION_FAILED.to_string()
        } else {
            response.response
        };

        let option_scores = aggregate_option_scores(&analyses, &request.options, &request.criteria);

        Ok(DecisionResult {
            request,
            responses,
            analyses,
            reviews,
            anonymous_mapping,
            option_scores,
            chairman_model: chairman.name,
            recommendation,
            total_latency_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
