//! Run Debate use case
//!
//! Opening statements, rebuttal rounds over the anonymized history, peer
//! review of the openings, then a verdict from the chairman.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_council::{CouncilEngine, RunCouncilError};
use council_domain::{DebatePrompt, DebateRequest, DebateResult, Stage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Verdict text when the chairman fails
pub const VERDICT_FAILED: &str = "Verdict generation failed.";

/// Use case for multi-round debates
pub struct RunDebateUseCase<G: BackendGateway + 'static> {
    engine: Arc<CouncilEngine<G>>,
}

impl<G: BackendGateway + 'static> RunDebateUseCase<G> {
    pub fn new(engine: Arc<CouncilEngine<G>>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self, request: DebateRequest) -> Result<DebateResult, RunCouncilError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        request: DebateRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateResult, RunCouncilError> {
        let roster = self.engine.council_roster(None)?;
        let started = Instant::now();

        info!("Debate: {} rounds with {} backends", request.rounds, roster.len());

        progress.on_round_start(1, request.rounds);
        let opening = self
            .engine
            .stage_1(
                &DebatePrompt::opening_prompt(&request.topic),
                Some(DebatePrompt::opening_system()),
                &roster,
                progress,
            )
            .await;

        let mut history = DebatePrompt::anonymized_round(&opening);
        let mut rebuttals = Vec::with_capacity(request.rebuttal_rounds());

        for round in 1..=request.rebuttal_rounds() {
            progress.on_round_start(round + 1, request.rounds);
            let prompt = DebatePrompt::rebuttal_prompt(&request.topic, &history, round);
            let responses = self
                .engine
                .stage_1(
                    &prompt,
                    Some(DebatePrompt::rebuttal_system()),
                    &roster,
                    progress,
                )
                .await;

            history.push_str("\n\n");
            history.push_str(&DebatePrompt::anonymized_round(&responses));
            rebuttals.push(responses);
        }

        let (reviews, anonymous_mapping) = self
            .engine
            .stage_2(&request.topic, &opening, &roster, progress)
            .await;

        let chairman = self.engine.select_chairman(&roster)?;
        progress.on_chairman_selected(&chairman.name);
        progress.on_stage_start(Stage::Synthesis, 1);

        let verdict_prompt = DebatePrompt::verdict_prompt(&request.topic, &opening, &rebuttals);
        let response = self
            .engine
            .gateway()
            .invoke(&chairman, &verdict_prompt, Some(DebatePrompt::judge_system()))
            .await;

        progress.on_task_complete(Stage::Synthesis, &chairman.name, response.is_success());
        progress.on_stage_complete(Stage::Synthesis);

        let verdict = if response.is_failed() {
            warn!(
                "Verdict by {} failed: {}",
                chairman.name,
                response.error.as_deref().unwrap_or_default()
            );
            VERDICT_FAILED.to_string()
        } else {
            response.response
        };

        Ok(DebateResult {
            topic: request.topic,
            opening,
            rebuttals,
            reviews,
            anonymous_mapping,
            chairman_model: chairman.name,
            verdict,
            total_latency_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}
