//! Run Brainstorm use case
//!
//! An independent idea round, cross-pollination rounds over the anonymized
//! round 1 ideas, then a chairman synthesis. There is no peer review.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::run_council::{CouncilEngine, RunCouncilError};
use council_domain::{BrainstormPrompt, BrainstormRequest, BrainstormResult, BrainstormRound, Stage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Synthesis text when the chairman fails
pub const BRAINSTORM_SYNTHESIS_FAILED: &str = "Synthesis failed.";

/// Use case for collaborative brainstorming
pub struct RunBrainstormUseCase<G: BackendGateway + 'static> {
    engine: Arc<CouncilEngine<G>>,
}

impl<G: BackendGateway + 'static> RunBrainstormUseCase<G> {
    pub fn new(engine: Arc<CouncilEngine<G>>) -> Self {
        Self { engine }
    }

    pub async fn execute(
        &self,
        request: BrainstormRequest,
    ) -> Result<BrainstormResult, RunCouncilError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        request: BrainstormRequest,
        progress: &dyn ProgressNotifier,
    ) -> Result<BrainstormResult, RunCouncilError> {
        let roster = self.engine.council_roster(None)?;
        let started = Instant::now();

        info!(
            "Brainstorm: {} rounds, {} style, {} backends",
            request.rounds,
            request.style,
            roster.len()
        );

        progress.on_round_start(1, request.rounds);
        let system = BrainstormPrompt::ideation_system(request.style);
        let responses = self
            .engine
            .stage_1(
                &BrainstormPrompt::ideation_prompt(&request.topic, request.style),
                Some(system.as_str()),
                &roster,
                progress,
            )
            .await;
        let initial = BrainstormRound::new(1, responses);
        debug!("Round 1 produced {} ideas", initial.idea_count());

        let mut rounds = Vec::with_capacity(request.rounds);
        for round in 2..=request.rounds {
            progress.on_round_start(round, request.rounds);
            let prompt =
                BrainstormPrompt::cross_pollination_prompt(&request.topic, &initial.ideas, round);
            let responses = self
                .engine
                .stage_1(
                    &prompt,
                    Some(BrainstormPrompt::cross_pollination_system()),
                    &roster,
                    progress,
                )
                .await;
            let round = BrainstormRound::new(round, responses);
            debug!("Round {} produced {} ideas", round.round, round.idea_count());
            rounds.push(round);
        }
        rounds.insert(0, initial);

        let chairman = self.engine.select_chairman(&roster)?;
        progress.on_chairman_selected(&chairman.name);
        progress.on_stage_start(Stage::Synthesis, 1);

        let synthesis_prompt = BrainstormPrompt::synthesis_prompt(&request.topic, &rounds);
        let response = self
            .engine
            .gateway()
            .invoke(
                &chairman,
                &synthesis_prompt,
                Some(BrainstormPrompt::synthesis_system()),
            )
            .await;

        progress.on_task_complete(Stage::Synthesis, &chairman.name, response.is_success());
        progress.on_stage_complete(Stage::Synthesis);

        let synthesis = if response.is_failed() {
            warn!(
                "Brainstorm synthesis by {} failed: {}",
                chairman.name,
                response.error.as_deref().unwrap_or_default()
            );
            BRAINSTORM_SYNTHESIS_FAILED.to_string()
        } else {
            response.response
        };

        Ok(BrainstormResult {
            topic: request.topic,
            style: request.style,
            rounds,
            chairman_model: chairman.name,
            synthesis,
            total_latency_ms: started.elapsed().as_secs_f64() * 1000.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{Reply, ScriptedGateway, default_reply, roster};
    use council_domain::{BrainstormStyle, ChairmanStrategy, CouncilPolicy};

    fn scripted() -> ScriptedGateway {
        ScriptedGateway::with_handler(|backend, prompt, system| {
            let system = system.unwrap_or_default();
            if system.starts_with("You are brainstorming.") {
                Reply::Text(format!(
                    "1. **{0} first**: An idea from {0}\n2. **{0} second**: Another idea from {0}",
                    backend.name
                ))
            } else if system == BrainstormPrompt::cross_pollination_system() {
                Reply::Text(format!("- **{0} hybrid** (combines A#1 + B#1): Mixed by {0}", backend.name))
            } else if system == BrainstormPrompt::synthesis_system() {
                Reply::Text("Three themes emerged".to_string())
            } else {
                default_reply(backend, prompt, Some(system))
            }
        })
    }

    fn use_case(
        gateway: Arc<ScriptedGateway>,
        names: &[&str],
    ) -> RunBrainstormUseCase<ScriptedGateway> {
        let engine = CouncilEngine::new(gateway, roster(names), CouncilPolicy::default());
        RunBrainstormUseCase::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_brainstorm_rounds() {
        let gateway = Arc::new(scripted());
        let request = BrainstormRequest::new("Reduce meeting load", 3, BrainstormStyle::Wild).unwrap();
        let result = use_case(Arc::clone(&gateway), &["a", "b"])
            .execute(request)
            .await
            .unwrap();

        assert_eq!(result.style, BrainstormStyle::Wild);
        assert_eq!(result.rounds.len(), 3);
        assert_eq!(result.initial_ideas().len(), 2);
        assert_eq!(result.initial_ideas()[0].ideas.len(), 2);
        assert_eq!(result.cross_pollination().len(), 2);
        assert_eq!(result.rounds[2].round, 3);
        assert_eq!(result.rounds[2].ideas[1].model_name, "b");
        assert_eq!(result.synthesis, "Three themes emerged");

        let ideation = gateway.calls_with_system(&BrainstormPrompt::ideation_system(BrainstormStyle::Wild));
        assert_eq!(ideation.len(), 2);
        assert!(ideation[0].prompt.contains("Generate 7-10 ideas"));

        // Every cross-pollination round sees the round 1 ideas, anonymized
        let cross = gateway.calls_with_system(BrainstormPrompt::cross_pollination_system());
        assert_eq!(cross.len(), 4);
        assert!(cross[3].prompt.contains("## Round 3: Cross-Pollination"));
        assert!(cross[3].prompt.contains("### Participant A\n1. **a first**: An idea from a\n"));
        assert!(cross[3].prompt.contains("### Participant B\n"));
        assert!(!cross[3].prompt.contains("hybrid"));

        let synthesis = gateway.calls_with_system(BrainstormPrompt::synthesis_system());
        assert_eq!(synthesis.len(), 1);
        assert!(synthesis[0].prompt.contains("## Round 2 Ideas\n\n### a\n"));
        assert!(synthesis[0].prompt.contains("**b hybrid** (combines A#1 + B#1): Mixed by b"));
    }

    #[tokio::test]
    async fn test_single_round_skips_cross_pollination() {
        let gateway = Arc::new(scripted());
        let request = BrainstormRequest::new("Topic", 1, BrainstormStyle::default()).unwrap();
        let result = use_case(Arc::clone(&gateway), &["a", "b"])
            .execute(request)
            .await
            .unwrap();

        assert_eq!(result.rounds.len(), 1);
        assert!(result.cross_pollination().is_empty());
        assert!(
            gateway
                .calls_with_system(BrainstormPrompt::cross_pollination_system())
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_failed_participant_contributes_no_ideas() {
        let gateway = Arc::new(ScriptedGateway::failing(&["b"]));
        let request = BrainstormRequest::new("Topic", 2, BrainstormStyle::Practical).unwrap();
        let result = use_case(gateway, &["a", "b"]).execute(request).await.unwrap();

        assert_eq!(result.rounds[0].responses.len(), 2);
        assert!(result.rounds[0].responses[1].is_failed());
        assert_eq!(result.initial_ideas().len(), 1);
        assert_eq!(result.initial_ideas()[0].model_name, "a");
    }

    #[tokio::test]
    async fn test_synthesis_failure() {
        let gateway = ScriptedGateway::with_handler(|backend, prompt, system| {
            if system == Some(BrainstormPrompt::synthesis_system()) {
                Reply::Fail("Timeout after 5s".to_string())
            } else {
                default_reply(backend, prompt, system)
            }
        });
        let request = BrainstormRequest::new("Topic", 1, BrainstormStyle::Balanced).unwrap();
        let result = use_case(Arc::new(gateway), &["a", "b"])
            .execute(request)
            .await
            .unwrap();

        assert_eq!(result.synthesis, BRAINSTORM_SYNTHESIS_FAILED);
    }

    #[tokio::test]
    async fn test_chairman_rotates_across_sessions() {
        let gateway = Arc::new(scripted());
        let policy = CouncilPolicy {
            chairman_strategy: ChairmanStrategy::Rotating,
            ..CouncilPolicy::default()
        };
        let engine = Arc::new(CouncilEngine::new(gateway, roster(&["a", "b"]), policy));
        let use_case = RunBrainstormUseCase::new(engine);

        let first = use_case
            .execute(BrainstormRequest::new("One", 1, BrainstormStyle::Wild).unwrap())
            .await
            .unwrap();
        let second = use_case
            .execute(BrainstormRequest::new("Two", 1, BrainstormStyle::Wild).unwrap())
            .await
            .unwrap();

        assert_ne!(first.chairman_model, second.chairman_model);
    }

    #[tokio::test]
    async fn test_requires_two_backends() {
        let request = BrainstormRequest::new("Topic", 2, BrainstormStyle::Wild).unwrap();
        let result = use_case(Arc::new(scripted()), &["solo"]).execute(request).await;
        assert!(result.is_err());
    }
}
