//! Concurrent fan-out of one prompt across a roster.

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{BackendConfig, ModelResponse, Stage};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Invoke every backend concurrently and return one response per backend,
/// in roster order.
///
/// Each invocation runs in its own task and writes its own slot. A task
/// that panics leaves its slot empty; the slot is then filled with a failed
/// response and its siblings are unaffected. No retries.
pub async fn fan_out<G: BackendGateway + 'static>(
    gateway: &Arc<G>,
    roster: &[BackendConfig],
    prompt: &str,
    system_prompt: Option<&str>,
    stage: Stage,
    progress: &dyn ProgressNotifier,
) -> Vec<ModelResponse> {
    let mut join_set = JoinSet::new();

    for (index, backend) in roster.iter().enumerate() {
        let gateway = Arc::clone(gateway);
        let backend = backend.clone();
        let prompt = prompt.to_string();
        let system_prompt = system_prompt.map(str::to_string);

        join_set.spawn(async move {
            let response = gateway
                .invoke(&backend, &prompt, system_prompt.as_deref())
                .await;
            (index, response)
        });
    }

    let mut slots: Vec<Option<ModelResponse>> = vec![None; roster.len()];

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, response)) => {
                if let Some(error) = &response.error {
                    warn!("{} failed in {}: {}", response.model_name, stage.as_str(), error);
                } else {
                    debug!(
                        "{} answered in {:.0}ms",
                        response.model_name, response.latency_ms
                    );
                }
                progress.on_task_complete(stage, &response.model_name, response.is_success());
                slots[index] = Some(response);
            }
            Err(e) => {
                warn!("Backend task aborted: {}", e);
            }
        }
    }

    slots
        .into_iter()
        .zip(roster)
        .map(|(slot, backend)| {
            slot.unwrap_or_else(|| {
                progress.on_task_complete(stage, &backend.name, false);
                ModelResponse::failure(&backend.name, "Backend task aborted", 0.0)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use crate::use_cases::testing::{ScriptedGateway, roster};
    use std::time::Duration;

    #[tokio::test]
    async fn test_preserves_roster_order() {
        // Later roster entries answer first
        let gateway = Arc::new(ScriptedGateway::delayed(|backend| match backend {
            "a" => Duration::from_millis(60),
            "b" => Duration::from_millis(30),
            _ => Duration::from_millis(0),
        }));
        let roster = roster(&["a", "b", "c"]);

        let responses =
            fan_out(&gateway, &roster, "Q", None, Stage::Independent, &NoProgress).await;

        let names: Vec<&str> = responses.iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failure_does_not_affect_siblings() {
        let gateway = Arc::new(ScriptedGateway::failing(&["b"]));
        let roster = roster(&["a", "b", "c"]);

        let responses =
            fan_out(&gateway, &roster, "Q", None, Stage::Independent, &NoProgress).await;

        assert!(responses[0].is_success());
        assert!(responses[1].is_failed());
        assert!(responses[2].is_success());
    }

    #[tokio::test]
    async fn test_panicking_backend_becomes_failure() {
        let gateway = Arc::new(ScriptedGateway::panicking("a"));
        let roster = roster(&["a", "b"]);

        let responses =
            fan_out(&gateway, &roster, "Q", None, Stage::Independent, &NoProgress).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].model_name, "a");
        assert_eq!(responses[0].error.as_deref(), Some("Backend task aborted"));
        assert!(responses[1].is_success());
    }

    #[tokio::test]
    async fn test_runs_concurrently() {
        let gateway = Arc::new(ScriptedGateway::delayed(|_| Duration::from_millis(100)));
        let roster = roster(&["a", "b", "c", "d"]);

        let started = std::time::Instant::now();
        fan_out(&gateway, &roster, "Q", None, Stage::Independent, &NoProgress).await;

        assert!(started.elapsed() < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_empty_roster() {
        let gateway = Arc::new(ScriptedGateway::new());
        let responses = fan_out(&gateway, &[], "Q", None, Stage::Independent, &NoProgress).await;
        assert!(responses.is_empty());
    }
}
