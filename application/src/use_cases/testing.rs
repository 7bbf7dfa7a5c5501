//! Scripted gateway shared by the use case tests.

use crate::ports::backend_gateway::BackendGateway;
use async_trait::async_trait;
use council_domain::{BackendConfig, ModelResponse, PromptTemplate, Provider};
use std::sync::Mutex;
use std::time::Duration;

pub enum Reply {
    Text(String),
    Fail(String),
    Panic,
}

#[derive(Debug, Clone)]
pub struct Call {
    pub model: String,
    pub prompt: String,
    pub system_prompt: Option<String>,
}

type Handler = Box<dyn Fn(&BackendConfig, &str, Option<&str>) -> Reply + Send + Sync>;
type Delay = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// Gateway whose replies are computed from the request.
///
/// The default script answers stage 1 with "Answer from <name>", reviews
/// every `### Response X` it is shown with a uniform score of 7, and
/// answers the chairman with "Synthesized answer".
pub struct ScriptedGateway {
    handler: Handler,
    delay: Delay,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::with_handler(default_reply)
    }

    pub fn with_handler(
        handler: impl Fn(&BackendConfig, &str, Option<&str>) -> Reply + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            delay: Box::new(|_| Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Named backends fail every call
    pub fn failing(names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Self::with_handler(move |backend, prompt, system| {
            if names.contains(&backend.name) {
                Reply::Fail("scripted failure".to_string())
            } else {
                default_reply(backend, prompt, system)
            }
        })
    }

    pub fn panicking(name: &str) -> Self {
        let name = name.to_string();
        Self::with_handler(move |backend, prompt, system| {
            if backend.name == name {
                Reply::Panic
            } else {
                default_reply(backend, prompt, system)
            }
        })
    }

    pub fn delayed(delay: impl Fn(&str) -> Duration + Send + Sync + 'static) -> Self {
        let mut gateway = Self::new();
        gateway.delay = Box::new(delay);
        gateway
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls made with the given system prompt
    pub fn calls_with_system(&self, system: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.system_prompt.as_deref() == Some(system))
            .collect()
    }
}

#[async_trait]
impl BackendGateway for ScriptedGateway {
    async fn invoke(
        &self,
        backend: &BackendConfig,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> ModelResponse {
        self.calls.lock().unwrap().push(Call {
            model: backend.name.clone(),
            prompt: prompt.to_string(),
            system_prompt: system_prompt.map(str::to_string),
        });

        let delay = (self.delay)(&backend.name);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match (self.handler)(backend, prompt, system_prompt) {
            Reply::Text(text) => ModelResponse::success(&backend.name, text, 1.0),
            Reply::Fail(error) => ModelResponse::failure(&backend.name, error, 1.0),
            Reply::Panic => panic!("scripted panic in {}", backend.name),
        }
    }
}

pub fn default_reply(backend: &BackendConfig, prompt: &str, system: Option<&str>) -> Reply {
    if system == Some(PromptTemplate::review_system()) {
        Reply::Text(review_json(&shown_labels(prompt), 7))
    } else if system == Some(PromptTemplate::synthesis_system()) {
        Reply::Text("Synthesized answer".to_string())
    } else {
        Reply::Text(format!("Answer from {}", backend.name))
    }
}

/// Anonymous labels listed in a review prompt
pub fn shown_labels(prompt: &str) -> Vec<String> {
    prompt
        .lines()
        .filter_map(|line| line.strip_prefix("### "))
        .filter(|heading| heading.starts_with("Response "))
        .map(str::to_string)
        .collect()
}

/// A well-formed review giving every default criterion `score`
pub fn review_json(labels: &[String], score: u32) -> String {
    let evaluations: Vec<serde_json::Value> = labels
        .iter()
        .map(|label| {
            serde_json::json!({
                "response_id": label,
                "scores": {
                    "accuracy": score,
                    "completeness": score,
                    "clarity": score,
                    "insight": score,
                },
                "strengths": ["clear"],
                "weaknesses": ["brief"],
            })
        })
        .collect();

    let body = serde_json::json!({ "evaluations": evaluations, "ranking": labels });
    format!("```json\n{}\n```", body)
}

pub fn roster(names: &[&str]) -> Vec<BackendConfig> {
    names
        .iter()
        .map(|n| BackendConfig::new(*n, Provider::OpenAi))
        .collect()
}
