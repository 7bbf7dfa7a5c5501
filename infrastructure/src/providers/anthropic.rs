//! Anthropic Messages protocol

use super::{CompletionRequest, ProviderClient, send_json};
use async_trait::async_trait;
use council_application::GatewayError;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

/// `x-api-key` authenticated Messages client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, GatewayError> {
        let body = MessagesRequest {
            model: request.model,
            max_tokens: request.max_tokens,
            messages: vec![Message {
                role: "user",
                content: request.prompt,
            }],
            system: request.system_prompt,
        };

        let reply: MessagesResponse = send_json(
            self.http
                .post(request.endpoint)
                .header("x-api-key", request.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )
        .await?;

        reply
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| GatewayError::InvalidResponse("no content[0].text".to_string()))
    }
}
