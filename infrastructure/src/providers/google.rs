//! Google Gemini `generateContent` protocol

use super::{CompletionRequest, ProviderClient, send_json};
use crate::backends::cli_tools::combine_prompt;
use async_trait::async_trait;
use council_application::GatewayError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Key-in-query Gemini client
///
/// The API has no separate system channel here, so the system prompt is
/// prepended to the user text.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
}

impl GoogleClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

fn build_body(request: &CompletionRequest<'_>) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: combine_prompt(request.prompt, request.system_prompt),
            }],
        }],
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
        },
    }
}

#[async_trait]
impl ProviderClient for GoogleClient {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, GatewayError> {
        let reply: GenerateResponse = send_json(
            self.http
                .post(request.endpoint)
                .query(&[("key", request.api_key)])
                .json(&build_body(request)),
        )
        .await?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                GatewayError::InvalidResponse("no candidates[0].content.parts[0].text".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_server::{TestServer, http_client};

    fn request<'a>(endpoint: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            endpoint,
            model: "gemini-2.0-flash",
            api_key: "g-test",
            prompt: "Question",
            system_prompt: Some("System"),
            max_tokens: 256,
            temperature: 0.5,
        }
    }

    #[tokio::test]
    async fn test_complete() {
        let server = TestServer::respond_once(
            200,
            r#"{"candidates":[{"content":{"parts":[{"text":"Gemini says hi"}],"role":"model"}}]}"#,
        )
        .await;

        let text = GoogleClient::new(http_client())
            .complete(&request(&server.url))
            .await
            .unwrap();
        assert_eq!(text, "Gemini says hi");

        let received = server.received().await;
        assert!(received.head.starts_with("post /v1/complete?key=g-test"));

        let body = received.json();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "System\n\nQuestion");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[tokio::test]
    async fn test_blocked_reply_is_invalid() {
        let server =
            TestServer::respond_once(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).await;

        let err = GoogleClient::new(http_client())
            .complete(&request(&server.url))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_server_error() {
        let server = TestServer::respond_once(503, "overloaded").await;

        let err = GoogleClient::new(http_client())
            .complete(&request(&server.url))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503: overloaded");
    }
}
