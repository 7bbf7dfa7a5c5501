//! Backend gateway port
//!
//! Defines how the application layer reaches a single model backend.

use async_trait::async_trait;
use council_domain::{BackendConfig, ModelResponse};
use thiserror::Error;

/// Errors raised while invoking one backend.
///
/// These never escape [`BackendGateway::invoke`]; adapters turn them into
/// the error text of a failed [`ModelResponse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Missing API key: {var} (and no CLI available)")]
    MissingCredential { var: String },

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("{tool} failed: {reason}")]
    CliFailed { tool: String, reason: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected response format: {0}")]
    InvalidResponse(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("No endpoint configured for {0}")]
    MissingEndpoint(String),

    #[error("No transport available for {0}")]
    NoTransport(String),
}

/// Gateway for backend invocation
///
/// Implementations (adapters) live in the infrastructure layer. An
/// invocation never fails: transport errors, timeouts and missing
/// credentials come back as a failed [`ModelResponse`] so one backend
/// cannot sink a whole stage.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send `prompt` to `backend` and wait for its answer
    async fn invoke(
        &self,
        backend: &BackendConfig,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> ModelResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            GatewayError::MissingCredential {
                var: "OPENAI_API_KEY".to_string()
            }
            .to_string(),
            "Missing API key: OPENAI_API_KEY (and no CLI available)"
        );
        assert_eq!(GatewayError::Timeout(120).to_string(), "Timeout after 120s");
        assert_eq!(
            GatewayError::HttpStatus {
                status: 429,
                body: "rate limited".to_string()
            }
            .to_string(),
            "HTTP 429: rate limited"
        );
    }
}
