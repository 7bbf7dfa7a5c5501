//! HTTP API clients, one per provider family
//!
//! Each client turns a [`CompletionRequest`] into the provider's wire format
//! and extracts plain text from the reply. Clients are resolved through a
//! [`ProviderRegistry`] built once per process.

pub mod anthropic;
pub mod google;
pub mod openai;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_server;

pub use anthropic::AnthropicClient;
pub use google::GoogleClient;
pub use openai::OpenAiClient;
pub use registry::ProviderRegistry;

use async_trait::async_trait;
use council_application::GatewayError;
use council_domain::core::string::truncate;
use council_domain::{BackendConfig, Provider};
use serde::de::DeserializeOwned;

/// Characters of an error body kept in [`GatewayError::HttpStatus`]
const BODY_EXCERPT_CHARS: usize = 200;

/// Everything a provider needs for one completion
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub endpoint: &'a str,
    pub model: &'a str,
    pub api_key: &'a str,
    pub prompt: &'a str,
    pub system_prompt: Option<&'a str>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// One provider's HTTP protocol
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Send one completion request and return the reply text
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, GatewayError>;
}

/// Built-in endpoint, model and credential variable for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDefaults {
    pub endpoint: &'static str,
    pub model: &'static str,
    pub api_key_env: &'static str,
}

/// Defaults for providers with a well-known public API
pub fn provider_defaults(provider: &Provider) -> Option<ProviderDefaults> {
    let defaults = match provider {
        Provider::OpenAi => ProviderDefaults {
            endpoint: "https://api.openai.com/v1/chat/completions",
            model: "gpt-4o",
            api_key_env: "OPENAI_API_KEY",
        },
        Provider::Google => ProviderDefaults {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent",
            model: "gemini-2.0-flash",
            api_key_env: "GOOGLE_API_KEY",
        },
        Provider::Anthropic => ProviderDefaults {
            endpoint: "https://api.anthropic.com/v1/messages",
            model: "claude-sonnet-4-20250514",
            api_key_env: "ANTHROPIC_API_KEY",
        },
        Provider::DeepSeek => ProviderDefaults {
            endpoint: "https://api.deepseek.com/chat/completions",
            model: "deepseek-chat",
            api_key_env: "DEEPSEEK_API_KEY",
        },
        Provider::OpenAiCompatible | Provider::Other(_) => return None,
    };
    Some(defaults)
}

/// Fill empty endpoint, model and credential fields from provider defaults
pub fn with_provider_defaults(backend: &BackendConfig) -> BackendConfig {
    let mut resolved = backend.clone();
    if let Some(defaults) = provider_defaults(&backend.provider) {
        if resolved.endpoint.is_empty() {
            resolved.endpoint = defaults.endpoint.to_string();
        }
        if resolved.model.is_empty() {
            resolved.model = defaults.model.to_string();
        }
        if resolved.api_key_env.is_empty() {
            resolved.api_key_env = defaults.api_key_env.to_string();
        }
    }
    resolved
}

/// Send a prepared request and decode a JSON reply.
///
/// Non-2xx replies become [`GatewayError::HttpStatus`] with a body excerpt.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::HttpStatus {
            status: status.as_u16(),
            body: truncate(body.trim(), BODY_EXCERPT_CHARS),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_known_providers() {
        for provider in [
            Provider::OpenAi,
            Provider::Google,
            Provider::Anthropic,
            Provider::DeepSeek,
        ] {
            let defaults = provider_defaults(&provider).unwrap();
            assert!(defaults.endpoint.starts_with("https://"));
            assert!(defaults.api_key_env.ends_with("_API_KEY"));
        }
        assert!(provider_defaults(&Provider::OpenAiCompatible).is_none());
    }

    #[test]
    fn test_with_provider_defaults_fills_only_empty_fields() {
        let backend = BackendConfig::new("claude", Provider::Anthropic).with_model("claude-opus-4");
        let resolved = with_provider_defaults(&backend);

        assert_eq!(resolved.model, "claude-opus-4");
        assert_eq!(resolved.endpoint, "https://api.anthropic.com/v1/messages");
        assert_eq!(resolved.api_key_env, "ANTHROPIC_API_KEY");
    }

    #[test]
    fn test_with_provider_defaults_leaves_compatible_untouched() {
        let backend = BackendConfig::new("local", Provider::OpenAiCompatible);
        assert_eq!(with_provider_defaults(&backend), backend);
    }
}
