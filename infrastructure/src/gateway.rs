//! Backend gateway: local CLI first, HTTP API as fallback

use crate::backends::cli_tools::{combine_prompt, invoke_tool};
use crate::backends::{CliCapabilities, CliTool};
use crate::providers::{CompletionRequest, ProviderRegistry, with_provider_defaults};
use async_trait::async_trait;
use council_application::{BackendGateway, GatewayError};
use council_domain::{BackendConfig, GenerationSettings, ModelResponse};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Where API keys come from
pub trait CredentialSource: Send + Sync {
    /// Value of `var`, or `None` when unset or blank
    fn get(&self, var: &str) -> Option<String>;
}

/// Reads credentials from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed credential table
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, var: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(var.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, var: &str) -> Option<String> {
        self.values.get(var).filter(|v| !v.trim().is_empty()).cloned()
    }
}

/// [`BackendGateway`] that tries the provider's CLI tool, then its HTTP API.
///
/// Each transport attempt is bounded by `settings.timeout_seconds`.
pub struct FallbackGateway {
    capabilities: CliCapabilities,
    registry: ProviderRegistry,
    credentials: Arc<dyn CredentialSource>,
    settings: GenerationSettings,
}

impl FallbackGateway {
    /// Gateway with detected CLI tools, built-in clients and env credentials
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            capabilities: CliCapabilities::detect(),
            registry: ProviderRegistry::with_defaults(reqwest::Client::new()),
            credentials: Arc::new(EnvCredentials),
            settings,
        }
    }

    pub fn with_capabilities(mut self, capabilities: CliCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialSource>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn capabilities(&self) -> &CliCapabilities {
        &self.capabilities
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// CLI tool usable for this backend, if any
    fn cli_tool(&self, backend: &BackendConfig) -> Option<(CliTool, &std::path::Path)> {
        if !backend.mode.allows_cli() {
            return None;
        }
        let tool = CliTool::for_provider(&backend.provider)?;
        self.capabilities.path(tool).map(|path| (tool, path))
    }

    async fn call_http(
        &self,
        backend: &BackendConfig,
        prompt: &str,
        system_prompt: Option<&str>,
        api_key: &str,
    ) -> Result<String, GatewayError> {
        if backend.endpoint.is_empty() {
            return Err(GatewayError::MissingEndpoint(backend.name.clone()));
        }
        let client = self.registry.resolve(&backend.provider)?;

        let request = CompletionRequest {
            endpoint: &backend.endpoint,
            model: &backend.model,
            api_key,
            prompt,
            system_prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        debug!("{}: POST {} via {}", backend.name, backend.endpoint, client.name());
        match tokio::time::timeout(self.settings.timeout(), client.complete(&request)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.settings.timeout_seconds)),
        }
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[async_trait]
impl BackendGateway for FallbackGateway {
    async fn invoke(
        &self,
        backend: &BackendConfig,
        prompt: &str,
        system_prompt: Option<&str>,
    ) -> ModelResponse {
        let backend = with_provider_defaults(backend);
        let started = Instant::now();
        let mut cli_error = None;

        if let Some((tool, path)) = self.cli_tool(&backend) {
            debug!("{}: invoking {}", backend.name, tool);
            let combined = combine_prompt(prompt, system_prompt);
            match invoke_tool(tool, path, &combined, &self.settings).await {
                Ok(text) => return ModelResponse::success(&backend.name, text, elapsed_ms(started)),
                Err(e) => {
                    warn!("{}: {} unusable, {}", backend.name, tool, e);
                    cli_error = Some(e);
                }
            }
        }

        if !backend.mode.allows_http() {
            let error = cli_error.unwrap_or_else(|| GatewayError::NoTransport(backend.name.clone()));
            return ModelResponse::failure(&backend.name, error.to_string(), elapsed_ms(started));
        }

        let Some(api_key) = self.credentials.get(&backend.api_key_env) else {
            let error = GatewayError::MissingCredential {
                var: backend.api_key_env.clone(),
            };
            warn!("{}: {}", backend.name, error);
            return ModelResponse::failure(&backend.name, error.to_string(), 0.0);
        };

        match self
            .call_http(&backend, prompt, system_prompt, &api_key)
            .await
        {
            Ok(text) => ModelResponse::success(&backend.name, text, elapsed_ms(started)),
            Err(e) => {
                warn!("{}: {}", backend.name, e);
                ModelResponse::failure(&backend.name, e.to_string(), elapsed_ms(started))
            }
        }
    }
}
