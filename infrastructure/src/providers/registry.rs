//! Provider → client lookup, built once per process

use super::{AnthropicClient, GoogleClient, OpenAiClient, ProviderClient};
use council_application::GatewayError;
use council_domain::Provider;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps each provider to the client that speaks its protocol
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in client sharing one connection pool
    pub fn with_defaults(http: reqwest::Client) -> Self {
        let openai: Arc<dyn ProviderClient> = Arc::new(OpenAiClient::new(http.clone()));

        Self::new()
            .register(Provider::OpenAi, Arc::clone(&openai))
            .register(Provider::DeepSeek, Arc::clone(&openai))
            .register(Provider::OpenAiCompatible, openai)
            .register(Provider::Google, Arc::new(GoogleClient::new(http.clone())))
            .register(Provider::Anthropic, Arc::new(AnthropicClient::new(http)))
    }

    pub fn register(mut self, provider: Provider, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert(provider, client);
        self
    }

    /// Client for a provider, or [`GatewayError::UnsupportedProvider`]
    pub fn resolve(&self, provider: &Provider) -> Result<Arc<dyn ProviderClient>, GatewayError> {
        self.clients
            .get(provider)
            .cloned()
            .ok_or_else(|| GatewayError::UnsupportedProvider(provider.to_string()))
    }

    pub fn supports(&self, provider: &Provider) -> bool {
        self.clients.contains_key(provider)
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut providers: Vec<&str> = self.clients.keys().map(Provider::as_str).collect();
        providers.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &providers)
            .finish()
    }
}
