//! Backend value objects: which model to call, and how.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// AI provider behind a backend (Value Object)
///
/// Determines both the local CLI tool that may serve the backend and the
/// HTTP request/response shape used for the API fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Google,
    Anthropic,
    DeepSeek,
    /// Any OpenAI chat-completions compatible endpoint
    OpenAiCompatible,
    /// Provider string not known to this build
    Other(String),
}

impl Provider {
    pub fn as_str(&self) -> &str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Google => "google",
            Provider::Anthropic => "anthropic",
            Provider::DeepSeek => "deepseek",
            Provider::OpenAiCompatible => "openai-compatible",
            Provider::Other(s) => s,
        }
    }

    /// Whether this build knows how to talk to the provider at all
    pub fn is_known(&self) -> bool {
        !matches!(self, Provider::Other(_))
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "openai" => Provider::OpenAi,
            "google" | "gemini" => Provider::Google,
            "anthropic" => Provider::Anthropic,
            "deepseek" => Provider::DeepSeek,
            "openai-compatible" | "openai_compatible" => Provider::OpenAiCompatible,
            _ => Provider::Other(s.to_string()),
        })
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(provider) = s.parse::<Provider>();
        Ok(provider)
    }
}

/// Which transports the invoker may use for a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationMode {
    /// Local CLI tool first, HTTP API on unavailability or failure
    #[default]
    Auto,
    /// Local CLI tool only
    Cli,
    /// HTTP API only
    Http,
}

impl InvocationMode {
    pub fn allows_cli(&self) -> bool {
        matches!(self, InvocationMode::Auto | InvocationMode::Cli)
    }

    pub fn allows_http(&self) -> bool {
        matches!(self, InvocationMode::Auto | InvocationMode::Http)
    }
}

/// One configured backend (Value Object)
///
/// Immutable for the lifetime of an engine. Loaded by the configuration
/// layer; the domain never reads files or the environment itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Display and identity name, unique within a roster
    pub name: String,
    pub provider: Provider,
    /// HTTP endpoint for the API fallback
    #[serde(default)]
    pub endpoint: String,
    /// Provider-side model identifier
    #[serde(default)]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default)]
    pub api_key_env: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: InvocationMode,
}

fn default_enabled() -> bool {
    true
}

impl BackendConfig {
    pub fn new(name: impl Into<String>, provider: Provider) -> Self {
        Self {
            name: name.into(),
            provider,
            endpoint: String::new(),
            model: String::new(),
            api_key_env: String::new(),
            enabled: true,
            mode: InvocationMode::Auto,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    pub fn with_mode(mut self, mode: InvocationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl std::fmt::Display for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Generation parameters shared by every backend call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Bound on each transport attempt
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Working directory handed to CLI tools
    pub workdir: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            max_tokens: 4096,
            temperature: 0.7,
            workdir: ".".to_string(),
        }
    }
}

impl GenerationSettings {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}
