//! Backend roster from TOML (`[[models]]` array)

use crate::providers::with_provider_defaults;
use council_domain::{BackendConfig, ConfigIssue, ConfigIssueCode, InvocationMode, Provider};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One `[[models]]` entry
///
/// ```toml
/// [[models]]
/// name = "gpt"
/// provider = "openai"
/// endpoint = "https://api.openai.com/v1/chat/completions"
/// model = "gpt-4o"
/// api_key_env = "OPENAI_API_KEY"
/// enabled = true
/// mode = "auto"          # "cli" or "http" to pin a transport
/// ```
///
/// `endpoint`, `model` and `api_key_env` fall back to provider defaults
/// when left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileModelConfig {
    pub name: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key_env: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub mode: InvocationMode,
}

fn default_enabled() -> bool {
    true
}

impl FileModelConfig {
    pub fn new(name: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: provider.into(),
            endpoint: String::new(),
            model: String::new(),
            api_key_env: String::new(),
            enabled: true,
            mode: InvocationMode::Auto,
        }
    }

    pub fn provider(&self) -> Provider {
        let Ok(provider) = self.provider.parse::<Provider>();
        provider
    }

    /// Domain backend with provider defaults filled in
    pub fn to_backend(&self) -> BackendConfig {
        let backend = BackendConfig {
            name: self.name.trim().to_string(),
            provider: self.provider(),
            endpoint: self.endpoint.trim().to_string(),
            model: self.model.trim().to_string(),
            api_key_env: self.api_key_env.trim().to_string(),
            enabled: self.enabled,
            mode: self.mode,
        };
        with_provider_defaults(&backend)
    }
}

/// Default council: one backend per CLI-capable provider
pub fn default_models() -> Vec<FileModelConfig> {
    vec![
        FileModelConfig::new("gpt", "openai"),
        FileModelConfig::new("gemini", "google"),
        FileModelConfig::new("claude", "anthropic"),
    ]
}

/// Empty names, duplicate names and unknown providers
pub fn model_issues(models: &[FileModelConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, model) in models.iter().enumerate() {
        let name = model.name.trim();
        if name.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName,
                format!("models[{}]: model name cannot be empty", index),
            ));
            continue;
        }
        if !seen.insert(name) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::DuplicateModelName,
                format!("models[{}]: duplicate model name '{}'", index, name),
            ));
        }
        if !model.provider().is_known() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::UnknownProvider,
                format!(
                    "models.{}: unknown provider '{}', calls will fail",
                    name, model.provider
                ),
            ));
        }
    }

    issues
}
