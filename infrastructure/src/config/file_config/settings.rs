//! Generation settings from TOML (`[settings]` section)

use council_domain::GenerationSettings;
use serde::{Deserialize, Serialize};

/// Raw generation settings
///
/// ```toml
/// [settings]
/// timeout_seconds = 120
/// max_tokens = 4096
/// temperature = 0.7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSettingsConfig {
    /// Bound on each CLI run or HTTP round trip
    pub timeout_seconds: u64,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Working directory for CLI tools
    pub workdir: String,
}

impl Default for FileSettingsConfig {
    fn default() -> Self {
        let defaults = GenerationSettings::default();
        Self {
            timeout_seconds: defaults.timeout_seconds,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
            workdir: defaults.workdir,
        }
    }
}

impl FileSettingsConfig {
    pub fn to_generation_settings(&self) -> GenerationSettings {
        GenerationSettings {
            timeout_seconds: self.timeout_seconds,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            workdir: self.workdir.clone(),
        }
    }
}
