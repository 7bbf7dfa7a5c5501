//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain types on demand.

mod council;
mod models;
mod output;
mod settings;

pub use council::{FileCouncilConfig, FilePeerReviewConfig, FileScoringConfig};
pub use models::{FileModelConfig, default_models};
pub use output::FileOutputConfig;
pub use settings::FileSettingsConfig;

use council_domain::{
    BackendConfig, ChairmanStrategy, ConfigIssue, ConfigIssueCode, CouncilPolicy,
    GenerationSettings,
};
use serde::{Deserialize, Serialize};

/// Minimum enabled models for a deliberation
const MIN_ENABLED_MODELS: usize = 2;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Generation settings shared by every backend
    pub settings: FileSettingsConfig,
    /// Chairman and peer review policy
    pub council: FileCouncilConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Backend roster; a file that sets it replaces the default roster
    pub models: Vec<FileModelConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            settings: FileSettingsConfig::default(),
            council: FileCouncilConfig::default(),
            output: FileOutputConfig::default(),
            models: default_models(),
        }
    }
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks model names and providers, the chairman strategy, the scoring
    /// rubric and the size of the enabled roster.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = models::model_issues(&self.models);

        let (strategy, strategy_issues) = self.council.parse_strategy();
        issues.extend(strategy_issues);

        let enabled: Vec<&str> = self
            .models
            .iter()
            .filter(|m| m.enabled)
            .map(|m| m.name.trim())
            .collect();

        if strategy == ChairmanStrategy::Fixed {
            match self.council.chairman_fixed_model.as_deref().map(str::trim) {
                None | Some("") => issues.push(ConfigIssue::error(
                    ConfigIssueCode::FixedChairmanMissing,
                    "council.chairman_fixed_model: required when chairman_strategy is 'fixed'",
                )),
                Some(name) if !enabled.contains(&name) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::FixedChairmanNotInRoster,
                    format!(
                        "council.chairman_fixed_model: '{}' is not an enabled model, rotating instead",
                        name
                    ),
                )),
                Some(_) => {}
            }
        }

        issues.extend(self.council.scoring_issues());

        if enabled.len() < MIN_ENABLED_MODELS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::TooFewEnabledModels,
                format!(
                    "models: at least {} enabled models are required (found {})",
                    MIN_ENABLED_MODELS,
                    enabled.len()
                ),
            ));
        }

        issues
    }

    /// Every configured backend, disabled ones included
    pub fn roster(&self) -> Vec<BackendConfig> {
        self.models.iter().map(FileModelConfig::to_backend).collect()
    }

    pub fn policy(&self) -> CouncilPolicy {
        self.council.to_policy()
    }

    pub fn generation_settings(&self) -> GenerationSettings {
        self.settings.to_generation_settings()
    }

    /// Keep only the named models enabled
    ///
    /// Returns the names that matched nothing.
    pub fn restrict_models(&mut self, names: &[String]) -> Vec<String> {
        let wanted: Vec<&str> = names.iter().map(|n| n.trim()).collect();
        for model in &mut self.models {
            model.enabled = wanted.contains(&model.name.trim());
        }
        wanted
            .into_iter()
            .filter(|w| !self.models.iter().any(|m| m.name.trim() == *w))
            .map(str::to_string)
            .collect()
    }
}
