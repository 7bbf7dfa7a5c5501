//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use council_domain::ConfigIssue;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application directory under the user config dir
const APP_DIR: &str = "llm-council";

/// Project-level file names, first match wins
const PROJECT_FILES: [&str; 2] = ["council.toml", ".council.toml"];

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "LLM_COUNCIL_";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Files that take part in a load, lowest priority first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
}

impl ConfigSources {
    /// Existing global and project files, plus the explicit path
    pub fn discover(explicit: Option<&Path>) -> Self {
        Self {
            global: ConfigLoader::global_config_path().filter(|p| p.exists()),
            project: ConfigLoader::project_config_path_in(Path::new(".")),
            explicit: explicit.map(Path::to_path_buf),
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `LLM_COUNCIL_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/llm-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::load_sources(&ConfigSources::discover(config_path), ENV_PREFIX)
    }

    /// Load from the given files and environment prefix
    pub fn load_sources(sources: &ConfigSources, env_prefix: &str) -> Result<FileConfig, ConfigError> {
        if let Some(path) = &sources.explicit
            && !path.exists()
        {
            return Err(ConfigError::NotFound(path.clone()));
        }

        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [&sources.global, &sources.project, &sources.explicit]
            .into_iter()
            .flatten()
        {
            tracing::debug!("Merging config from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(env_prefix).split("__"));

        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Reject configurations with error-level issues
    ///
    /// Warnings are returned for the caller to report.
    pub fn check(config: &FileConfig) -> Result<Vec<ConfigIssue>, ConfigError> {
        let issues = config.validate();
        if council_domain::config::has_errors(&issues) {
            Err(ConfigError::Invalid(
                issues.into_iter().filter(ConfigIssue::is_error).collect(),
            ))
        } else {
            Ok(issues)
        }
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/llm-council/config.toml` when set, otherwise the
    /// platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::config_dir)
            .map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file in `dir` (if it exists)
    pub fn project_config_path_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(sources: &ConfigSources) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] Environment: {}*", ENV_PREFIX);

        match &sources.explicit {
            Some(path) => println!("  [FOUND] Explicit: {}", path.display()),
            None => println!("  [     ] Explicit: --config <path>"),
        }

        match &sources.project {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./council.toml or ./.council.toml"),
        }

        match (&sources.global, Self::global_config_path()) {
            (Some(path), _) => println!("  [FOUND] Global:  {}", path.display()),
            (None, Some(path)) => println!("  [     ] Global:  {}", path.display()),
            (None, None) => {}
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{ChairmanStrategy, ConfigIssueCode};
    use std::fs;

    /// Prefix no real environment sets
    const NO_ENV: &str = "LLM_COUNCIL_LOADER_TEST_UNUSED_";

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.models.len(), 3);
        assert!(config.council.peer_review.enabled);
    }

    #[test]
    fn test_no_files_gives_defaults() {
        let config = ConfigLoader::load_sources(&ConfigSources::default(), NO_ENV).unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("council.toml");
        let explicit = dir.path().join("explicit.toml");

        fs::write(
            &global,
            "[settings]\ntimeout_seconds = 10\nmax_tokens = 100\ntemperature = 0.1\n",
        )
        .unwrap();
        fs::write(&project, "[settings]\ntimeout_seconds = 20\nmax_tokens = 200\n").unwrap();
        fs::write(&explicit, "[settings]\ntimeout_seconds = 30\n").unwrap();

        let sources = ConfigSources {
            global: Some(global),
            project: Some(project),
            explicit: Some(explicit),
        };
        let settings = ConfigLoader::load_sources(&sources, NO_ENV)
            .unwrap()
            .generation_settings();

        assert_eq!(settings.timeout_seconds, 30);
        assert_eq!(settings.max_tokens, 200);
        assert!((settings.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn test_models_replace_default_roster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("council.toml");
        fs::write(
            &path,
            r#"
[[models]]
name = "a"
provider = "openai"

[[models]]
name = "b"
provider = "deepseek"
"#,
        )
        .unwrap();

        let sources = ConfigSources {
            project: Some(path),
            ..Default::default()
        };
        let config = ConfigLoader::load_sources(&sources, NO_ENV).unwrap();
        let names: Vec<_> = config.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_env_overrides_files() {
        let prefix = "LLM_COUNCIL_LOADER_TEST_ENV_";
        // SAFETY: the variable name is unique to this test
        unsafe {
            std::env::set_var(format!("{}SETTINGS__TIMEOUT_SECONDS", prefix), "7");
            std::env::set_var(format!("{}COUNCIL__CHAIRMAN_STRATEGY", prefix), "fixed");
        }

        let config = ConfigLoader::load_sources(&ConfigSources::default(), prefix).unwrap();

        assert_eq!(config.settings.timeout_seconds, 7);
        assert_eq!(config.council.parse_strategy().0, ChairmanStrategy::Fixed);
    }

    #[test]
    fn test_missing_explicit_file() {
        let sources = ConfigSources {
            explicit: Some(PathBuf::from("/nonexistent/council.toml")),
            ..Default::default()
        };
        let err = ConfigLoader::load_sources(&sources, NO_ENV).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[settings]\ntimeout_seconds = \"soon\"\n").unwrap();

        let sources = ConfigSources {
            explicit: Some(path),
            ..Default::default()
        };
        let err = ConfigLoader::load_sources(&sources, NO_ENV).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn test_project_file_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_path_in(dir.path()).is_none());

        fs::write(dir.path().join(".council.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_path_in(dir.path()),
            Some(dir.path().join(".council.toml"))
        );

        fs::write(dir.path().join("council.toml"), "").unwrap();
        assert_eq!(
            ConfigLoader::project_config_path_in(dir.path()),
            Some(dir.path().join("council.toml"))
        );
    }

    #[test]
    fn test_check_rejects_errors() {
        let mut config = FileConfig::default();
        config.models.truncate(1);

        match ConfigLoader::check(&config) {
            Err(ConfigError::Invalid(issues)) => {
                assert_eq!(issues[0].code, ConfigIssueCode::TooFewEnabledModels);
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn test_global_config_path() {
        let path = ConfigLoader::global_config_path();
        if let Some(path) = path {
            assert!(path.ends_with("llm-council/config.toml"));
        }
    }
}
