//! Configuration issues.
//!
//! Loading never fails on a questionable value; instead the loader reports
//! a list of [`ConfigIssue`]s and the caller decides. Any
//! [`Severity::Error`] aborts before a deliberation starts.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the council cannot run with this configuration.
    Error,
    /// Non-fatal: the council runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A `[[models]]` entry has an empty name.
    EmptyModelName,
    /// Two `[[models]]` entries share a name.
    DuplicateModelName,
    /// Provider string is not one the HTTP layer knows.
    UnknownProvider,
    /// `chairman_strategy` is neither `fixed` nor `rotating`.
    InvalidChairmanStrategy,
    /// Fixed strategy without `chairman_fixed_model`.
    FixedChairmanMissing,
    /// Fixed chairman is not an enabled model; rotation is used instead.
    FixedChairmanNotInRoster,
    /// Scoring rubric has no criteria.
    EmptyCriteria,
    /// Scoring scale below 2.
    ScaleTooSmall,
    /// Fewer than two enabled models.
    TooFewEnabledModels,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

/// Whether any issue is fatal
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_detects_error() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::UnknownProvider, "unknown provider 'x'"),
            ConfigIssue::error(ConfigIssueCode::EmptyCriteria, "no criteria"),
        ];
        assert!(has_errors(&issues));
    }

    #[test]
    fn warnings_only_are_not_fatal() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::FixedChairmanNotInRoster,
            "chairman 'x' not enabled",
        )];
        assert!(!has_errors(&issues));
        assert!(!has_errors(&[]));
    }

    #[test]
    fn display_includes_level() {
        let issue = ConfigIssue::error(ConfigIssueCode::ScaleTooSmall, "scale must be at least 2");
        assert_eq!(issue.to_string(), "error: scale must be at least 2");
    }
}
