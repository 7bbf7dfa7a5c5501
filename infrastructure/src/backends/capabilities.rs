//! Local CLI tool detection
//!
//! Probes `PATH` once for the provider CLIs and records what was found.
//! The resulting table is injected into the gateway so every invocation
//! sees the same answer without re-probing.

use council_domain::Provider;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A provider CLI that can answer a prompt non-interactively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliTool {
    Codex,
    Gemini,
    Claude,
}

impl CliTool {
    pub const ALL: [CliTool; 3] = [CliTool::Codex, CliTool::Gemini, CliTool::Claude];

    /// Executable name looked up on `PATH`
    pub fn command(&self) -> &'static str {
        match self {
            CliTool::Codex => "codex",
            CliTool::Gemini => "gemini",
            CliTool::Claude => "claude",
        }
    }

    /// Human-readable name used in error messages
    pub fn display_name(&self) -> &'static str {
        match self {
            CliTool::Codex => "Codex",
            CliTool::Gemini => "Gemini",
            CliTool::Claude => "Claude",
        }
    }

    /// CLI serving a provider, if one exists
    pub fn for_provider(provider: &Provider) -> Option<CliTool> {
        match provider {
            Provider::OpenAi => Some(CliTool::Codex),
            Provider::Google => Some(CliTool::Gemini),
            Provider::Anthropic => Some(CliTool::Claude),
            _ => None,
        }
    }
}

impl std::fmt::Display for CliTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command())
    }
}

/// Which CLI tools are installed, and where
#[derive(Debug, Clone, Default)]
pub struct CliCapabilities {
    tools: HashMap<CliTool, PathBuf>,
}

impl CliCapabilities {
    /// Probe `PATH` for every known tool
    pub fn detect() -> Self {
        let mut tools = HashMap::new();
        for tool in CliTool::ALL {
            if let Some(path) = find_executable(tool.command()) {
                tracing::debug!("Found {} at {}", tool, path.display());
                tools.insert(tool, path);
            }
        }
        Self { tools }
    }

    /// No CLI tools; every call goes over HTTP
    pub fn none() -> Self {
        Self::default()
    }

    /// Register a tool at an explicit path
    pub fn with_tool(mut self, tool: CliTool, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(tool, path.into());
        self
    }

    pub fn path(&self, tool: CliTool) -> Option<&Path> {
        self.tools.get(&tool).map(PathBuf::as_path)
    }

    pub fn is_available(&self, tool: CliTool) -> bool {
        self.tools.contains_key(&tool)
    }

    /// Installed tools in a stable order
    pub fn available(&self) -> Vec<CliTool> {
        CliTool::ALL
            .into_iter()
            .filter(|t| self.is_available(*t))
            .collect()
    }
}

/// Resolve a command on `PATH`, preferring the `.cmd` shim on Windows
fn find_executable(command: &str) -> Option<PathBuf> {
    if cfg!(windows)
        && let Ok(path) = which::which(format!("{}.cmd", command))
    {
        return Some(path);
    }
    which::which(command).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_mapping() {
        assert_eq!(CliTool::for_provider(&Provider::OpenAi), Some(CliTool::Codex));
        assert_eq!(CliTool::for_provider(&Provider::Google), Some(CliTool::Gemini));
        assert_eq!(CliTool::for_provider(&Provider::Anthropic), Some(CliTool::Claude));
        assert_eq!(CliTool::for_provider(&Provider::DeepSeek), None);
        assert_eq!(
            CliTool::for_provider(&Provider::Other("mistral".to_string())),
            None
        );
    }

    #[test]
    fn test_none_has_no_tools() {
        let caps = CliCapabilities::none();
        assert!(caps.available().is_empty());
        assert!(caps.path(CliTool::Claude).is_none());
    }

    #[test]
    fn test_with_tool() {
        let caps = CliCapabilities::none().with_tool(CliTool::Gemini, "/usr/local/bin/gemini");
        assert!(caps.is_available(CliTool::Gemini));
        assert!(!caps.is_available(CliTool::Codex));
        assert_eq!(caps.available(), vec![CliTool::Gemini]);
    }

    #[test]
    fn test_detect_does_not_panic() {
        // Result depends on the host; only detection itself is checked
        let caps = CliCapabilities::detect();
        assert!(caps.available().len() <= CliTool::ALL.len());
    }
}
