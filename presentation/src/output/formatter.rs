//! Output formatter trait

use council_domain::OutputFormat;
use serde::Serialize;

/// Trait for formatting a workflow result
pub trait OutputFormatter<R: Serialize> {
    /// Format every stage of the result
    fn format(&self, result: &R) -> String;

    /// Format the final answer only (concise output)
    fn format_synthesis_only(&self, result: &R) -> String;

    /// Format as JSON
    fn format_json(&self, result: &R) -> String {
        serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }).to_string())
    }

    /// Format according to the requested output format
    fn render(&self, result: &R, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(result),
            OutputFormat::Synthesis => self.format_synthesis_only(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
