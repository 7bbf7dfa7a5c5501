//! Output format value object

use serde::{Deserialize, Serialize};

/// How a deliberation result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Every stage: responses, reviews, and the synthesis
    Full,
    /// Only the chairman's answer (default)
    #[default]
    Synthesis,
    /// The whole result as JSON
    Json,
}

impl OutputFormat {
    /// Output meant for other programs; progress and color stay off stdout
    pub fn is_machine_readable(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}
